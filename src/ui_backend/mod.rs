//! UI Backend - Backend-for-Frontend (BFF) Layer
//!
//! This module keeps the backlog view-state apart from rendering, so the
//! terminal UI, the one-shot CLI commands and the tests drive the same
//! controller.
//!
//! ## Architecture
//!
//! - **BacklogController**: validation, loading gate and remote calls
//! - **SharedState**: thread-safe view state holding the backlog document
//! - **Command**: user actions mapped from keybindings
//! - **CommandPipeline**: middlewares run before a command is applied
//! - **UiRenderer**: trait that frontends implement

mod commands;
mod errors;
pub mod middleware;
pub mod prompt;
mod service;
mod state;
mod traits;
mod types;

pub use commands::Command;
pub use errors::{
    Action, ControllerError, MSG_CAPACITY_RANGE, MSG_EMPTY_REQUIREMENTS, MSG_POINTS_NOT_INTEGER,
};
pub use middleware::{
    loading_gate_middleware, logging_middleware, normalization_middleware,
    tab_visibility_middleware, CommandPipeline, MiddlewareFn, MiddlewareResult,
};
pub use prompt::{Confirmation, PromptAnswer, VelocityDialog, VelocityStage, VelocityStep};
pub use service::{BacklogController, Operation, Outcome};
pub use state::{
    ActiveTab, Dialog, FormField, FormFields, ScrollOffsets, SharedState, MAX_TEAM_CAPACITY,
    MIN_TEAM_CAPACITY,
};
pub use traits::UiRenderer;
pub use types::{resolve_sprint_stories, BacklogStats, SprintMetrics, UTILIZATION_WARNING_THRESHOLD};
