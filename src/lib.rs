//! scrum-agent: terminal client for an AI-assisted Scrum backlog service
//!
//! This library provides:
//! - A typed client for the remote backlog service (generate, current,
//!   plan sprints, update velocity, export, clear)
//! - A view-state controller shared by every front end
//! - A terminal UI with form, backlog and sprint views
//! - One-shot CLI commands over the same controller

pub mod api;
pub mod config;
pub mod transport;
pub mod tui;
pub mod ui_backend;

pub use api::{Backlog, BacklogApi, HttpBacklogClient};
pub use config::Config;
pub use ui_backend::{BacklogController, SharedState};
