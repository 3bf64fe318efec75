//! Terminal UI
//!
//! Three views over the backlog (generation form, story list, sprint list)
//! drawn with ratatui. All state lives in [`crate::ui_backend::SharedState`];
//! this module only draws it and turns key presses into commands.

mod controller;
mod events;
mod renderer;
mod theme;
pub mod utils;
pub mod widgets;

pub use controller::TuiController;
pub use events::{Event, EventHandler};
pub use renderer::{draw_app, TuiRenderer, LOADING_TEXT};
pub use theme::Theme;
