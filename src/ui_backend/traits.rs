//! UI Renderer Trait
//!
//! Defines the interface that all frontends must implement.

use anyhow::Result;

use super::commands::Command;
use super::state::SharedState;

/// Trait that all UI renderers must implement
///
/// This abstracts the UI layer from the controller, so the same state and
/// commands drive the terminal frontend and the test backends.
pub trait UiRenderer {
    /// Render the current application state
    ///
    /// This is called on every frame to display the UI.
    fn render(&mut self, state: &SharedState) -> Result<()>;

    /// Wait up to the tick for the next user command
    fn poll_command(&mut self, state: &SharedState) -> Result<Option<Command>>;

    /// Get the current UI size
    ///
    /// Returns (width, height) in terminal columns/rows.
    fn get_size(&self) -> (u16, u16);
}
