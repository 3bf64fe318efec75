//! Command Middleware
//!
//! Provides a pipeline pattern for processing commands with logging,
//! gating, and transformation capabilities.

use super::commands::Command;
use super::state::{ActiveTab, FormField, SharedState};

/// Result of middleware processing
#[derive(Debug, Clone)]
pub enum MiddlewareResult {
    /// Continue processing with this command
    Continue(Command),
    /// Transform the command into another command
    Transform(Command),
    /// Block this command from being processed
    Block,
}

/// Middleware function type
pub type MiddlewareFn =
    Box<dyn Fn(&Command, &SharedState) -> MiddlewareResult + Send + Sync + 'static>;

/// Command pipeline that applies middlewares in sequence
pub struct CommandPipeline {
    middlewares: Vec<MiddlewareFn>,
}

impl CommandPipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Pipeline used by the terminal frontend
    pub fn standard() -> Self {
        Self::new()
            .with_middleware(Box::new(logging_middleware))
            .with_middleware(Box::new(normalization_middleware))
            .with_middleware(Box::new(loading_gate_middleware))
            .with_middleware(Box::new(tab_visibility_middleware))
    }

    /// Add a middleware to the pipeline
    pub fn with_middleware(mut self, middleware: MiddlewareFn) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Process a command through the middleware pipeline
    ///
    /// Returns Some(Command) if the command should be processed,
    /// None if it was blocked by a middleware.
    pub fn process(&self, cmd: Command, state: &SharedState) -> Option<Command> {
        let mut current = cmd;

        for middleware in &self.middlewares {
            match middleware(&current, state) {
                MiddlewareResult::Continue(c) => current = c,
                MiddlewareResult::Transform(c) => current = c,
                MiddlewareResult::Block => return None,
            }
        }

        Some(current)
    }
}

impl Default for CommandPipeline {
    fn default() -> Self {
        Self::new()
    }
}

// ========== Built-in Middlewares ==========

/// Logging middleware - logs all commands
pub fn logging_middleware(cmd: &Command, _state: &SharedState) -> MiddlewareResult {
    tracing::debug!(command = ?cmd, "Processing command");
    MiddlewareResult::Continue(cmd.clone())
}

/// Loading gate - no operation may start while another is in flight
pub fn loading_gate_middleware(cmd: &Command, state: &SharedState) -> MiddlewareResult {
    if cmd.starts_operation() && state.loading() {
        tracing::warn!(command = ?cmd, "Blocked command: operation in progress");
        return MiddlewareResult::Block;
    }
    MiddlewareResult::Continue(cmd.clone())
}

/// Tab visibility - backlog views and actions need a loaded backlog
pub fn tab_visibility_middleware(cmd: &Command, state: &SharedState) -> MiddlewareResult {
    if cmd.requires_backlog() && !state.has_backlog() {
        tracing::debug!(command = ?cmd, "Blocked command: no backlog loaded");
        return MiddlewareResult::Block;
    }
    MiddlewareResult::Continue(cmd.clone())
}

/// Normalization - the form refuses an empty requirements field on its own
pub fn normalization_middleware(cmd: &Command, state: &SharedState) -> MiddlewareResult {
    match cmd {
        Command::SubmitForm if state.form().requirements.is_empty() => {
            MiddlewareResult::Transform(Command::FlagMissingRequirements)
        }
        // Enter on the submit button submits
        Command::InsertNewline
            if state.active_tab() == ActiveTab::Form
                && !state.has_dialog()
                && state.form_focus() == FormField::Submit =>
        {
            let submit = Command::SubmitForm;
            match normalization_middleware(&submit, state) {
                MiddlewareResult::Continue(c) => MiddlewareResult::Transform(c),
                other => other,
            }
        }
        _ => MiddlewareResult::Continue(cmd.clone()),
    }
}
