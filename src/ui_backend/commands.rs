//! User Commands
//!
//! Defines all possible user actions that can be triggered from the UI.

use super::state::ActiveTab;
use crate::api::ExportFormat;

/// User commands that can be executed
///
/// These represent user actions translated from keybindings. The
/// BacklogController applies them to the shared state and turns the ones
/// that need the backlog service into operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // ========== Application Control ==========
    /// Quit the application
    Quit,

    /// Hide the error and success banners
    DismissAlerts,

    // ========== Tabs ==========
    SelectTab(ActiveTab),
    NextTab,
    PrevTab,

    // ========== Form ==========
    FocusNextField,
    FocusPrevField,

    /// Insert a character into the focused text field or dialog
    InsertChar(char),

    /// Delete character before cursor
    DeleteCharBefore,

    InsertNewline,
    IncrementCapacity,
    DecrementCapacity,

    /// Generate a backlog from the form
    SubmitForm,

    /// Mark the requirements field as required and focus it
    FlagMissingRequirements,

    // ========== Backlog actions ==========
    Export(ExportFormat),
    BeginVelocityUpdate,
    BeginClear,

    // ========== Dialogs ==========
    DialogSubmit,
    DialogCancel,

    // ========== Scrolling ==========
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
}

impl Command {
    /// Commands that start (or lead straight into) a remote operation
    pub fn starts_operation(&self) -> bool {
        matches!(
            self,
            Command::SubmitForm
                | Command::Export(_)
                | Command::BeginVelocityUpdate
                | Command::BeginClear
                | Command::DialogSubmit
        )
    }

    /// Commands only meaningful with a loaded backlog
    pub fn requires_backlog(&self) -> bool {
        match self {
            Command::SelectTab(tab) => tab.requires_backlog(),
            Command::Export(_) | Command::BeginVelocityUpdate | Command::BeginClear => true,
            _ => false,
        }
    }
}
