//! Shared Application State
//!
//! Thread-safe state shared between the controller, the spawned remote
//! operations and the renderer. The backlog document inside it is only ever
//! swapped wholesale; every swap bumps `revision`.

use std::sync::{Arc, RwLock};

use super::prompt::VelocityDialog;
use super::types::BacklogStats;
use crate::api::types::DEFAULT_TEAM_CAPACITY;
use crate::api::Backlog;

/// Smallest accepted team capacity
pub const MIN_TEAM_CAPACITY: u32 = 1;
/// Largest accepted team capacity
pub const MAX_TEAM_CAPACITY: u32 = 100;

/// Top level view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    #[default]
    Form,
    Backlog,
    Sprints,
}

impl ActiveTab {
    pub const ALL: [ActiveTab; 3] = [ActiveTab::Form, ActiveTab::Backlog, ActiveTab::Sprints];

    pub fn title(&self) -> &'static str {
        match self {
            ActiveTab::Form => "Generar Backlog",
            ActiveTab::Backlog => "Backlog",
            ActiveTab::Sprints => "Sprints",
        }
    }

    /// Backlog and sprint views need a loaded document
    pub fn requires_backlog(&self) -> bool {
        !matches!(self, ActiveTab::Form)
    }
}

/// Focusable element of the generation form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Requirements,
    TeamCapacity,
    AdditionalContext,
    PriorityGuidance,
    Submit,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            Self::Requirements => Self::TeamCapacity,
            Self::TeamCapacity => Self::AdditionalContext,
            Self::AdditionalContext => Self::PriorityGuidance,
            Self::PriorityGuidance => Self::Submit,
            Self::Submit => Self::Requirements,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Requirements => Self::Submit,
            Self::TeamCapacity => Self::Requirements,
            Self::AdditionalContext => Self::TeamCapacity,
            Self::PriorityGuidance => Self::AdditionalContext,
            Self::Submit => Self::PriorityGuidance,
        }
    }

    /// Multi-line text areas
    pub fn is_text(self) -> bool {
        matches!(
            self,
            Self::Requirements | Self::AdditionalContext | Self::PriorityGuidance
        )
    }
}

/// Values bound to the generation form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    pub requirements: String,
    pub team_capacity: u32,
    pub additional_context: String,
    pub priority_guidance: String,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            requirements: String::new(),
            team_capacity: DEFAULT_TEAM_CAPACITY,
            additional_context: String::new(),
            priority_guidance: String::new(),
        }
    }
}

impl FormFields {
    /// Text buffer behind a text field
    pub fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Requirements => Some(&mut self.requirements),
            FormField::AdditionalContext => Some(&mut self.additional_context),
            FormField::PriorityGuidance => Some(&mut self.priority_guidance),
            FormField::TeamCapacity | FormField::Submit => None,
        }
    }

    pub fn increment_capacity(&mut self) {
        self.team_capacity = (self.team_capacity + 1).clamp(MIN_TEAM_CAPACITY, MAX_TEAM_CAPACITY);
    }

    pub fn decrement_capacity(&mut self) {
        self.team_capacity = self
            .team_capacity
            .saturating_sub(1)
            .clamp(MIN_TEAM_CAPACITY, MAX_TEAM_CAPACITY);
    }

    /// Reset after a successful generation; capacity is retained
    pub fn clear_submitted(&mut self) {
        self.requirements.clear();
        self.additional_context.clear();
        self.priority_guidance.clear();
    }
}

/// Modal dialog currently shown over the content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Velocity(VelocityDialog),
    ConfirmClear,
}

/// Scroll offsets of the list views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollOffsets {
    pub backlog: u16,
    pub sprints: u16,
}

/// Thread-safe shared state
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<RwLock<StateInner>>,
}

#[derive(Debug, Default)]
struct StateInner {
    backlog: Option<Backlog>,
    revision: u64,
    active_tab: ActiveTab,
    loading: bool,
    error: Option<String>,
    success: Option<String>,
    form: FormFields,
    form_focus: FormField,
    requirements_flagged: bool,
    dialog: Option<Dialog>,
    scroll: ScrollOffsets,
    should_quit: bool,
}

impl SharedState {
    /// Create new shared state with default values
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StateInner::default())),
        }
    }

    /// State whose form starts at `team_capacity`
    pub fn with_team_capacity(team_capacity: u32) -> Self {
        let state = Self::new();
        state.write_inner().form.team_capacity =
            team_capacity.clamp(MIN_TEAM_CAPACITY, MAX_TEAM_CAPACITY);
        state
    }

    /// Get a read lock on the inner state, recovering from poison
    fn read_inner(&self) -> std::sync::RwLockReadGuard<'_, StateInner> {
        self.inner.read().unwrap_or_else(|poisoned| {
            tracing::warn!("SharedState read lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Get a write lock on the inner state, recovering from poison
    fn write_inner(&self) -> std::sync::RwLockWriteGuard<'_, StateInner> {
        self.inner.write().unwrap_or_else(|poisoned| {
            tracing::warn!("SharedState write lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    // ========== Backlog document ==========

    /// Clone of the current document
    pub fn backlog(&self) -> Option<Backlog> {
        self.read_inner().backlog.clone()
    }

    /// Borrow the current document without cloning it
    pub fn with_backlog<R>(&self, f: impl FnOnce(Option<&Backlog>) -> R) -> R {
        f(self.read_inner().backlog.as_ref())
    }

    pub fn has_backlog(&self) -> bool {
        self.read_inner().backlog.is_some()
    }

    pub fn revision(&self) -> u64 {
        self.read_inner().revision
    }

    /// Swap in a whole new document
    pub fn replace_backlog(&self, backlog: Backlog) {
        let mut inner = self.write_inner();
        inner.backlog = Some(backlog);
        inner.revision += 1;
        inner.scroll = ScrollOffsets::default();
    }

    /// Drop the document and fall back to the form
    pub fn clear_backlog(&self) {
        let mut inner = self.write_inner();
        inner.backlog = None;
        inner.revision += 1;
        inner.scroll = ScrollOffsets::default();
        inner.active_tab = ActiveTab::Form;
        inner.dialog = None;
    }

    /// Derived figures, recomputed on every call
    pub fn stats(&self) -> Option<BacklogStats> {
        self.read_inner().backlog.as_ref().map(BacklogStats::from_backlog)
    }

    // ========== Tabs ==========

    pub fn active_tab(&self) -> ActiveTab {
        self.read_inner().active_tab
    }

    pub fn is_tab_available(&self, tab: ActiveTab) -> bool {
        !tab.requires_backlog() || self.has_backlog()
    }

    /// Switch tab; refused for backlog views while no document is loaded
    pub fn select_tab(&self, tab: ActiveTab) -> bool {
        let mut inner = self.write_inner();
        if tab.requires_backlog() && inner.backlog.is_none() {
            return false;
        }
        inner.active_tab = tab;
        true
    }

    /// Cycle through the available tabs
    pub fn cycle_tab(&self, forward: bool) {
        let mut inner = self.write_inner();
        let available: Vec<ActiveTab> = ActiveTab::ALL
            .into_iter()
            .filter(|t| !t.requires_backlog() || inner.backlog.is_some())
            .collect();
        let pos = available
            .iter()
            .position(|t| *t == inner.active_tab)
            .unwrap_or(0);
        let len = available.len();
        let next = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        inner.active_tab = available[next];
    }

    // ========== Loading gate ==========

    pub fn loading(&self) -> bool {
        self.read_inner().loading
    }

    /// Enter the loading state unless an operation is already running.
    /// Clears both banners on entry.
    pub fn try_begin_loading(&self) -> bool {
        let mut inner = self.write_inner();
        if inner.loading {
            return false;
        }
        inner.loading = true;
        inner.error = None;
        inner.success = None;
        true
    }

    pub fn finish_loading(&self) {
        self.write_inner().loading = false;
    }

    // ========== Banners ==========

    pub fn error(&self) -> Option<String> {
        self.read_inner().error.clone()
    }

    pub fn success(&self) -> Option<String> {
        self.read_inner().success.clone()
    }

    pub fn set_error(&self, message: impl Into<String>) {
        let mut inner = self.write_inner();
        inner.error = Some(message.into());
        inner.success = None;
    }

    pub fn set_success(&self, message: impl Into<String>) {
        let mut inner = self.write_inner();
        inner.success = Some(message.into());
        inner.error = None;
    }

    pub fn dismiss_alerts(&self) {
        let mut inner = self.write_inner();
        inner.error = None;
        inner.success = None;
    }

    // ========== Form ==========

    pub fn form(&self) -> FormFields {
        self.read_inner().form.clone()
    }

    pub fn set_form(&self, form: FormFields) {
        self.write_inner().form = form;
    }

    /// Mutate the form in place
    pub fn edit_form<R>(&self, f: impl FnOnce(&mut FormFields) -> R) -> R {
        f(&mut self.write_inner().form)
    }

    pub fn form_focus(&self) -> FormField {
        self.read_inner().form_focus
    }

    pub fn set_form_focus(&self, field: FormField) {
        self.write_inner().form_focus = field;
    }

    pub fn requirements_flagged(&self) -> bool {
        self.read_inner().requirements_flagged
    }

    pub fn set_requirements_flagged(&self, flagged: bool) {
        self.write_inner().requirements_flagged = flagged;
    }

    // ========== Dialogs ==========

    pub fn dialog(&self) -> Option<Dialog> {
        self.read_inner().dialog.clone()
    }

    pub fn has_dialog(&self) -> bool {
        self.read_inner().dialog.is_some()
    }

    pub fn set_dialog(&self, dialog: Option<Dialog>) {
        self.write_inner().dialog = dialog;
    }

    pub fn take_dialog(&self) -> Option<Dialog> {
        self.write_inner().dialog.take()
    }

    // ========== Scrolling ==========

    pub fn scroll(&self) -> ScrollOffsets {
        self.read_inner().scroll
    }

    /// Scroll the list shown on the active tab
    pub fn scroll_by(&self, delta: i32) {
        let mut inner = self.write_inner();
        let tab = inner.active_tab;
        let offset = match tab {
            ActiveTab::Backlog => &mut inner.scroll.backlog,
            ActiveTab::Sprints => &mut inner.scroll.sprints,
            ActiveTab::Form => return,
        };
        let next = (*offset as i32 + delta).clamp(0, u16::MAX as i32);
        *offset = next as u16;
    }

    // ========== Application control ==========

    pub fn should_quit(&self) -> bool {
        self.read_inner().should_quit
    }

    pub fn set_should_quit(&self, quit: bool) {
        self.write_inner().should_quit = quit;
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SharedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read_inner();
        f.debug_struct("SharedState")
            .field("has_backlog", &inner.backlog.is_some())
            .field("revision", &inner.revision)
            .field("active_tab", &inner.active_tab)
            .field("loading", &inner.loading)
            .finish()
    }
}
