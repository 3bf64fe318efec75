//! TUI Renderer - Implements UiRenderer trait for terminal display
//!
//! Draws the shared state and maps key presses to commands. Business logic
//! stays in the BacklogController.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};

use crate::api::ExportFormat;
use crate::ui_backend::UiRenderer;
use crate::ui_backend::{ActiveTab, Command, Dialog, FormField, SharedState};

use super::events::{Event, EventHandler};
use super::theme::Theme;
use super::widgets::{
    AlertBanner, AlertKind, BacklogForm, DialogWidget, Header, SprintList, StatsGrid, StatusBar,
    StoryList, TabBar, TerminalFrame,
};

/// Shown instead of the content while an operation runs
pub const LOADING_TEXT: &str = "Procesando con IA...";

/// TUI Renderer implementation
pub struct TuiRenderer<B: Backend> {
    /// Terminal instance
    terminal: Terminal<B>,
    /// Current theme
    theme: Theme,
    /// Input polling
    events: EventHandler,
    /// Shown in the header
    service_url: String,
}

impl<B: Backend> TuiRenderer<B> {
    /// Create a new TUI renderer
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            theme: Theme::default(),
            events: EventHandler::default(),
            service_url: String::new(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_events(mut self, events: EventHandler) -> Self {
        self.events = events;
        self
    }

    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = url.into();
        self
    }

    /// Get reference to terminal (for testing)
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Get mutable reference to terminal
    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// Convert keyboard event to command
    pub fn key_to_command(key: KeyEvent, state: &SharedState) -> Option<Command> {
        // Application control
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::CONTROL) => return Some(Command::Quit),
            _ => {}
        }

        // Dialogs capture everything else
        if let Some(dialog) = state.dialog() {
            return match (key.code, &dialog) {
                (KeyCode::Esc, _) => Some(Command::DialogCancel),
                (KeyCode::Enter, _) => Some(Command::DialogSubmit),
                (KeyCode::Char('s') | KeyCode::Char('y'), Dialog::ConfirmClear) => {
                    Some(Command::DialogSubmit)
                }
                (KeyCode::Char('n'), Dialog::ConfirmClear) => Some(Command::DialogCancel),
                (KeyCode::Backspace, Dialog::Velocity(_)) => Some(Command::DeleteCharBefore),
                (KeyCode::Char(c), Dialog::Velocity(_)) => Some(Command::InsertChar(c)),
                _ => None,
            };
        }

        match (key.code, key.modifiers) {
            (KeyCode::F(1), _) => return Some(Command::SelectTab(ActiveTab::Form)),
            (KeyCode::F(2), _) => return Some(Command::SelectTab(ActiveTab::Backlog)),
            (KeyCode::F(3), _) => return Some(Command::SelectTab(ActiveTab::Sprints)),
            (KeyCode::Esc, _) => return Some(Command::DismissAlerts),
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => return Some(Command::SubmitForm),
            _ => {}
        }

        match state.active_tab() {
            ActiveTab::Form => Self::form_key(key, state.form_focus()),
            ActiveTab::Backlog | ActiveTab::Sprints => Self::list_key(key),
        }
    }

    fn form_key(key: KeyEvent, focus: FormField) -> Option<Command> {
        match (key.code, key.modifiers) {
            (KeyCode::Tab, KeyModifiers::NONE) => Some(Command::FocusNextField),
            // Handle both BackTab and Tab+SHIFT for cross-terminal compatibility
            (KeyCode::BackTab, _) | (KeyCode::Tab, KeyModifiers::SHIFT) => {
                Some(Command::FocusPrevField)
            }
            (KeyCode::Up, _) if focus == FormField::TeamCapacity => {
                Some(Command::IncrementCapacity)
            }
            (KeyCode::Down, _) if focus == FormField::TeamCapacity => {
                Some(Command::DecrementCapacity)
            }
            (KeyCode::Enter, _) => Some(Command::InsertNewline),
            (KeyCode::Backspace, _) => Some(Command::DeleteCharBefore),
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                Some(Command::InsertChar(c))
            }
            _ => None,
        }
    }

    fn list_key(key: KeyEvent) -> Option<Command> {
        match (key.code, key.modifiers) {
            (KeyCode::Tab, KeyModifiers::NONE) => Some(Command::NextTab),
            (KeyCode::BackTab, _) | (KeyCode::Tab, KeyModifiers::SHIFT) => Some(Command::PrevTab),
            (KeyCode::Char('m'), KeyModifiers::NONE) => {
                Some(Command::Export(ExportFormat::Markdown))
            }
            (KeyCode::Char('c'), KeyModifiers::NONE) => Some(Command::Export(ExportFormat::Csv)),
            (KeyCode::Char('j'), KeyModifiers::NONE) => Some(Command::Export(ExportFormat::Json)),
            (KeyCode::Char('v'), KeyModifiers::NONE) => Some(Command::BeginVelocityUpdate),
            (KeyCode::Char('x'), KeyModifiers::NONE) => Some(Command::BeginClear),
            (KeyCode::Up, _) => Some(Command::ScrollUp),
            (KeyCode::Down, _) => Some(Command::ScrollDown),
            (KeyCode::PageUp, _) => Some(Command::PageUp),
            (KeyCode::PageDown, _) => Some(Command::PageDown),
            _ => None,
        }
    }
}

/// Draw the whole screen from `state`
pub fn draw_app(frame: &mut Frame, state: &SharedState, theme: &Theme, service_url: &str) {
    let area = frame.area();

    // Main layout: Terminal frame with rounded borders
    frame.render_widget(TerminalFrame::new(theme), area);

    // Inner area (inside the frame borders)
    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };

    let alert = state
        .error()
        .map(|m| (AlertKind::Error, m))
        .or_else(|| state.success().map(|m| (AlertKind::Success, m)));

    // Vertical layout: Header | Tabs | Alert | Content | Status
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(if alert.is_some() { 1 } else { 0 }),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(inner);

    let active_tab = state.active_tab();
    let loading = state.loading();

    frame.render_widget(Header::new(service_url, theme), chunks[0]);
    frame.render_widget(TabBar::new(active_tab, state.has_backlog(), theme), chunks[1]);
    if let Some((kind, message)) = &alert {
        frame.render_widget(AlertBanner::new(*kind, message, theme), chunks[2]);
    }

    let content = chunks[3];
    if content.height == 0 {
        // Nothing fits between the bars
    } else if loading {
        let y = content.y + content.height / 2;
        let line_area = Rect::new(content.x, y, content.width, 1);
        frame.render_widget(
            Paragraph::new(Line::styled(
                LOADING_TEXT,
                Style::default().fg(theme.yellow).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            line_area,
        );
    } else {
        match active_tab {
            ActiveTab::Form => {
                let form = state.form();
                frame.render_widget(
                    BacklogForm::new(&form, theme)
                        .focus(state.form_focus())
                        .requirements_flagged(state.requirements_flagged()),
                    content,
                );
            }
            ActiveTab::Backlog => {
                let scroll = state.scroll().backlog;
                state.with_backlog(|backlog| {
                    if let Some(backlog) = backlog {
                        let parts = Layout::vertical([Constraint::Length(3), Constraint::Min(1)])
                            .split(content);
                        let stats = crate::ui_backend::BacklogStats::from_backlog(backlog);
                        frame.render_widget(StatsGrid::new(stats, theme), parts[0]);
                        frame.render_widget(
                            StoryList::new(&backlog.user_stories, theme).scroll(scroll),
                            parts[1],
                        );
                    }
                });
            }
            ActiveTab::Sprints => {
                let scroll = state.scroll().sprints;
                state.with_backlog(|backlog| {
                    if let Some(backlog) = backlog {
                        frame.render_widget(SprintList::new(backlog, theme).scroll(scroll), content);
                    }
                });
            }
        }
    }

    frame.render_widget(
        StatusBar::new(theme)
            .tab(active_tab)
            .processing(loading)
            .revision(state.revision()),
        chunks[4],
    );

    if let Some(dialog) = state.dialog() {
        frame.render_widget(DialogWidget::new(&dialog, theme), inner);
    }
}

impl<B: Backend> UiRenderer for TuiRenderer<B> {
    fn render(&mut self, state: &SharedState) -> Result<()> {
        let theme = &self.theme;
        let service_url = self.service_url.as_str();
        self.terminal
            .draw(|frame| draw_app(frame, state, theme, service_url))?;
        Ok(())
    }

    fn poll_command(&mut self, state: &SharedState) -> Result<Option<Command>> {
        match self.events.next()? {
            Event::Key(key) => Ok(Self::key_to_command(key, state)),
            // Terminal resize handled automatically by ratatui
            Event::Resize(_, _) | Event::Tick => Ok(None),
        }
    }

    fn get_size(&self) -> (u16, u16) {
        let size = self.terminal.size().unwrap_or_default();
        (size.width, size.height)
    }
}
