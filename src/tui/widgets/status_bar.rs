//! Status Bar Widget
//!
//! Key hints for the active view, working indicator and backlog revision

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;
use crate::ui_backend::ActiveTab;

/// Status bar widget
pub struct StatusBar<'a> {
    /// Active view
    tab: ActiveTab,
    /// Whether an operation is in flight
    is_processing: bool,
    /// Backlog document revision
    revision: u64,
    /// Theme for styling
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            tab: ActiveTab::Form,
            is_processing: false,
            revision: 0,
            theme,
        }
    }

    /// Set active tab
    pub fn tab(mut self, tab: ActiveTab) -> Self {
        self.tab = tab;
        self
    }

    /// Set processing state
    pub fn processing(mut self, is_processing: bool) -> Self {
        self.is_processing = is_processing;
        self
    }

    pub fn revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    fn hints(&self) -> &'static str {
        match self.tab {
            ActiveTab::Form => "F1-F3 vista  Tab campo  Ctrl+S generar  Ctrl+Q salir",
            ActiveTab::Backlog | ActiveTab::Sprints => {
                "m/c/j exportar  v velocidad  x eliminar  ↑↓ desplazar  Ctrl+Q salir"
            }
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let chunks = Layout::horizontal([
            Constraint::Min(20),    // Hints
            Constraint::Length(16), // Working indicator
            Constraint::Length(8),  // Revision
        ])
        .split(area);

        Paragraph::new(Line::styled(
            self.hints(),
            Style::default().fg(self.theme.text_muted),
        ))
        .render(chunks[0], buf);

        if self.is_processing {
            let working_text = Line::from(vec![
                Span::styled("● ", Style::default().fg(self.theme.green)),
                Span::styled("Procesando...", Style::default().fg(self.theme.text_secondary)),
            ]);
            Paragraph::new(working_text).render(chunks[1], buf);
        }

        if self.revision > 0 {
            Paragraph::new(Line::styled(
                format!("rev {}", self.revision),
                Style::default().fg(self.theme.text_muted),
            ))
            .render(chunks[2], buf);
        }
    }
}
