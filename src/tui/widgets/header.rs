//! Header Widget
//!
//! Displays the application name and the backlog service in use

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Header widget showing app name and service URL
pub struct Header<'a> {
    /// Backlog service base URL
    service_url: &'a str,
    /// Theme for styling
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    /// Create a new header widget
    pub fn new(service_url: &'a str, theme: &'a Theme) -> Self {
        Self { service_url, theme }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        // Format: "🤖 AI Scrum Agent  http://host:8000/api"
        let header_text = Line::from(vec![
            Span::styled("🤖 ", Style::default().fg(self.theme.cyan)),
            Span::styled(
                "AI Scrum Agent",
                Style::default()
                    .fg(self.theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  ", Style::default()),
            Span::styled(self.service_url, Style::default().fg(self.theme.text_muted)),
        ]);

        Paragraph::new(header_text).render(area, buf);
    }
}
