//! Alert Banner Widget
//!
//! Single-line error or success banner, dismissed with Esc

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;
use crate::tui::utils::truncate_to_width;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Success,
}

pub struct AlertBanner<'a> {
    kind: AlertKind,
    message: &'a str,
    theme: &'a Theme,
}

impl<'a> AlertBanner<'a> {
    pub fn new(kind: AlertKind, message: &'a str, theme: &'a Theme) -> Self {
        Self {
            kind,
            message,
            theme,
        }
    }
}

impl Widget for AlertBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let (icon, color) = match self.kind {
            AlertKind::Error => ("✖ ", self.theme.red),
            AlertKind::Success => ("✔ ", self.theme.green),
        };
        let hint = "  (Esc)";
        let room = (area.width as usize).saturating_sub(icon.len() + hint.len());

        let line = Line::from(vec![
            Span::styled(icon, Style::default().fg(color)),
            Span::styled(
                truncate_to_width(self.message, room),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(hint, Style::default().fg(self.theme.text_muted)),
        ]);

        Paragraph::new(line)
            .style(Style::default().bg(self.theme.bg_highlight))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_error_banner_text() {
        let backend = TestBackend::new(70, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();

        terminal
            .draw(|f| {
                let banner = AlertBanner::new(AlertKind::Error, "Sprint no encontrado", &theme);
                f.render_widget(banner, f.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = (0..70)
            .map(|x| buffer.cell((x, 0)).unwrap().symbol().to_string())
            .collect();
        assert!(content.contains("Sprint no encontrado"));
        assert_eq!(buffer.cell((2, 0)).unwrap().fg, theme.red);
    }
}
