//! Tab Bar Widget
//!
//! F1/F2/F3 tabs; backlog views are dimmed while no backlog is loaded

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;
use crate::ui_backend::ActiveTab;

pub struct TabBar<'a> {
    active: ActiveTab,
    has_backlog: bool,
    theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    pub fn new(active: ActiveTab, has_backlog: bool, theme: &'a Theme) -> Self {
        Self {
            active,
            has_backlog,
            theme,
        }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let mut spans = Vec::new();
        for (i, tab) in ActiveTab::ALL.iter().enumerate() {
            let available = !tab.requires_backlog() || self.has_backlog;
            let style = if *tab == self.active {
                Style::default()
                    .fg(self.theme.bg_main)
                    .bg(self.theme.blue)
                    .add_modifier(Modifier::BOLD)
            } else if available {
                Style::default().fg(self.theme.text_primary)
            } else {
                Style::default().fg(self.theme.text_muted)
            };
            spans.push(Span::styled(
                format!(" F{} {} ", i + 1, tab.title()),
                style,
            ));
            spans.push(Span::raw(" "));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
