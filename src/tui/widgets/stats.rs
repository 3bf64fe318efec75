//! Stats Widget
//!
//! Four boxed figures above the backlog: stories, points, sprints, velocity

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Paragraph, Widget},
};

use super::TerminalFrame;
use crate::tui::theme::Theme;
use crate::ui_backend::BacklogStats;

pub struct StatsGrid<'a> {
    stats: BacklogStats,
    theme: &'a Theme,
}

impl<'a> StatsGrid<'a> {
    pub fn new(stats: BacklogStats, theme: &'a Theme) -> Self {
        Self { stats, theme }
    }
}

impl Widget for StatsGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cells = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
        let figures: [(&str, String, Color); 4] = [
            (" Historias ", self.stats.total_stories.to_string(), self.theme.blue),
            (" Story Points ", self.stats.total_points.to_string(), self.theme.purple),
            (" Sprints ", self.stats.total_sprints.to_string(), self.theme.cyan),
            (" Velocidad ", self.stats.velocity_label(), self.theme.green),
        ];

        for ((title, value, color), cell) in figures.into_iter().zip(cells.iter()) {
            let block = TerminalFrame::new(self.theme).title(title).block();
            let inner = block.inner(*cell);
            block.render(*cell, buf);
            Paragraph::new(Line::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .render(inner, buf);
        }
    }
}
