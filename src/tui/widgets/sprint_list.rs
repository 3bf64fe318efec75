//! Sprint List Widget
//!
//! One card per sprint: capacity, utilization (warning color above 90%),
//! completion once points were recorded, a progress bar and the resolved
//! stories. Unknown story ids are skipped.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::api::{Backlog, Sprint};
use crate::tui::theme::Theme;
use crate::tui::utils::{progress_bar, truncate_to_width};
use crate::ui_backend::{resolve_sprint_stories, SprintMetrics};

const BAR_WIDTH: usize = 30;

pub struct SprintList<'a> {
    backlog: &'a Backlog,
    scroll: u16,
    theme: &'a Theme,
}

impl<'a> SprintList<'a> {
    pub fn new(backlog: &'a Backlog, theme: &'a Theme) -> Self {
        Self {
            backlog,
            scroll: 0,
            theme,
        }
    }

    pub fn scroll(mut self, offset: u16) -> Self {
        self.scroll = offset;
        self
    }

    fn history_line(&self) -> Option<Line<'a>> {
        if self.backlog.velocity_history.is_empty() {
            return None;
        }
        let history: Vec<String> = self
            .backlog
            .velocity_history
            .iter()
            .map(|p| p.to_string())
            .collect();
        Some(Line::from(vec![
            Span::styled(
                "Historial de velocidad: ",
                Style::default().fg(self.theme.text_muted),
            ),
            Span::styled(
                format!("{} SP", history.join(" → ")),
                Style::default().fg(self.theme.green),
            ),
        ]))
    }

    /// Lines of one sprint card
    pub fn sprint_lines(&self, sprint: &Sprint, width: u16) -> Vec<Line<'a>> {
        let metrics = SprintMetrics::for_sprint(sprint);
        let muted = Style::default().fg(self.theme.text_muted);
        let text = Style::default().fg(self.theme.text_primary);
        let mut lines = Vec::new();

        let status_color = if sprint.status.is_completed() {
            self.theme.green
        } else {
            self.theme.blue
        };
        lines.push(Line::from(vec![
            Span::styled(
                sprint.name.clone(),
                Style::default()
                    .fg(self.theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("[{}]", sprint.status),
                Style::default().fg(status_color),
            ),
        ]));

        let utilization_color = if metrics.over_threshold {
            self.theme.red
        } else {
            self.theme.green
        };
        lines.push(Line::from(vec![
            Span::styled("  Capacidad: ", muted),
            Span::styled(format!("{} SP", sprint.capacity), text),
            Span::styled("  Asignado: ", muted),
            Span::styled(format!("{} SP", sprint.total_points), text),
            Span::styled("  Utilización: ", muted),
            Span::styled(
                format!("{:.1}%", metrics.utilization),
                Style::default().fg(utilization_color),
            ),
        ]));

        if let Some(completion) = metrics.completion {
            lines.push(Line::from(vec![
                Span::styled("  Completado: ", muted),
                Span::styled(format!("{} SP", sprint.completed_points), text),
                Span::styled(
                    format!(" ({:.1}%)", completion),
                    Style::default().fg(self.theme.green),
                ),
            ]));
        }

        let bar_color = if sprint.status.is_completed() {
            self.theme.green
        } else {
            utilization_color
        };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(progress_bar(metrics.progress, BAR_WIDTH), Style::default().fg(bar_color)),
            Span::styled(format!(" {:.0}%", metrics.progress), muted),
        ]));

        for story in resolve_sprint_stories(self.backlog, sprint) {
            let suffix = format!(" ({} SP)", story.story_points);
            let room = (width as usize).saturating_sub(story.id.len() + suffix.len() + 8);
            lines.push(Line::from(vec![
                Span::styled(format!("    {}  ", story.id), Style::default().fg(self.theme.cyan)),
                Span::styled(truncate_to_width(&story.title, room), text),
                Span::styled(suffix, Style::default().fg(self.theme.purple)),
            ]));
        }

        lines
    }
}

impl Widget for SprintList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines: Vec<Line> = Vec::new();
        if let Some(history) = self.history_line() {
            lines.push(history);
            lines.push(Line::raw(""));
        }
        if self.backlog.sprints.is_empty() {
            lines.push(Line::styled(
                "No hay sprints planificados",
                Style::default().fg(self.theme.text_muted),
            ));
        }
        for sprint in &self.backlog.sprints {
            lines.extend(self.sprint_lines(sprint, area.width));
            lines.push(Line::raw(""));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}
