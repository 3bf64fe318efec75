//! Backlog Form Widget
//!
//! Requirements, team capacity, optional context and priority guidance,
//! plus the submit button. Text areas show their last lines so the cursor
//! stays visible while typing.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::TerminalFrame;
use crate::tui::theme::Theme;
use crate::ui_backend::{FormField, FormFields};

const CURSOR: &str = "▏";

pub struct BacklogForm<'a> {
    fields: &'a FormFields,
    focus: FormField,
    requirements_flagged: bool,
    theme: &'a Theme,
}

impl<'a> BacklogForm<'a> {
    pub fn new(fields: &'a FormFields, theme: &'a Theme) -> Self {
        Self {
            fields,
            focus: FormField::Requirements,
            requirements_flagged: false,
            theme,
        }
    }

    pub fn focus(mut self, focus: FormField) -> Self {
        self.focus = focus;
        self
    }

    pub fn requirements_flagged(mut self, flagged: bool) -> Self {
        self.requirements_flagged = flagged;
        self
    }

    fn text_area(&self, field: FormField, title: &'a str, text: &str, area: Rect, buf: &mut Buffer) {
        let focused = self.focus == field;
        let mut frame = TerminalFrame::new(self.theme).title(title).focused(focused);
        if field == FormField::Requirements && self.requirements_flagged {
            frame = frame.border_color(self.theme.red);
        }
        let block = frame.block();
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = text
            .split('\n')
            .map(|l| Line::styled(l.to_string(), Style::default().fg(self.theme.text_primary)))
            .collect();
        if focused {
            if let Some(last) = lines.last_mut() {
                last.push_span(Span::styled(CURSOR, Style::default().fg(self.theme.blue)));
            }
        }
        let skip = lines.len().saturating_sub(inner.height as usize);
        let visible: Vec<Line> = lines.into_iter().skip(skip).collect();

        Paragraph::new(visible)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

impl Widget for BacklogForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::vertical([
            Constraint::Min(5),    // Requirements
            Constraint::Length(3), // Capacity
            Constraint::Length(4), // Additional context
            Constraint::Length(4), // Priority guidance
            Constraint::Length(1), // Submit
            Constraint::Length(1), // Hints
        ])
        .split(area);

        let requirements_title = if self.requirements_flagged {
            " Requisitos del negocio * (campo requerido) "
        } else {
            " Requisitos del negocio * "
        };
        self.text_area(
            FormField::Requirements,
            requirements_title,
            &self.fields.requirements,
            chunks[0],
            buf,
        );

        // Capacity spinner
        let capacity_focused = self.focus == FormField::TeamCapacity;
        let block = TerminalFrame::new(self.theme)
            .title(" Capacidad del equipo (SP por sprint) ")
            .focused(capacity_focused)
            .block();
        let inner = block.inner(chunks[1]);
        block.render(chunks[1], buf);
        let arrow_style = if capacity_focused {
            Style::default().fg(self.theme.blue)
        } else {
            Style::default().fg(self.theme.text_muted)
        };
        Paragraph::new(Line::from(vec![
            Span::styled("◀ ", arrow_style),
            Span::styled(
                self.fields.team_capacity.to_string(),
                Style::default()
                    .fg(self.theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ▶", arrow_style),
            Span::styled("   (1-100, ↑/↓)", Style::default().fg(self.theme.text_muted)),
        ]))
        .render(inner, buf);

        self.text_area(
            FormField::AdditionalContext,
            " Contexto adicional (opcional) ",
            &self.fields.additional_context,
            chunks[2],
            buf,
        );
        self.text_area(
            FormField::PriorityGuidance,
            " Guía de priorización (opcional) ",
            &self.fields.priority_guidance,
            chunks[3],
            buf,
        );

        let button_style = if self.focus == FormField::Submit {
            Style::default()
                .fg(self.theme.bg_main)
                .bg(self.theme.green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.green)
        };
        Paragraph::new(Line::from(Span::styled("[ Generar Backlog ]", button_style)))
            .render(chunks[4], buf);

        Paragraph::new(Line::styled(
            "Tab/Shift+Tab: campo  Enter: nueva línea  Ctrl+S: generar",
            Style::default().fg(self.theme.text_muted),
        ))
        .render(chunks[5], buf);
    }
}
