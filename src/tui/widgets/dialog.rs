//! Dialog Widget
//!
//! Centered modal for the velocity prompts and the clear confirmation

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::tui::theme::Theme;
use crate::ui_backend::{Dialog, VelocityStage};

pub struct DialogWidget<'a> {
    dialog: &'a Dialog,
    theme: &'a Theme,
    /// Width percentage (0-100)
    width_percent: u16,
}

impl<'a> DialogWidget<'a> {
    pub fn new(dialog: &'a Dialog, theme: &'a Theme) -> Self {
        Self {
            dialog,
            theme,
            width_percent: 50,
        }
    }

    pub fn width(mut self, percent: u16) -> Self {
        self.width_percent = percent;
        self
    }

    /// Calculate the centered area for the dialog
    fn centered_rect(&self, area: Rect, height: u16) -> Rect {
        let popup_width = (area.width * self.width_percent / 100).max(30).min(area.width);
        let popup_height = height.min(area.height);

        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;

        Rect::new(x, y, popup_width, popup_height)
    }

    fn content(&self) -> (&'static str, Vec<Line<'a>>) {
        let muted = Style::default().fg(self.theme.text_muted);
        match self.dialog {
            Dialog::Velocity(dialog) => {
                let mut lines = Vec::new();
                if let VelocityStage::CompletedPoints { sprint } = &dialog.stage {
                    lines.push(Line::styled(format!("Sprint {}", sprint), muted));
                }
                lines.push(Line::styled(
                    dialog.question(),
                    Style::default().fg(self.theme.text_primary),
                ));
                lines.push(Line::from(vec![
                    Span::styled("> ", Style::default().fg(self.theme.blue)),
                    Span::styled(
                        dialog.input.clone(),
                        Style::default()
                            .fg(self.theme.text_primary)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("▏", Style::default().fg(self.theme.blue)),
                ]));
                lines.push(Line::raw(""));
                lines.push(Line::styled("Enter: aceptar  Esc: cancelar", muted));
                (" Actualizar velocidad ", lines)
            }
            Dialog::ConfirmClear => (
                " Eliminar backlog ",
                vec![
                    Line::styled(
                        "¿Estás seguro de que deseas eliminar el backlog actual?",
                        Style::default().fg(self.theme.text_primary),
                    ),
                    Line::raw(""),
                    Line::from(vec![
                        Span::styled("[s] Sí", Style::default().fg(self.theme.red)),
                        Span::raw("   "),
                        Span::styled("[n] No", muted),
                    ]),
                ],
            ),
        }
    }
}

impl Widget for DialogWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, content) = self.content();
        let height = content.len() as u16 + 2;
        let dialog_area = self.centered_rect(area, height);

        // Clear the area behind the dialog
        Clear.render(dialog_area, buf);

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused))
            .style(Style::default().bg(self.theme.bg_dark));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        Paragraph::new(content)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
