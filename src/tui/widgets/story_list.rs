//! Story List Widget
//!
//! Every user story as a card. Optional sections (dependencies, criteria,
//! subtasks, test cases, tags) appear only when non-empty.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::api::{TestCase, UserStory};
use crate::tui::theme::Theme;
use crate::tui::utils::truncate_to_width;

pub struct StoryList<'a> {
    stories: &'a [UserStory],
    scroll: u16,
    theme: &'a Theme,
}

impl<'a> StoryList<'a> {
    pub fn new(stories: &'a [UserStory], theme: &'a Theme) -> Self {
        Self {
            stories,
            scroll: 0,
            theme,
        }
    }

    pub fn scroll(mut self, offset: u16) -> Self {
        self.scroll = offset;
        self
    }

    fn section(&self, lines: &mut Vec<Line<'a>>, title: &'static str) {
        lines.push(Line::from(Span::styled(
            format!("  {}", title),
            Style::default()
                .fg(self.theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        )));
    }

    fn bullet(&self, lines: &mut Vec<Line<'a>>, text: String) {
        lines.push(Line::from(vec![
            Span::styled("    • ", Style::default().fg(self.theme.text_muted)),
            Span::styled(text, Style::default().fg(self.theme.text_primary)),
        ]));
    }

    fn test_case_lines(&self, lines: &mut Vec<Line<'a>>, tc: &TestCase) {
        let muted = Style::default().fg(self.theme.text_muted);
        let text = Style::default().fg(self.theme.text_primary);

        lines.push(Line::from(vec![
            Span::styled(format!("    {} ", tc.id), Style::default().fg(self.theme.cyan)),
            Span::styled(tc.title.clone(), text.add_modifier(Modifier::BOLD)),
            Span::styled(format!("  [{}]", tc.test_type), muted),
        ]));
        lines.push(Line::styled(format!("      {}", tc.description), text));
        if let Some(pre) = &tc.preconditions {
            lines.push(Line::from(vec![
                Span::styled("      Precondiciones: ", muted),
                Span::styled(pre.clone(), text),
            ]));
        }
        for (i, step) in tc.steps.iter().enumerate() {
            lines.push(Line::styled(format!("      {}. {}", i + 1, step), text));
        }
        lines.push(Line::from(vec![
            Span::styled("      Resultado esperado: ", muted),
            Span::styled(tc.expected_result.clone(), Style::default().fg(self.theme.green)),
        ]));
    }

    /// Lines of one story card
    pub fn story_lines(&self, story: &UserStory, width: u16) -> Vec<Line<'a>> {
        let mut lines = Vec::new();
        let muted = Style::default().fg(self.theme.text_muted);

        // Header: id, title, priority badge, points, sprint badge
        let badge = format!(" {} ", story.priority);
        let points = format!(" {} SP", story.story_points);
        let sprint = story
            .sprint_assigned
            .map(|n| format!("  Sprint {}", n))
            .unwrap_or_default();
        let fixed = story.id.len() + 2 + badge.len() + points.len() + sprint.len() + 2;
        let title = truncate_to_width(&story.title, (width as usize).saturating_sub(fixed));

        let mut header = vec![
            Span::styled(
                format!("{}  ", story.id),
                Style::default().fg(self.theme.cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                title,
                Style::default()
                    .fg(self.theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                badge,
                Style::default()
                    .fg(self.theme.bg_main)
                    .bg(self.theme.priority_color(story.priority)),
            ),
            Span::styled(points, Style::default().fg(self.theme.purple)),
        ];
        if !sprint.is_empty() {
            header.push(Span::styled(sprint, Style::default().fg(self.theme.blue)));
        }
        lines.push(Line::from(header));

        for gherkin_line in story.gherkin.lines().filter(|l| !l.trim().is_empty()) {
            lines.push(Line::styled(
                format!("  {}", gherkin_line.trim_end()),
                Style::default()
                    .fg(self.theme.text_secondary)
                    .add_modifier(Modifier::ITALIC),
            ));
        }

        if !story.dependencies.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("  Dependencias: ", muted),
                Span::styled(
                    story.dependencies.join(", "),
                    Style::default().fg(self.theme.yellow),
                ),
            ]));
        }

        if !story.acceptance_criteria.is_empty() {
            self.section(&mut lines, "Criterios de aceptación");
            for criterion in &story.acceptance_criteria {
                self.bullet(&mut lines, criterion.clone());
            }
        }

        if !story.subtasks.is_empty() {
            self.section(&mut lines, "Subtareas");
            for task in &story.subtasks {
                let text = match task.estimated_hours {
                    Some(hours) => format!("{} ({}h)", task.title, hours),
                    None => task.title.clone(),
                };
                self.bullet(&mut lines, text);
            }
        }

        if !story.test_cases.is_empty() {
            self.section(&mut lines, "Casos de prueba");
            for tc in &story.test_cases {
                self.test_case_lines(&mut lines, tc);
            }
        }

        if !story.tags.is_empty() {
            let tags: Vec<String> = story.tags.iter().map(|t| format!("#{}", t)).collect();
            lines.push(Line::from(vec![
                Span::styled("  Etiquetas: ", muted),
                Span::styled(tags.join(" "), Style::default().fg(self.theme.purple)),
            ]));
        }

        lines
    }
}

impl Widget for StoryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines: Vec<Line> = Vec::new();
        for story in self.stories {
            lines.extend(self.story_lines(story, area.width));
            lines.push(Line::raw(""));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Priority, SubTask};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn bare_story() -> UserStory {
        UserStory {
            id: "HU1".to_string(),
            title: "Registro de usuarios".to_string(),
            gherkin: "Como visitante\nQuiero registrarme\nPara comprar".to_string(),
            acceptance_criteria: vec![],
            test_cases: vec![],
            story_points: 5,
            priority: Priority::Alta,
            dependencies: vec![],
            subtasks: vec![],
            sprint_assigned: None,
            status: "Backlog".to_string(),
            tags: vec![],
        }
    }

    fn flatten(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let theme = Theme::default();
        let story = bare_story();
        let list = StoryList::new(std::slice::from_ref(&story), &theme);
        let text = flatten(&list.story_lines(&story, 80));

        assert!(text.contains("HU1"));
        assert!(text.contains("Quiero registrarme"));
        assert!(!text.contains("Sprint"));
        assert!(!text.contains("Dependencias"));
        assert!(!text.contains("Subtareas"));
        assert!(!text.contains("Casos de prueba"));
        assert!(!text.contains("Etiquetas"));
    }

    #[test]
    fn test_full_story_card() {
        let theme = Theme::default();
        let mut story = bare_story();
        story.sprint_assigned = Some(2);
        story.dependencies = vec!["HU7".to_string()];
        story.acceptance_criteria = vec!["El correo es único".to_string()];
        story.subtasks = vec![
            SubTask {
                id: "ST1".to_string(),
                title: "Formulario".to_string(),
                description: None,
                estimated_hours: Some(4.5),
                status: "Pendiente".to_string(),
            },
            SubTask {
                id: "ST2".to_string(),
                title: "Validación".to_string(),
                description: None,
                estimated_hours: None,
                status: "Pendiente".to_string(),
            },
        ];
        story.test_cases = vec![TestCase {
            id: "TC1".to_string(),
            title: "Registro válido".to_string(),
            description: "Alta con datos correctos".to_string(),
            preconditions: Some("Usuario no registrado".to_string()),
            steps: vec!["Abrir formulario".to_string(), "Enviar".to_string()],
            expected_result: "Cuenta creada".to_string(),
            test_type: "functional".to_string(),
        }];
        story.tags = vec!["auth".to_string()];

        let list = StoryList::new(std::slice::from_ref(&story), &theme);
        let text = flatten(&list.story_lines(&story, 100));

        assert!(text.contains("Sprint 2"));
        assert!(text.contains("Dependencias: HU7"));
        assert!(text.contains("Formulario (4.5h)"));
        assert!(text.contains("• Validación\n"));
        assert!(text.contains("Precondiciones: Usuario no registrado"));
        assert!(text.contains("2. Enviar"));
        assert!(text.contains("Resultado esperado: Cuenta creada"));
        assert!(text.contains("#auth"));
    }

    #[test]
    fn test_priority_badge_color() {
        let theme = Theme::default();
        let story = bare_story();
        let backend = TestBackend::new(80, 6);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|f| {
                let list = StoryList::new(std::slice::from_ref(&story), &theme);
                f.render_widget(list, f.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..80)
            .map(|x| buffer.cell((x, 0)).unwrap().symbol().to_string())
            .collect();
        let x = row.find(" Alta ").unwrap() as u16;
        assert_eq!(buffer.cell((x + 1, 0)).unwrap().bg, theme.red);
    }
}
