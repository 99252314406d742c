use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::push_right_aligned;
use crate::tui::app::{App, Mode};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let fill = Style::default().bg(bg);
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let bright = Style::default().fg(app.theme.text_bright).bg(bg);
    let cursor = Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg));

    let (mut spans, hint) = match app.mode {
        Mode::Navigate => {
            let left = match &app.status {
                Some(msg) => vec![Span::styled(
                    format!(" {}", msg),
                    Style::default().fg(app.theme.red).bg(bg),
                )],
                None => Vec::new(),
            };
            (left, "a add  m move  f filter  t theme  L logout  q quit")
        }
        Mode::Add => (
            vec![
                Span::styled(format!(" New in {}: ", app.focus.title()), dim),
                Span::styled(app.input.clone(), bright),
                cursor,
            ],
            "Enter add  Esc cancel",
        ),
        Mode::Drag => {
            let text = app
                .drag
                .dragged()
                .map(|(task, _)| task.text.clone())
                .unwrap_or_default();
            let dest = app
                .drag_target_column()
                .map(|col| col.title())
                .unwrap_or_default();
            (
                vec![
                    Span::styled(" Moving ", dim),
                    Span::styled(text, bright),
                    Span::styled(format!(" \u{2192} {}", dest), dim),
                ],
                "Enter drop  Esc cancel",
            )
        }
        Mode::Login => {
            let left = match &app.status {
                Some(msg) => vec![Span::styled(
                    format!(" {}", msg),
                    Style::default().fg(app.theme.red).bg(bg),
                )],
                None => Vec::new(),
            };
            (left, "Esc quit")
        }
    };
    push_right_aligned(&mut spans, vec![Span::styled(format!("{} ", hint), dim)], width, fill);

    let paragraph = Paragraph::new(Line::from(spans)).style(fill);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use tempfile::TempDir;

    fn render(app: &App) -> String {
        render_to_string(60, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn navigate_hints() {
        let tmp = TempDir::new().unwrap();
        let app = test_app(&tmp, Some("alice"));
        insta::assert_snapshot!(render(&app), @"         a add  m move  f filter  t theme  L logout  q quit");
    }

    #[test]
    fn add_prompt() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp, Some("alice"));
        app.begin_add();
        app.input = "Buy milk".into();
        insta::assert_snapshot!(render(&app), @" New in To Do: Buy milk▌              Enter add  Esc cancel");
    }

    #[test]
    fn drag_summary() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp, Some("alice"));
        app.focus = app.focus.next().unwrap();
        app.begin_drag();
        app.drag_hover(1);
        insta::assert_snapshot!(render(&app), @" Moving Scope tasks to logged-in user → Done");
    }

    #[test]
    fn status_message_replaces_blank() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp, Some("alice"));
        app.status = Some("not saved".into());
        let output = render(&app);
        assert!(output.starts_with(" not saved"));
    }
}
