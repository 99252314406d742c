use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::push_right_aligned;
use crate::model::filter::FilterMode;
use crate::tui::app::App;

/// Title, welcome line and theme indicator
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let fill = Style::default().bg(bg);
    let mut spans = vec![
        Span::styled(" ", fill),
        Span::styled(
            "Kanban",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(identity) = &app.identity {
        spans.push(Span::styled("  ", fill));
        spans.push(Span::styled(
            format!("Welcome, {}", identity.name),
            Style::default().fg(app.theme.text).bg(bg),
        ));
    }
    let theme = vec![Span::styled(
        format!("{} {} ", app.theme.icon(), app.theme.mode),
        Style::default().fg(app.theme.dim).bg(bg),
    )];
    push_right_aligned(&mut spans, theme, area.width as usize, fill);

    frame.render_widget(Paragraph::new(Line::from(spans)).style(fill), area);
}

/// Filter choices with the active one highlighted
pub fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let fill = Style::default().bg(bg);
    let mut spans = vec![Span::styled(
        " Show:",
        Style::default().fg(app.theme.dim).bg(bg),
    )];
    for mode in FilterMode::ALL {
        spans.push(Span::styled(" ", fill));
        let style = if mode == app.filter {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        spans.push(Span::styled(format!(" {} ", mode.title()), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(fill), area);
}
