use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

/// Centered name prompt shown while logged out
pub fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width.min(44);
    let height = area.height.min(5);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .title(Span::styled(
            " Log in ",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));

    let lines = vec![
        Line::from(vec![
            Span::styled("Name: ", Style::default().fg(app.theme.dim).bg(bg)),
            Span::styled(app.input.clone(), Style::default().fg(app.theme.text_bright).bg(bg)),
            Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to continue",
            Style::default().fg(app.theme.dim).bg(bg),
        ))
        .alignment(Alignment::Right),
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
