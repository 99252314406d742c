use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::helpers::{check_symbol, spans_width};
use crate::model::board::Board;
use crate::model::column::ColumnId;
use crate::model::task::Task;
use crate::ops::filter;
use crate::tui::app::{App, Mode};
use crate::util::unicode;

/// Three side-by-side columns of the filtered board
pub fn render_board(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.view();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);
    let counts = filter::column_counts(&view);
    for col in ColumnId::ALL {
        render_column(frame, app, &view, col, counts[col.index()], chunks[col.index()]);
    }
}

fn render_column(frame: &mut Frame, app: &App, view: &Board, col: ColumnId, count: usize, area: Rect) {
    let bg = app.theme.background;
    let dragging = app.mode == Mode::Drag;
    let focused = !dragging && app.focus == col;
    let drop_here = dragging && app.drag_target_column() == Some(col);
    let tasks = view.column(col);

    let border_color = if focused || drop_here {
        app.theme.highlight
    } else {
        app.theme.border
    };
    let title = Span::styled(
        format!(" {} ({}) ", col.title(), count),
        Style::default()
            .fg(if focused { app.theme.text_bright } else { app.theme.text })
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).bg(bg))
        .title(title)
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let dragged_id = app.drag.dragged().map(|(task, _)| task.id.as_str());
    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0;

    for (i, task) in tasks.iter().enumerate() {
        if drop_here && i == app.drop_slot {
            selected_line = lines.len();
            lines.push(drop_marker(app, width));
        }
        let selected = focused && i == app.cursor();
        if selected {
            selected_line = lines.len();
        }
        let carried = dragged_id == Some(task.id.as_str());
        lines.push(task_line(app, task, width, selected, carried));
    }
    if drop_here && app.drop_slot >= tasks.len() {
        selected_line = lines.len();
        lines.push(drop_marker(app, width));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "(empty)",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    // Keep the cursor (or drop slot) on screen
    let height = inner.height as usize;
    let scroll = selected_line.saturating_sub(height.saturating_sub(1));
    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(bg))
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, inner);
}

/// One task row: checkbox, text (truncated), due date
fn task_line<'a>(app: &App, task: &'a Task, width: usize, selected: bool, carried: bool) -> Line<'a> {
    let bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let mut text_style = Style::default().fg(app.theme.text).bg(bg);
    if task.completed {
        text_style = text_style.fg(app.theme.dim);
    }
    if selected {
        text_style = text_style.fg(app.theme.text_bright);
    }
    if carried {
        text_style = text_style.fg(app.theme.dim).add_modifier(Modifier::ITALIC);
    }

    let check_color = if task.completed {
        app.theme.green
    } else {
        app.theme.dim
    };
    let mut spans = vec![
        Span::styled(check_symbol(task.completed), Style::default().fg(check_color).bg(bg)),
        Span::styled(" ", Style::default().bg(bg)),
    ];

    let due = task.due_date.map(|d| {
        let overdue = task.is_overdue(app.today);
        let label = if overdue {
            format!(" {}!", d.format("%Y-%m-%d"))
        } else {
            format!(" {}", d.format("%Y-%m-%d"))
        };
        let color = if overdue { app.theme.red } else { app.theme.yellow };
        Span::styled(label, Style::default().fg(color).bg(bg))
    });
    let due_width = due.as_ref().map_or(0, |s| unicode::display_width(&s.content));

    let budget = width.saturating_sub(spans_width(&spans) + due_width);
    spans.push(Span::styled(unicode::truncate_to_width(&task.text, budget), text_style));
    if let Some(due) = due {
        // Drop the date rather than squeeze the text to nothing
        if budget >= 4 {
            spans.push(due);
        }
    }
    if selected {
        let used = spans_width(&spans);
        if used < width {
            spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
        }
    }
    Line::from(spans)
}

/// Insertion marker shown in the hovered column while dragging
fn drop_marker<'a>(app: &App, width: usize) -> Line<'a> {
    let label = app
        .drag
        .dragged()
        .map(|(task, _)| unicode::truncate_to_width(&task.text, width.saturating_sub(2)))
        .unwrap_or_default();
    let used = 2 + unicode::display_width(&label);
    let mut spans = vec![
        Span::styled(
            "\u{25B8} ",
            Style::default().fg(app.theme.highlight).bg(app.theme.background),
        ),
        Span::styled(
            label,
            Style::default()
                .fg(app.theme.highlight)
                .bg(app.theme.background)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if used < width {
        spans.push(Span::styled(
            " ".repeat(width - used),
            Style::default().bg(app.theme.background),
        ));
    }
    Line::from(spans)
}
