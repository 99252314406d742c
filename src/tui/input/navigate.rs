use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    app.status = None;
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('h') | KeyCode::Left => app.focus_prev(),
        KeyCode::Char('l') | KeyCode::Right => app.focus_next(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('a') => app.begin_add(),
        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_selected(),
        KeyCode::Char('d') => app.delete_selected(),
        KeyCode::Char('m') => app.begin_drag(),
        KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('L') => app.logout(),
        _ => {}
    }
}
