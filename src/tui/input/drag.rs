use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

/// Keyboard drag: h/l choose the column, j/k the slot, Enter/m drop
pub(super) fn handle_drag(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => app.drag_hover(-1),
        KeyCode::Char('l') | KeyCode::Right => app.drag_hover(1),
        KeyCode::Char('k') | KeyCode::Up => app.drag_slot(-1),
        KeyCode::Char('j') | KeyCode::Down => app.drag_slot(1),
        KeyCode::Enter | KeyCode::Char('m') => app.drop_drag(),
        KeyCode::Esc => app.cancel_drag(),
        _ => {}
    }
}
