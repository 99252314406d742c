use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::util::unicode::prev_grapheme_boundary;

/// Line editing for the add and login prompts
pub(super) fn handle_prompt(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => match app.mode {
            Mode::Login => app.submit_login(),
            _ => app.submit_add(),
        },
        KeyCode::Esc => {
            if app.mode == Mode::Login {
                app.should_quit = true;
            } else {
                app.cancel_prompt();
            }
        }
        KeyCode::Backspace => {
            if let Some(at) = prev_grapheme_boundary(&app.input, app.input.len()) {
                app.input.truncate(at);
            }
        }
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            app.input.push(c);
        }
        _ => {}
    }
}
