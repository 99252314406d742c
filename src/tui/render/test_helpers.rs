use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::style::Color;
use tempfile::TempDir;

use crate::io::board_io::{BoardStore, FileBoardStore};
use crate::io::config_io::ThemeStore;
use crate::io::session::SessionStore;
use crate::model::config::ThemeMode;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

fn draw<F>(w: u16, h: u16, f: F) -> ratatui::buffer::Buffer
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();
    terminal.backend().buffer().clone()
}

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let buf = draw(w, h, f);
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Background colour of one cell after rendering
pub fn cell_bg<F>(w: u16, h: u16, f: F, x: u16, y: u16) -> Color
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let buf = draw(w, h, f);
    buf[(x, y)].bg
}

/// An app backed by files under `tmp`, optionally with `user` logged in.
/// Uses the light theme and a fixed "today" of 2025-01-01.
pub fn test_app(tmp: &TempDir, user: Option<&str>) -> App {
    let sessions = SessionStore::new(tmp.path().join("session.json"));
    if let Some(name) = user {
        sessions.login(name).unwrap();
    }
    let theme_store = ThemeStore::new(tmp.path().join("config.toml"));
    if theme_store.load().is_none() {
        theme_store.save(ThemeMode::Light).unwrap();
    }
    let boards = tmp.path().join("boards");
    let mut app = App::new(
        sessions,
        theme_store,
        Box::new(move || -> Box<dyn BoardStore> { Box::new(FileBoardStore::new(boards.clone())) }),
        true,
    );
    app.today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    app
}
