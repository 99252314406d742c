use std::io;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::autosave::PersistentBoard;
use crate::io::board_io::{BoardStore, FileBoardStore};
use crate::io::config_io::ThemeStore;
use crate::io::paths::Paths;
use crate::io::session::{Identity, SessionError, SessionStore};
use crate::model::board::Board;
use crate::model::column::ColumnId;
use crate::model::config::Config;
use crate::model::filter::FilterMode;
use crate::model::task::{self, Task};
use crate::ops::drag::{DragSession, DropOutcome};
use crate::ops::filter;

use super::input;
use super::render;
use super::theme::Theme;

/// Opens the board backend for a newly logged-in user
pub type StoreFactory = Box<dyn Fn() -> Box<dyn BoardStore>>;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task into the focused column
    Add,
    /// Carrying a task; h/l pick the column, j/k the slot
    Drag,
    /// Asking for a user name
    Login,
}

/// Main application state
pub struct App {
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub identity: Option<Identity>,
    /// `None` while logged out
    pub board: Option<PersistentBoard>,
    pub filter: FilterMode,
    pub drag: DragSession,
    pub focus: ColumnId,
    /// Cursor row per column, indexing the filtered view
    pub cursors: [usize; 3],
    /// Insertion slot in the hovered column while dragging (0..=len)
    pub drop_slot: usize,
    /// Prompt buffer for Add and Login
    pub input: String,
    /// One-off message for the status row
    pub status: Option<String>,
    pub today: NaiveDate,
    sessions: SessionStore,
    theme_store: ThemeStore,
    open_store: StoreFactory,
    seed_sample: bool,
}

impl App {
    pub fn new(
        sessions: SessionStore,
        theme_store: ThemeStore,
        open_store: StoreFactory,
        seed_sample: bool,
    ) -> Self {
        let theme = Theme::for_mode(theme_store.effective());
        let mut app = App {
            mode: Mode::Login,
            should_quit: false,
            theme,
            identity: None,
            board: None,
            filter: FilterMode::All,
            drag: DragSession::new(),
            focus: ColumnId::Todo,
            cursors: [0; 3],
            drop_slot: 0,
            input: String::new(),
            status: None,
            today: Local::now().date_naive(),
            sessions,
            theme_store,
            open_store,
            seed_sample,
        };
        if let Some(identity) = app.sessions.current() {
            app.enter_session(identity);
        }
        app
    }

    fn enter_session(&mut self, identity: Identity) {
        self.board = Some(PersistentBoard::open(
            (self.open_store)(),
            identity.storage_key(),
            self.seed_sample,
        ));
        self.identity = Some(identity);
        self.cursors = [0; 3];
        self.focus = ColumnId::Todo;
        self.mode = Mode::Navigate;
        // A seeded board is written straight away
        self.after_edit();
    }

    /// The board as displayed: filtered by the current mode
    pub fn view(&self) -> Board {
        match &self.board {
            Some(board) => filter::apply(board.board(), self.filter),
            None => Board::new(),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursors[self.focus.index()]
    }

    /// Task under the cursor in the focused column
    pub fn selected_task(&self) -> Option<Task> {
        self.view().column(self.focus).get(self.cursor()).cloned()
    }

    /// Keep every cursor inside its (filtered) column
    pub fn clamp_cursors(&mut self) {
        let view = self.view();
        for col in ColumnId::ALL {
            let len = view.column(col).len();
            let cursor = &mut self.cursors[col.index()];
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
    }

    /// Save if the board changed and surface a failed save
    fn after_edit(&mut self) {
        if let Some(board) = self.board.as_mut() {
            board.sync();
            if let Some(e) = board.take_save_error() {
                self.status = Some(format!("not saved: {}", e));
            }
        }
        self.clamp_cursors();
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn focus_prev(&mut self) {
        if let Some(col) = self.focus.prev() {
            self.focus = col;
        }
    }

    pub fn focus_next(&mut self) {
        if let Some(col) = self.focus.next() {
            self.focus = col;
        }
    }

    pub fn cursor_up(&mut self) {
        let cursor = &mut self.cursors[self.focus.index()];
        *cursor = cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        let len = self.view().column(self.focus).len();
        let cursor = &mut self.cursors[self.focus.index()];
        if *cursor + 1 < len {
            *cursor += 1;
        }
    }

    // -----------------------------------------------------------------------
    // Task actions
    // -----------------------------------------------------------------------

    pub fn toggle_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if let Some(board) = self.board.as_mut() {
            board.toggle(&task.id, self.focus);
        }
        self.after_edit();
    }

    pub fn delete_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if let Some(board) = self.board.as_mut() {
            board.delete(&task.id, self.focus);
        }
        self.after_edit();
    }

    pub fn begin_add(&mut self) {
        if self.board.is_some() {
            self.input.clear();
            self.mode = Mode::Add;
        }
    }

    /// Add the prompt's task to the focused column
    pub fn submit_add(&mut self) {
        let (text, due_date) = parse_add_input(&self.input);
        let added = self
            .board
            .as_mut()
            .and_then(|board| board.add(text, self.focus, due_date));
        self.input.clear();
        self.mode = Mode::Navigate;
        self.after_edit();
        if let Some(task) = added {
            // Point at the new task if the filter shows it
            if let Some(pos) = self.view().position_in(self.focus, &task.id) {
                self.cursors[self.focus.index()] = pos;
            }
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.input.clear();
        if self.mode == Mode::Add {
            self.mode = Mode::Navigate;
        }
    }

    // -----------------------------------------------------------------------
    // Drag
    // -----------------------------------------------------------------------

    /// Pick up the task under the cursor
    pub fn begin_drag(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        self.drag.begin_drag(task, self.focus);
        self.drag.hover(self.focus);
        self.drop_slot = self.cursor();
        self.mode = Mode::Drag;
    }

    /// Column the dragged task would land in
    pub fn drag_target_column(&self) -> Option<ColumnId> {
        self.drag
            .hover_column()
            .or_else(|| self.drag.dragged().map(|(_, source)| source))
    }

    /// Hover the column left (`-1`) or right (`+1`) of the current one;
    /// the slot moves to the end of that column
    pub fn drag_hover(&mut self, delta: i8) {
        let Some(current) = self.drag_target_column() else {
            return;
        };
        let next = if delta < 0 { current.prev() } else { current.next() };
        if let Some(col) = next {
            self.drag.hover(col);
            self.drop_slot = self.view().column(col).len();
        }
    }

    /// Move the drop slot up (`-1`) or down (`+1`)
    pub fn drag_slot(&mut self, delta: i8) {
        let Some(col) = self.drag_target_column() else {
            return;
        };
        let len = self.view().column(col).len();
        self.drop_slot = if delta < 0 {
            self.drop_slot.saturating_sub(1)
        } else {
            (self.drop_slot + 1).min(len)
        };
    }

    /// Drop before the task at the slot, or at the end of the column
    pub fn drop_drag(&mut self) {
        let Some(dest) = self.drag_target_column() else {
            self.mode = Mode::Navigate;
            return;
        };
        let target = self.view().column(dest).get(self.drop_slot).cloned();
        let outcome = match self.board.as_mut() {
            Some(board) => {
                let drag = &mut self.drag;
                board.edit(|store| drag.drop_on(store, target.as_ref(), dest))
            }
            None => {
                self.drag.cancel();
                DropOutcome::Ignored
            }
        };
        self.mode = Mode::Navigate;
        self.after_edit();
        if let DropOutcome::Moved { task_id, to, .. } = outcome {
            self.focus = to;
            if let Some(pos) = self.view().position_in(to, &task_id) {
                self.cursors[to.index()] = pos;
            }
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
        self.mode = Mode::Navigate;
    }

    // -----------------------------------------------------------------------
    // View settings
    // -----------------------------------------------------------------------

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.cycle();
        self.clamp_cursors();
    }

    /// Flip light/dark and persist the choice
    pub fn toggle_theme(&mut self) {
        let next = self.theme.mode.toggled();
        self.theme = Theme::for_mode(next);
        if let Err(e) = self.theme_store.save(next) {
            tracing::warn!(error = %e, "could not save theme preference");
            self.status = Some(format!("theme not saved: {}", e));
        }
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    /// Log in with the prompt's name. An empty name keeps the prompt open.
    pub fn submit_login(&mut self) {
        match self.sessions.login(&self.input) {
            Ok(identity) => {
                self.input.clear();
                self.status = None;
                self.enter_session(identity);
            }
            Err(SessionError::EmptyName) => {}
            Err(e) => {
                self.status = Some(e.to_string());
            }
        }
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.sessions.logout() {
            self.status = Some(e.to_string());
            return;
        }
        // Last chance to write a board whose earlier save failed
        if let Some(mut board) = self.board.take() {
            board.sync();
        }
        self.drag.cancel();
        self.identity = None;
        self.input.clear();
        self.mode = Mode::Login;
    }
}

/// Split prompt text into task text and an optional trailing `@YYYY-MM-DD`
pub fn parse_add_input(input: &str) -> (&str, Option<NaiveDate>) {
    let trimmed = input.trim_end();
    if let Some((text, last)) = trimmed.rsplit_once(char::is_whitespace)
        && let Some(date) = last.strip_prefix('@').and_then(task::parse_due_date)
    {
        return (text, Some(date));
    }
    (input, None)
}

/// Run the TUI application
pub fn run(paths: &Paths, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let boards_dir = paths.boards_dir(config.storage.dir.as_deref());
    let open_store: StoreFactory =
        Box::new(move || -> Box<dyn BoardStore> { Box::new(FileBoardStore::new(boards_dir.clone())) });
    let mut app = App::new(
        SessionStore::new(paths.session_file()),
        ThemeStore::new(paths.config_file()),
        open_store,
        config.board.seed_sample,
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.today = Local::now().date_naive();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
