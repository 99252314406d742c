use std::error::Error;

use chrono::{Local, NaiveDate};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::autosave::PersistentBoard;
use crate::io::board_io::FileBoardStore;
use crate::io::config_io::ThemeStore;
use crate::io::lock::FileLock;
use crate::io::paths::Paths;
use crate::io::session::{Identity, SessionStore};
use crate::model::column::ColumnId;
use crate::model::config::{Config, ThemeMode};
use crate::model::filter::FilterMode;
use crate::model::task::{self, Task};
use crate::ops::filter;

type CmdResult = Result<(), Box<dyn Error>>;

/// Everything a command needs, resolved once by `main`
pub struct Env<'a> {
    pub paths: &'a Paths,
    pub config: &'a Config,
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(command: Commands, env: &Env) -> CmdResult {
    match command {
        // Session
        Commands::Login(args) => cmd_login(args, env),
        Commands::Logout => cmd_logout(env),
        Commands::Whoami => cmd_whoami(env),

        // Read commands
        Commands::List(args) => cmd_list(args, env),

        // Write commands
        Commands::Add(args) => cmd_add(args, env),
        Commands::Toggle(args) => cmd_toggle(args, env),
        Commands::Rm(args) => cmd_rm(args, env),
        Commands::Mv(args) => cmd_mv(args, env),

        Commands::Theme(args) => cmd_theme(args, env),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sessions(env: &Env) -> SessionStore {
    SessionStore::new(env.paths.session_file())
}

fn require_identity(env: &Env) -> Result<Identity, Box<dyn Error>> {
    sessions(env)
        .current()
        .ok_or_else(|| "not logged in (run `kb login <name>`)".into())
}

fn boards_dir(env: &Env) -> std::path::PathBuf {
    env.paths.boards_dir(env.config.storage.dir.as_deref())
}

/// Open the logged-in user's board
fn open_board(env: &Env) -> Result<PersistentBoard, Box<dyn Error>> {
    let identity = require_identity(env)?;
    let store = FileBoardStore::new(boards_dir(env));
    Ok(PersistentBoard::open(
        Box::new(store),
        identity.storage_key(),
        env.config.board.seed_sample,
    ))
}

/// Surface a failed save: a one-shot command gets no later chance to retry
fn check_saved(board: &mut PersistentBoard) -> CmdResult {
    match board.take_save_error() {
        Some(e) => Err(format!("change not saved: {}", e).into()),
        None => Ok(()),
    }
}

fn parse_column(s: &str) -> Result<ColumnId, Box<dyn Error>> {
    Ok(s.parse::<ColumnId>()?)
}

fn find_task(board: &PersistentBoard, id: &str) -> Result<(ColumnId, Task), Box<dyn Error>> {
    board
        .board()
        .find(id)
        .map(|(col, t)| (col, t.clone()))
        .ok_or_else(|| format!("task not found: {}", id).into())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn print_task(task: &Task, env: &Env) -> CmdResult {
    if env.json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task, today()))?);
    } else {
        println!("{}", format_task_line(task, today()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Session commands
// ---------------------------------------------------------------------------

fn cmd_login(args: LoginArgs, env: &Env) -> CmdResult {
    let identity = sessions(env).login(&args.name)?;
    if env.json {
        let out = WhoamiJson {
            name: Some(identity.name),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Welcome, {}", identity.name);
    }
    Ok(())
}

fn cmd_logout(env: &Env) -> CmdResult {
    sessions(env).logout()?;
    Ok(())
}

fn cmd_whoami(env: &Env) -> CmdResult {
    if env.json {
        let out = WhoamiJson {
            name: sessions(env).current().map(|id| id.name),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    let identity = require_identity(env)?;
    println!("{}", identity.name);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, env: &Env) -> CmdResult {
    let mode: FilterMode = args.filter.parse()?;
    let columns = match args.column.as_deref() {
        Some(c) => vec![parse_column(c)?],
        None => ColumnId::ALL.to_vec(),
    };
    let board = open_board(env)?;
    let view = filter::apply(board.board(), mode);

    if env.json {
        let out = board_to_json(&view, &columns, today());
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_board(&view, &columns, today()) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, env: &Env) -> CmdResult {
    let column = parse_column(&args.column)?;
    let due_date = args
        .due
        .as_deref()
        .map(|d| task::parse_due_date(d).ok_or_else(|| format!("invalid due date '{}' (expected YYYY-MM-DD)", d)))
        .transpose()?;

    let _lock = FileLock::acquire_default(&boards_dir(env))?;
    let mut board = open_board(env)?;
    let task = board
        .add(&args.text, column, due_date)
        .ok_or("task text must not be empty")?;
    check_saved(&mut board)?;

    if env.json {
        let out = AddedJson {
            id: task.id,
            column,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", task.id);
    }
    Ok(())
}

fn cmd_toggle(args: IdArgs, env: &Env) -> CmdResult {
    let _lock = FileLock::acquire_default(&boards_dir(env))?;
    let mut board = open_board(env)?;
    let (column, _) = find_task(&board, &args.id)?;
    board.toggle(&args.id, column);
    check_saved(&mut board)?;

    let (_, task) = find_task(&board, &args.id)?;
    print_task(&task, env)
}

fn cmd_rm(args: IdArgs, env: &Env) -> CmdResult {
    let _lock = FileLock::acquire_default(&boards_dir(env))?;
    let mut board = open_board(env)?;
    let (column, _) = find_task(&board, &args.id)?;
    board.delete(&args.id, column);
    check_saved(&mut board)
}

fn cmd_mv(args: MvArgs, env: &Env) -> CmdResult {
    let to = parse_column(&args.column)?;

    let _lock = FileLock::acquire_default(&boards_dir(env))?;
    let mut board = open_board(env)?;
    let (from, _) = find_task(&board, &args.id)?;

    if let Some(ref before) = args.before {
        let before_col = board.board().locate(before);
        if before_col != Some(to) {
            return Err(format!("before target not found in {}: {}", to, before).into());
        }
    }

    board.move_task(&args.id, from, to, args.before.as_deref());
    check_saved(&mut board)?;

    let (_, task) = find_task(&board, &args.id)?;
    print_task(&task, env)
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

fn cmd_theme(args: ThemeArgs, env: &Env) -> CmdResult {
    let store = ThemeStore::new(env.paths.config_file());
    let saved = store.load();
    let current = saved.unwrap_or_else(crate::io::config_io::system_theme);

    let (theme, system) = match args.mode.as_deref() {
        None => (current, saved.is_none()),
        Some("toggle") => {
            let next = current.toggled();
            store.save(next)?;
            (next, false)
        }
        Some(mode) => {
            let next: ThemeMode = mode.parse()?;
            store.save(next)?;
            (next, false)
        }
    };

    if env.json {
        let out = ThemeJson {
            theme: theme.to_string(),
            system,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if system {
        println!("{} (system)", theme);
    } else {
        println!("{}", theme);
    }
    Ok(())
}
