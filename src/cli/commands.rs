use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kb", about = concat!("kb v", env!("CARGO_PKG_VERSION"), " - a three-column task board"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Keep config, boards and session under this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a session as NAME
    Login(LoginArgs),
    /// End the current session
    Logout,
    /// Show who is logged in
    Whoami,
    /// List tasks by column
    List(ListArgs),
    /// Add a task (prints its id)
    Add(AddArgs),
    /// Flip a task between open and completed
    Toggle(IdArgs),
    /// Permanently delete a task
    Rm(IdArgs),
    /// Move a task to a column, or reorder within one
    Mv(MvArgs),
    /// Show or change the colour theme
    Theme(ThemeArgs),
}

// ---------------------------------------------------------------------------
// Session args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LoginArgs {
    /// User name (leading/trailing whitespace is ignored)
    pub name: String,
}

// ---------------------------------------------------------------------------
// Board args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Which tasks to show (all, active, completed)
    #[arg(long, default_value = "all")]
    pub filter: String,
    /// Only this column (todo, in-progress, done)
    #[arg(long)]
    pub column: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// Column to add to
    #[arg(long, default_value = "todo")]
    pub column: String,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task ID to move
    pub id: String,
    /// Destination column (todo, in-progress, done)
    pub column: String,
    /// Place before this task ID (default: end of column)
    #[arg(long)]
    pub before: Option<String>,
}

#[derive(Args)]
pub struct ThemeArgs {
    /// light, dark or toggle (omit to show the current theme)
    pub mode: Option<String>,
}
