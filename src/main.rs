use std::path::Path;

use clap::Parser;
use kanban::cli::commands::Cli;
use kanban::cli::handlers::{self, Env};
use kanban::io::config_io;
use kanban::io::logging::{self, LOG_ENV, LogTarget};
use kanban::io::paths::Paths;
use kanban::model::config::Config;

fn main() {
    let cli = Cli::parse();
    let paths = Paths::resolve(cli.home.as_deref().map(Path::new));

    // A broken config falls back to defaults; reported once logging is up
    let (config, config_error) = match config_io::read_config(&paths.config_file()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let directive = logging::filter_directive(
        std::env::var(LOG_ENV).ok().as_deref(),
        cli.verbose,
        config.log.level.as_deref(),
    );
    // The TUI owns the terminal, so its log goes to a file
    let target = match cli.command {
        None => LogTarget::File(paths.log_file()),
        Some(_) => LogTarget::Stderr,
    };
    if let Err(e) = logging::init(&target, &directive) {
        eprintln!("warning: logging disabled: {}", e);
    }
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "ignoring unreadable config, using defaults");
    }

    let result = match cli.command {
        // No subcommand → launch TUI
        None => kanban::tui::run(&paths, &config),
        Some(command) => handlers::dispatch(
            command,
            &Env {
                paths: &paths,
                config: &config,
                json: cli.json,
            },
        ),
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
