//! tasklist - to-do list backed by a hosted REST table

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tasklist::cli::{self, Cli, Commands};
use tasklist::config::get_app_dir;
use tasklist::tui;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.is_none());

    match cli.command {
        Some(Commands::Completion { shell }) => {
            generate(shell, &mut Cli::command(), "tasklist", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::List(args)) => cli::list::run(&cli.store, args).await,
        Some(Commands::Add(args)) => cli::add::run(&cli.store, args).await,
        Some(Commands::Toggle(args)) => cli::toggle::run(&cli.store, args).await,
        Some(Commands::Remove(args)) => cli::remove::run(&cli.store, args).await,
        None => tui::run(cli.store.resolve()?).await,
    }
}

/// Filter directives for the subscriber, or `None` to leave logging off.
///
/// `TASKLIST_DEBUG` wins over `RUST_LOG`. Without either, the CLI still
/// reports errors on stderr; the TUI stays silent since it owns the screen.
fn log_directives(for_tui: bool, debug: bool, rust_log: Option<&str>) -> Option<String> {
    if debug {
        return Some("tasklist=debug".to_string());
    }
    match rust_log {
        Some(directives) => Some(directives.to_string()),
        None if for_tui => None,
        None => Some("tasklist=error".to_string()),
    }
}

/// The TUI logs to `debug.log` in the app dir instead of the terminal.
fn init_logging(for_tui: bool) {
    let debug = std::env::var("TASKLIST_DEBUG").is_ok();
    let rust_log = std::env::var("RUST_LOG").ok();
    let Some(directives) = log_directives(for_tui, debug, rust_log.as_deref()) else {
        return;
    };
    let filter = EnvFilter::new(directives);

    if !for_tui {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    let log_file = get_app_dir().ok().and_then(|dir| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("debug.log"))
            .ok()
    });

    if let Some(file) = log_file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }
}
