//! Terminal User Interface module

mod app;
mod components;
pub mod dialogs;
mod home;
mod styles;
mod sync_worker;

pub use app::*;
pub use styles::Theme;
pub use sync_worker::{SyncOutcome, SyncReply, SyncRequest, SyncWorker};

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;

use crate::config::Config;
use crate::store::RestStore;

pub async fn run(config: Config) -> Result<()> {
    // Fail on a bad store config before the terminal is taken over
    let store = RestStore::new(&config.store)?;
    let theme = Theme::from_name(&config.theme.name);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(SyncWorker::spawn(store), theme);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
