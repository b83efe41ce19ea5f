//! `tasklist add` command implementation

use anyhow::Result;
use clap::Args;

use super::StoreArgs;
use crate::store::TaskStore;
use crate::sync::TaskSynchronizer;

#[derive(Args)]
pub struct AddArgs {
    /// Task title (multiple words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    title: Vec<String>,
}

impl AddArgs {
    fn title(&self) -> String {
        self.title.join(" ")
    }
}

async fn add<S: TaskStore>(sync: &mut TaskSynchronizer<S>, args: &AddArgs) -> Result<String> {
    match sync.create(&args.title()).await? {
        Some(task) => Ok(format!("✓ Added '{}' ({})", task.title, task.id)),
        None => Ok("Nothing to add: title is empty.".to_string()),
    }
}

/// Creating only prepends, so the current rows are never fetched.
pub async fn run(store: &StoreArgs, args: AddArgs) -> Result<()> {
    let mut sync = super::open(store)?;
    println!("{}", add(&mut sync, &args).await?);
    Ok(())
}
