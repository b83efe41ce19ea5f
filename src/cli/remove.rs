//! `tasklist remove` command implementation

use anyhow::Result;
use clap::Args;

use super::StoreArgs;
use crate::store::TaskStore;
use crate::sync::TaskSynchronizer;

#[derive(Args)]
pub struct RemoveArgs {
    /// Task ID, unique ID prefix, or exact title
    identifier: String,
}

async fn remove<S: TaskStore>(
    sync: &mut TaskSynchronizer<S>,
    args: &RemoveArgs,
) -> Result<String> {
    let (id, title) = {
        let task = super::resolve_task(&args.identifier, sync.tasks().as_slice())?;
        (task.id.clone(), task.title.clone())
    };

    sync.delete(&id).await?;
    Ok(format!("✓ Deleted '{}'", title))
}

pub async fn run(store: &StoreArgs, args: RemoveArgs) -> Result<()> {
    let mut sync = super::connect(store).await?;
    println!("{}", remove(&mut sync, &args).await?);
    Ok(())
}
