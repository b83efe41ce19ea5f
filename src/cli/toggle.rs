//! `tasklist toggle` command implementation

use anyhow::Result;
use clap::Args;

use super::StoreArgs;
use crate::store::TaskStore;
use crate::sync::TaskSynchronizer;

#[derive(Args)]
pub struct ToggleArgs {
    /// Task ID, unique ID prefix, or exact title
    identifier: String,
}

async fn toggle<S: TaskStore>(
    sync: &mut TaskSynchronizer<S>,
    args: &ToggleArgs,
) -> Result<String> {
    let (id, title) = {
        let task = super::resolve_task(&args.identifier, sync.tasks().as_slice())?;
        (task.id.clone(), task.title.clone())
    };

    let completed = sync.toggle(&id).await?;
    let mark = if completed { "completed" } else { "reopened" };
    Ok(format!("✓ {} '{}'", capitalize(mark), title))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub async fn run(store: &StoreArgs, args: ToggleArgs) -> Result<()> {
    let mut sync = super::connect(store).await?;
    println!("{}", toggle(&mut sync, &args).await?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{MemoryStore, StoreOp};

    fn args(identifier: &str) -> ToggleArgs {
        ToggleArgs {
            identifier: identifier.to_string(),
        }
    }

    #[tokio::test]
    async fn test_toggle_by_title_round_trip() {
        let store = MemoryStore::new();
        store.seed("Walk dog");
        let mut sync = TaskSynchronizer::new(store.clone());
        sync.load().await.unwrap();

        let msg = toggle(&mut sync, &args("Walk dog")).await.unwrap();
        assert_eq!(msg, "✓ Completed 'Walk dog'");
        assert!(store.rows()[0].completed);

        let msg = toggle(&mut sync, &args("Walk dog")).await.unwrap();
        assert_eq!(msg, "✓ Reopened 'Walk dog'");
        assert!(!store.rows()[0].completed);
    }

    #[tokio::test]
    async fn test_toggle_unknown_task_makes_no_call() {
        let store = MemoryStore::new();
        let mut sync = TaskSynchronizer::new(store.clone());
        sync.load().await.unwrap();

        assert!(toggle(&mut sync, &args("nope")).await.is_err());
        assert_eq!(store.calls(StoreOp::Update), 0);
    }
}
