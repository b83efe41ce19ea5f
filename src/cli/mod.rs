//! CLI command implementations

pub mod add;
pub mod definition;
pub mod list;
pub mod remove;
pub mod toggle;

pub use definition::{Cli, Commands, StoreArgs};

use anyhow::{bail, Result};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::store::{RestStore, Task};
use crate::sync::TaskSynchronizer;

/// Build a synchronizer against the configured store without fetching.
pub fn open(args: &StoreArgs) -> Result<TaskSynchronizer<RestStore>> {
    let config = args.resolve()?;
    let store = RestStore::new(&config.store)?;
    Ok(TaskSynchronizer::new(store))
}

/// Like [`open`], then load the current rows.
pub async fn connect(args: &StoreArgs) -> Result<TaskSynchronizer<RestStore>> {
    let mut sync = open(args)?;
    sync.load().await?;
    Ok(sync)
}

/// Find a task by exact id, id prefix, or exact title, in that order.
pub fn resolve_task<'a>(identifier: &str, tasks: &'a [Task]) -> Result<&'a Task> {
    if let Some(task) = tasks.iter().find(|t| t.id.as_str() == identifier) {
        return Ok(task);
    }

    let prefixed: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.id.as_str().starts_with(identifier))
        .collect();
    match prefixed.as_slice() {
        [task] => return Ok(*task),
        [] => {}
        _ => bail!(
            "Ambiguous task id prefix '{}' ({} matches)",
            identifier,
            prefixed.len()
        ),
    }

    if let Some(task) = tasks.iter().find(|t| t.title == identifier) {
        return Ok(task);
    }

    bail!("Task not found: {}", identifier)
}

/// Truncate to a display width, ending in "..." when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }

    let (budget, ellipsis) = if max <= 3 { (max, "") } else { (max - 3, "...") };
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ellipsis);
    out
}

pub fn truncate_id(id: &str, max_len: usize) -> &str {
    match id.char_indices().nth(max_len) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}
