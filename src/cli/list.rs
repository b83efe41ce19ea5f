//! `tasklist list` command implementation

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::StoreArgs;
use crate::store::Task;
use crate::sync::TaskList;

const TABLE_COL_ID: usize = 10;
const TABLE_COL_STATUS: usize = 6;
const TABLE_COL_TITLE: usize = 44;

#[derive(Args, Default)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Only open tasks
    #[arg(long, conflicts_with = "done")]
    pending: bool,

    /// Only completed tasks
    #[arg(long)]
    done: bool,
}

#[derive(Serialize)]
struct TaskJson<'a> {
    id: &'a str,
    title: &'a str,
    completed: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl ListArgs {
    fn wants(&self, task: &Task) -> bool {
        if self.pending {
            !task.completed
        } else if self.done {
            task.completed
        } else {
            true
        }
    }
}

fn table_header() -> String {
    format!(
        "{:<width_id$} {:<width_status$} {:<width_title$} CREATED\n{}",
        "ID",
        "STATUS",
        "TITLE",
        "-".repeat(TABLE_COL_ID + TABLE_COL_STATUS + TABLE_COL_TITLE + 20 + 3),
        width_id = TABLE_COL_ID,
        width_status = TABLE_COL_STATUS,
        width_title = TABLE_COL_TITLE,
    )
}

fn table_row(task: &Task) -> String {
    let status = if task.completed { "[x]" } else { "[ ]" };
    let title = super::truncate(&task.title, TABLE_COL_TITLE);
    // Pad by display width; `{:<}` counts chars, not columns.
    let pad = TABLE_COL_TITLE.saturating_sub(unicode_width::UnicodeWidthStr::width(title.as_str()));
    format!(
        "{:<width_id$} {:<width_status$} {}{} {}",
        super::truncate_id(task.id.as_str(), TABLE_COL_ID),
        status,
        title,
        " ".repeat(pad),
        task.created_at.format("%Y-%m-%d %H:%M"),
        width_id = TABLE_COL_ID,
        width_status = TABLE_COL_STATUS,
    )
}

fn render(tasks: &TaskList, args: &ListArgs) -> Result<String> {
    let shown: Vec<&Task> = tasks.iter().filter(|t| args.wants(t)).collect();

    if args.json {
        let rows: Vec<TaskJson> = shown
            .iter()
            .map(|t| TaskJson {
                id: t.id.as_str(),
                title: &t.title,
                completed: t.completed,
                created_at: t.created_at,
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&rows)?);
    }

    if tasks.is_empty() {
        return Ok("No tasks yet. Add one with 'tasklist add <title>'.".to_string());
    }

    let mut out = vec![table_header()];
    out.extend(shown.iter().map(|t| table_row(t)));
    out.push(String::new());
    out.push(tasks.summary());
    Ok(out.join("\n"))
}

pub async fn run(store: &StoreArgs, args: ListArgs) -> Result<()> {
    let sync = super::connect(store).await?;
    println!("{}", render(sync.tasks(), &args)?);
    Ok(())
}
