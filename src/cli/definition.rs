//! Command-line definition

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::add::AddArgs;
use super::list::ListArgs;
use super::remove::RemoveArgs;
use super::toggle::ToggleArgs;
use crate::config::{Config, StoreOverrides};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(version, about = "Task list backed by a hosted PostgREST table")]
#[command(long_about = "Task list backed by a hosted PostgREST table.\n\n\
    Run without a subcommand to open the interactive list.")]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Table store URL (e.g. https://abcd.supabase.co)
    #[arg(long, env = "TASKLIST_URL", global = true)]
    pub url: Option<String>,

    /// API key sent as `apikey` and bearer token
    #[arg(long, env = "TASKLIST_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Table holding the tasks
    #[arg(long, env = "TASKLIST_TABLE", global = true)]
    pub table: Option<String>,

    /// Config file (defaults to the app config directory)
    #[arg(long, env = "TASKLIST_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

impl StoreArgs {
    /// Config file contents with flag and environment values applied on top.
    pub fn resolve(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        config.store.apply(&StoreOverrides {
            url: self.url.clone(),
            api_key: self.api_key.clone(),
            table: self.table.clone(),
        });
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks, newest first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Add a task
    Add(AddArgs),

    /// Toggle a task between open and completed
    Toggle(ToggleArgs),

    /// Delete a task
    #[command(alias = "rm")]
    Remove(RemoveArgs),

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
