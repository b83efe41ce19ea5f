//! xtask - Development tasks for tasklist

use clap::{Parser, Subcommand};
use std::fs;
use std::path::Path;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for tasklist")]
struct Xtask {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the CLI reference to docs/cli/reference.md
    GenDocs,
}

fn main() {
    let args = Xtask::parse();
    match args.command {
        Commands::GenDocs => write_cli_reference(),
    }
}

fn write_cli_reference() {
    let markdown = clap_markdown::help_markdown::<tasklist::cli::Cli>();

    let out_dir = Path::new("docs/cli");
    fs::create_dir_all(out_dir).expect("Failed to create docs/cli directory");

    let out_path = out_dir.join("reference.md");
    fs::write(&out_path, markdown).expect("Failed to write CLI reference");

    println!("Wrote {}", out_path.display());
}
