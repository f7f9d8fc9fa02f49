use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Terminal to-do list backed by a local SQLite file.
/// Storage defaults to ~/.todo/todo.db or a path passed via --db.
#[derive(Parser)]
#[command(name = "todo", version, about = "To-do list for the terminal")]
pub struct Cli {
    /// Path to the SQLite database file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Subcommand to run; launches the interactive UI when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
