//! # todo — terminal to-do list
//!
//! A single-user to-do list for the terminal: an interactive UI for
//! adding, updating, checking off, printing, and deleting tasks, plus a
//! small CLI over the same storage for scripting.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive UI (also the default with no subcommand)
//! todo ui
//!
//! # Add a task via CLI
//! todo add "Buy milk" --deadline tomorrow --info "oat, not dairy"
//!
//! # List tasks
//! todo list
//!
//! # Pick a color theme
//! todo theme dark
//! ```
//!
//! Tasks are stored in a single SQLite file, `~/.todo/todo.db` by
//! default or wherever `--db` points. The chosen color theme is
//! remembered in `settings.json` next to the database.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod settings;
pub mod store;
pub mod task;
pub mod theme;
pub mod tui {
    pub mod app;
    pub mod enums;
    pub mod input;
    pub mod palette;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use store::Store;

fn main() {
    let cli = Cli::parse();

    // Completions need no storage at all.
    if let Some(Commands::Completions { shell }) = &cli.command {
        cmd_completions(*shell);
        return;
    }

    // Determine the data directory
    let data_dir = if let Some(db_path) = cli.db.as_ref() {
        db_path
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .to_path_buf()
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let dir = PathBuf::from(home).join(".todo");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("Failed to create data directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
        dir
    };
    let db_path = cli
        .db
        .unwrap_or_else(|| data_dir.join("todo.db"));

    match cli.command {
        None | Some(Commands::Ui) => cmd_ui(&db_path, &data_dir),

        Some(Commands::Theme { theme }) => cmd_theme(&data_dir, theme),

        Some(command) => {
            let mut store = match Store::open(&db_path) {
                Ok(store) => store,
                Err(e) => exit_store_error(e),
            };
            match command {
                Commands::Add { label, deadline, info } => {
                    cmd_add(&store, label, deadline, info)
                }
                Commands::List { json } => cmd_list(&store, json),
                Commands::View { id } => cmd_view(&store, id),
                Commands::Update { id, label, deadline, info } => {
                    cmd_update(&store, id, label, deadline, info)
                }
                Commands::Delete { ids } => cmd_delete(&mut store, ids),
                // Handled above.
                Commands::Ui | Commands::Theme { .. } | Commands::Completions { .. } => {
                    unreachable!()
                }
            }
        }
    }
}
