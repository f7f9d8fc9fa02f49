//! Command implementations for the CLI interface.
//!
//! This module contains the handlers for the subcommands exposed by the
//! binary, from basic CRUD operations against the store to launching
//! the interactive UI.

use std::path::Path;

use chrono::Local;
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::settings::Settings;
use crate::store::{
    format_date, format_deadline_relative, parse_deadline_input, Store, StoreError,
};
use crate::theme::Theme;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// Add a new task.
    Add {
        /// Label for the task.
        label: String,
        /// Deadline: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long, default_value = "today")]
        deadline: String,
        /// Additional free-text notes.
        #[arg(long, default_value = "")]
        info: String,
    },

    /// List all tasks.
    List {
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// View a single task by id.
    View {
        /// Task id to view.
        id: i64,
    },

    /// Update fields on a task. Omitted fields keep their value.
    Update {
        /// Task id to update.
        id: i64,
        /// New label.
        #[arg(long)]
        label: Option<String>,
        /// New deadline: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        deadline: Option<String>,
        /// New free-text notes.
        #[arg(long)]
        info: Option<String>,
    },

    /// Delete tasks by id.
    Delete {
        /// Task ids to delete.
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Set the color theme, or show the current one.
    Theme {
        /// Theme to apply. Omit to show the active theme.
        #[arg(value_enum)]
        theme: Option<Theme>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Target shell.
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

/// Launch the interactive UI.
pub fn cmd_ui(db_path: &Path, data_dir: &Path) {
    if let Err(e) = run_tui(db_path, data_dir) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task to the store.
pub fn cmd_add(store: &Store, label: String, deadline: String, info: String) {
    let Some(deadline) = parse_deadline_input(&deadline) else {
        eprintln!("Unrecognised deadline: {deadline}");
        std::process::exit(1);
    };
    let today = Local::now().date_naive();

    match store.create(&label, today, deadline, &info) {
        Ok(id) => println!("Added task {id}: {label}"),
        Err(e) => {
            eprintln!("Failed to add task: {e}");
            std::process::exit(1);
        }
    }
}

/// Print every task, as a table or as JSON.
pub fn cmd_list(store: &Store, json: bool) {
    let tasks = match store.read_all() {
        Ok(tasks) => tasks,
        Err(e) => {
            eprintln!("Failed to read tasks: {e}");
            std::process::exit(1);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks).unwrap());
        return;
    }

    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }

    let today = Local::now().date_naive();
    println!("{:<5} {:<12} {:<10} {}", "ID", "Added", "Deadline", "Label");
    for t in &tasks {
        let mut line = format!(
            "{:<5} {:<12} {:<10} {}",
            t.id,
            format_date(t.date_added),
            format_deadline_relative(t.deadline, today),
            t.label,
        );
        if !t.info.is_empty() {
            line.push_str(&format!(" ({})", t.info));
        }
        println!("{line}");
    }
}

/// Show the full record of one task.
pub fn cmd_view(store: &Store, id: i64) {
    let tasks = match store.read_all() {
        Ok(tasks) => tasks,
        Err(e) => {
            eprintln!("Failed to read tasks: {e}");
            std::process::exit(1);
        }
    };
    let Some(task) = tasks.iter().find(|t| t.id == id) else {
        eprintln!("Task {id} not found.");
        std::process::exit(1);
    };

    println!("Task:     {}", task.label);
    println!("Id:       {}", task.id);
    println!("Added:    {}", format_date(task.date_added));
    println!("Deadline: {}", format_date(task.deadline));
    if !task.info.is_empty() {
        println!("Info:     {}", task.info);
    }
}

/// Update the editable fields of a task; omitted fields keep the
/// stored value.
pub fn cmd_update(
    store: &Store,
    id: i64,
    label: Option<String>,
    deadline: Option<String>,
    info: Option<String>,
) {
    let tasks = match store.read_all() {
        Ok(tasks) => tasks,
        Err(e) => {
            eprintln!("Failed to read tasks: {e}");
            std::process::exit(1);
        }
    };
    let Some(current) = tasks.iter().find(|t| t.id == id) else {
        eprintln!("Task {id} not found.");
        std::process::exit(1);
    };

    let label = label.unwrap_or_else(|| current.label.clone());
    let deadline = match deadline {
        Some(input) => match parse_deadline_input(&input) {
            Some(d) => d,
            None => {
                eprintln!("Unrecognised deadline: {input}");
                std::process::exit(1);
            }
        },
        None => current.deadline,
    };
    let info = info.unwrap_or_else(|| current.info.clone());

    match store.update(id, &label, deadline, &info) {
        Ok(()) => println!("Updated task {id}"),
        Err(e) => {
            eprintln!("Failed to update task {id}: {e}");
            std::process::exit(1);
        }
    }
}

/// Delete the given tasks.
pub fn cmd_delete(store: &mut Store, ids: Vec<i64>) {
    // A single id goes through `delete` so a missing task is reported.
    if let [id] = ids[..] {
        match store.delete(id) {
            Ok(()) => println!("Deleted task {id}"),
            Err(e) => {
                eprintln!("Failed to delete task {id}: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    match store.delete_many(&ids) {
        Ok(removed) => {
            if removed < ids.len() {
                println!("Deleted {removed} task(s); {} not found", ids.len() - removed);
            } else {
                println!("Deleted {removed} task(s)");
            }
        }
        Err(e) => {
            eprintln!("Failed to delete tasks: {e}");
            std::process::exit(1);
        }
    }
}

/// Set or show the persisted color theme.
pub fn cmd_theme(data_dir: &Path, theme: Option<Theme>) {
    let mut settings = Settings::load(data_dir);
    match theme {
        Some(theme) => {
            settings.theme = theme;
            if let Err(e) = settings.save(data_dir) {
                eprintln!("Failed to save settings: {e}");
                std::process::exit(1);
            }
            println!("Theme set to {}", theme.label());
        }
        None => println!("{}", settings.theme.label()),
    }
}

/// Generate completion scripts for the given shell.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Exit with a store failure message.
pub fn exit_store_error(e: StoreError) -> ! {
    eprintln!("Store error: {e}");
    std::process::exit(1);
}
