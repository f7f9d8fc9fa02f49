//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the UI state,
//! handles user input, renders the interface, and coordinates between
//! the different screens (task list, forms, dialogs).
//!
//! Every mutation goes straight to the store and is followed by a full
//! reload of the task list; there is no caching layer in between.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table,
        TableState, Wrap,
    },
    Frame, Terminal,
};

use crate::settings::Settings;
use crate::store::{format_date, format_deadline_relative, Store, StoreError};
use crate::task::Task;
use crate::theme::Theme;
use crate::tui::{
    enums::{AppState, InputMode},
    palette::{palette, Palette},
    task_form::{FormIssue, TaskForm, DEADLINE_FIELD, INFO_FIELD, LABEL_FIELD},
    utils::centered_rect,
};

/// Main application state for the terminal user interface.
///
/// Holds the store handle, the last loaded task list, the set of
/// checked ids, and the state of whichever screen is active.
pub struct App {
    state: AppState,
    store: Store,
    data_dir: PathBuf,
    settings: Settings,
    tasks: Vec<Task>,
    checked: HashSet<i64>,
    list_state: TableState,
    task_form: TaskForm,
    input_mode: InputMode,
    status_message: String,
    theme_state: ListState,
}

impl App {
    /// Create a new App, opening the store and loading settings.
    pub fn new(db_path: &Path, data_dir: &Path) -> Result<Self, StoreError> {
        let store = Store::open(db_path)?;
        let settings = Settings::load(data_dir);

        let mut app = App {
            state: AppState::TaskList,
            store,
            data_dir: data_dir.to_path_buf(),
            settings,
            tasks: Vec::new(),
            checked: HashSet::new(),
            list_state: TableState::default(),
            task_form: TaskForm::new(),
            input_mode: InputMode::None,
            status_message: String::new(),
            theme_state: ListState::default(),
        };
        app.refresh_tasks()?;
        Ok(app)
    }

    /// Reload the full task list from the store.
    ///
    /// Runs after every mutation. Checked ids that no longer exist are
    /// dropped and the selection is clamped to the new list.
    fn refresh_tasks(&mut self) -> Result<(), StoreError> {
        self.tasks = self.store.read_all()?;

        let live: HashSet<i64> = self.tasks.iter().map(|t| t.id).collect();
        self.checked.retain(|id| live.contains(id));

        match self.list_state.selected() {
            Some(idx) if idx >= self.tasks.len() => {
                self.list_state.select(if self.tasks.is_empty() {
                    None
                } else {
                    Some(self.tasks.len() - 1)
                });
            }
            None if !self.tasks.is_empty() => self.list_state.select(Some(0)),
            _ => {}
        }
        Ok(())
    }

    /// Get a reference to the currently highlighted task.
    fn selected_task(&self) -> Option<&Task> {
        self.list_state.selected().and_then(|idx| self.tasks.get(idx))
    }

    /// Set a status message to display in the status bar.
    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn palette(&self) -> Palette {
        palette(self.settings.theme)
    }

    /// Checked ids in list order.
    fn checked_ids(&self) -> Vec<i64> {
        self.tasks
            .iter()
            .filter(|t| self.checked.contains(&t.id))
            .map(|t| t.id)
            .collect()
    }

    /// Handle keyboard input when in the task list view.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(
        &mut self,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> io::Result<bool> {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Down | KeyCode::Char('j') => {
                if !self.tasks.is_empty() {
                    let next = match self.list_state.selected() {
                        Some(i) if i + 1 < self.tasks.len() => i + 1,
                        Some(i) => i,
                        None => 0,
                    };
                    self.list_state.select(Some(next));
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if !self.tasks.is_empty() {
                    let prev = match self.list_state.selected() {
                        Some(i) if i > 0 => i - 1,
                        Some(i) => i,
                        None => 0,
                    };
                    self.list_state.select(Some(prev));
                }
            }
            KeyCode::Char(' ') => {
                if let Some(task) = self.selected_task() {
                    let id = task.id;
                    if !self.checked.remove(&id) {
                        self.checked.insert(id);
                    }
                } else {
                    self.set_status_message("No task selected".to_string());
                }
            }
            KeyCode::Char('a') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.check_all();
            }
            KeyCode::Char('A') => {
                self.check_all();
            }
            KeyCode::Char('a') => {
                self.task_form = TaskForm::new();
                self.state = AppState::AddTask;
                self.input_mode = InputMode::Text;
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self.selected_task() {
                    self.task_form = TaskForm::from_task(task);
                    self.state = AppState::EditTask;
                    self.input_mode = InputMode::Text;
                } else {
                    self.set_status_message("No task selected".to_string());
                }
            }
            KeyCode::Char('d') => {
                if self.checked.is_empty() {
                    self.set_status_message(
                        "No tasks checked - press Space to check tasks first".to_string(),
                    );
                } else {
                    self.state = AppState::ConfirmDelete;
                }
            }
            KeyCode::Char('p') => {
                if self.checked.is_empty() {
                    self.set_status_message("No tasks checked".to_string());
                } else {
                    self.state = AppState::PrintView;
                }
            }
            KeyCode::Char('t') => {
                let current = Theme::ALL
                    .iter()
                    .position(|&t| t == self.settings.theme)
                    .unwrap_or(0);
                self.theme_state.select(Some(current));
                self.state = AppState::ThemePicker;
            }
            KeyCode::Char('h') | KeyCode::Char('?') => {
                self.state = AppState::Help;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Check every task in the list.
    fn check_all(&mut self) {
        for task in &self.tasks {
            self.checked.insert(task.id);
        }
        self.set_status_message(format!("Checked all {} task(s)", self.tasks.len()));
    }

    /// Handle keyboard input in the add/edit form.
    fn handle_form_input(
        &mut self,
        key: KeyCode,
        _modifiers: KeyModifiers,
        is_edit: bool,
    ) -> io::Result<bool> {
        match key {
            KeyCode::Esc => {
                self.state = AppState::TaskList;
                self.input_mode = InputMode::None;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.task_form.next_field();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.task_form.prev_field();
            }
            KeyCode::Left => self.task_form.active_field_mut().move_cursor_left(),
            KeyCode::Right => self.task_form.active_field_mut().move_cursor_right(),
            KeyCode::Home => self.task_form.active_field_mut().move_cursor_home(),
            KeyCode::End => self.task_form.active_field_mut().move_cursor_end(),
            KeyCode::Backspace => self.task_form.active_field_mut().handle_backspace(),
            KeyCode::Delete => self.task_form.active_field_mut().handle_delete(),
            KeyCode::Enter => {
                let submission = match self.task_form.submit() {
                    Ok(values) => values,
                    Err(FormIssue::EmptyLabel) => {
                        self.set_status_message("Task cannot be empty".to_string());
                        return Ok(false);
                    }
                    Err(FormIssue::BadDeadline(input)) => {
                        self.set_status_message(format!("Unrecognised deadline: {input}"));
                        return Ok(false);
                    }
                };

                let result = if is_edit {
                    self.update_task(submission)
                } else {
                    self.create_task(submission)
                };

                match result {
                    Ok(()) => {
                        self.state = AppState::TaskList;
                        self.input_mode = InputMode::None;
                        self.set_status_message(
                            if is_edit { "Task updated" } else { "Task added" }.to_string(),
                        );
                    }
                    Err(e) => {
                        self.set_status_message(format!("Error: {e}"));
                    }
                }
            }
            KeyCode::Char(c) => self.task_form.active_field_mut().handle_char(c),
            _ => {}
        }
        Ok(false)
    }

    /// Create a new task from validated form values.
    fn create_task(&mut self, (label, deadline, info): (String, chrono::NaiveDate, String)) -> Result<(), StoreError> {
        let date_added = Local::now().date_naive();
        self.store.create(&label, date_added, deadline, &info)?;
        self.refresh_tasks()
    }

    /// Rewrite the highlighted task from validated form values.
    fn update_task(&mut self, (label, deadline, info): (String, chrono::NaiveDate, String)) -> Result<(), StoreError> {
        let Some(task) = self.selected_task() else {
            return Ok(());
        };
        self.store.update(task.id, &label, deadline, &info)?;
        self.refresh_tasks()
    }

    /// Handle the y/n delete confirmation.
    fn handle_confirm_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let ids = self.checked_ids();
                match self.store.delete_many(&ids) {
                    Ok(removed) => {
                        self.set_status_message(format!("Deleted {removed} task(s)"));
                        if let Err(e) = self.refresh_tasks() {
                            self.set_status_message(format!("Error reloading tasks: {e}"));
                        }
                    }
                    Err(e) => self.set_status_message(format!("Error deleting tasks: {e}")),
                }
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::TaskList;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle input on the print dialog; any of the usual close keys
    /// return to the list.
    fn handle_print_input(&mut self, key: KeyCode) -> io::Result<bool> {
        if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('p')) {
            self.state = AppState::TaskList;
        }
        Ok(false)
    }

    /// Handle input on the theme picker.
    fn handle_theme_input(&mut self, key: KeyCode) -> io::Result<bool> {
        match key {
            KeyCode::Esc => {
                self.state = AppState::TaskList;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let next = match self.theme_state.selected() {
                    Some(i) if i + 1 < Theme::ALL.len() => i + 1,
                    Some(i) => i,
                    None => 0,
                };
                self.theme_state.select(Some(next));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let prev = match self.theme_state.selected() {
                    Some(i) if i > 0 => i - 1,
                    Some(i) => i,
                    None => 0,
                };
                self.theme_state.select(Some(prev));
            }
            KeyCode::Enter => {
                if let Some(idx) = self.theme_state.selected() {
                    let theme = Theme::ALL[idx];
                    self.settings.theme = theme;
                    match self.settings.save(&self.data_dir) {
                        Ok(()) => {
                            self.set_status_message(format!("Theme set to {}", theme.label()))
                        }
                        Err(e) => {
                            self.set_status_message(format!("Failed to save settings: {e}"))
                        }
                    }
                }
                self.state = AppState::TaskList;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle input on the help screen.
    fn handle_help_input(&mut self, key: KeyCode) -> io::Result<bool> {
        if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('h')) {
            self.state = AppState::TaskList;
        }
        Ok(false)
    }

    /// Poll for input and dispatch to the active screen's handler.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.status_message.clear();

                let should_quit = match self.state {
                    AppState::TaskList => self.handle_task_list_input(key.code, key.modifiers)?,
                    AppState::AddTask => self.handle_form_input(key.code, key.modifiers, false)?,
                    AppState::EditTask => self.handle_form_input(key.code, key.modifiers, true)?,
                    AppState::PrintView => self.handle_print_input(key.code)?,
                    AppState::ThemePicker => self.handle_theme_input(key.code)?,
                    AppState::ConfirmDelete => {
                        self.handle_confirm_input(key.code, key.modifiers)?
                    }
                    AppState::Help => self.handle_help_input(key.code)?,
                };
                if should_quit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Render the checkable task list.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let pal = self.palette();
        let today = Local::now().date_naive();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let header_text = vec![Line::from(vec![
            Span::styled("TO-DO LIST", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                self.settings.theme.label(),
                Style::default().add_modifier(Modifier::ITALIC),
            ),
        ])];
        let header_block = Paragraph::new(header_text)
            .style(Style::default().fg(pal.text).bg(pal.background))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, chunks[0]);

        let header_cells = ["", "ID", "Task", "Added", "Deadline", "Info"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(pal.bar).fg(pal.bar_text))
            .height(1);

        let rows: Vec<Row> = self
            .tasks
            .iter()
            .map(|task| {
                let mark = if self.checked.contains(&task.id) {
                    "[x]"
                } else {
                    "[ ]"
                };
                Row::new(vec![
                    Cell::from(mark),
                    Cell::from(task.id.to_string()),
                    Cell::from(task.label.clone()),
                    Cell::from(format_date(task.date_added)),
                    Cell::from(format_deadline_relative(task.deadline, today)),
                    Cell::from(task.info.clone()),
                ])
                .style(Style::default().fg(pal.text))
            })
            .collect();

        let widths = [
            Constraint::Length(3),  // checkbox
            Constraint::Length(4),  // ID
            Constraint::Min(20),    // Task
            Constraint::Length(12), // Added
            Constraint::Length(10), // Deadline
            Constraint::Min(10),    // Info
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(Style::default().bg(pal.panel))
                    .title(format!(
                        "Tasks ({} checked / {}) - Press 'h' for help",
                        self.checked.len(),
                        self.tasks.len()
                    )),
            )
            .row_highlight_style(Style::default().bg(pal.bar).fg(pal.bar_text))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, chunks[1], &mut self.list_state);
    }

    /// Render the add/edit form.
    fn render_task_form(&mut self, f: &mut Frame, area: Rect, is_edit: bool) {
        let pal = self.palette();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Task label
                Constraint::Length(3), // Deadline
                Constraint::Length(3), // Info
                Constraint::Min(3),    // Instructions
            ])
            .split(area);

        let focus = Style::default().fg(pal.bar).add_modifier(Modifier::BOLD);
        let blur = Style::default().fg(pal.text);

        let fields = [
            (LABEL_FIELD, "Task *", &self.task_form.label),
            (DEADLINE_FIELD, "Deadline", &self.task_form.deadline),
            (INFO_FIELD, "Information", &self.task_form.info),
        ];
        for (order, title, field) in fields {
            let border_style = if self.task_form.current_field == order {
                focus
            } else {
                blur
            };
            let input = Paragraph::new(field.value.as_str())
                .style(Style::default().fg(pal.text).bg(pal.panel))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(title)
                        .border_style(border_style),
                );
            f.render_widget(input, chunks[order]);
        }

        let help_text = if is_edit {
            "Tab/Up/Down: Navigate  Enter: Update  Esc: Cancel  Deadline accepts YYYY-MM-DD, today, tomorrow, in Nd"
        } else {
            "Tab/Up/Down: Navigate  Enter: Add  Esc: Cancel  Deadline accepts YYYY-MM-DD, today, tomorrow, in Nd"
        };
        let instructions = Paragraph::new(help_text)
            .style(Style::default().fg(pal.text))
            .block(Block::default().borders(Borders::ALL).title("Instructions"))
            .wrap(Wrap { trim: true });
        f.render_widget(instructions, chunks[3]);

        // Cursor in the active field
        if self.input_mode == InputMode::Text {
            let (chunk, field) = match self.task_form.current_field {
                LABEL_FIELD => (chunks[0], &self.task_form.label),
                DEADLINE_FIELD => (chunks[1], &self.task_form.deadline),
                _ => (chunks[2], &self.task_form.info),
            };
            f.set_cursor_position((chunk.x + field.cursor as u16 + 1, chunk.y + 1));
        }
    }

    /// Render the checked tasks in a modal dialog.
    ///
    /// "Print" displays the tasks on screen; nothing is sent to a
    /// printer.
    fn render_print(&mut self, f: &mut Frame, area: Rect) {
        let pal = self.palette();
        let area = centered_rect(70, 60, area);
        f.render_widget(Clear, area);

        let mut lines = Vec::new();
        for task in self.tasks.iter().filter(|t| self.checked.contains(&t.id)) {
            lines.push(Line::from(format!(
                "{} (Added: {}, Deadline: {}) (Info: {})",
                task.label,
                format_date(task.date_added),
                format_date(task.deadline),
                task.info
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from("Press Esc to close"));

        let dialog = Paragraph::new(lines)
            .style(Style::default().fg(pal.text).bg(pal.panel))
            .block(Block::default().borders(Borders::ALL).title("Selected Tasks"))
            .wrap(Wrap { trim: true });
        f.render_widget(dialog, area);
    }

    /// Render the theme picker dialog.
    fn render_theme_picker(&mut self, f: &mut Frame, area: Rect) {
        let pal = self.palette();
        let area = centered_rect(40, 50, area);
        f.render_widget(Clear, area);

        let items: Vec<ListItem> = Theme::ALL
            .iter()
            .map(|theme| {
                let marker = if *theme == self.settings.theme { "* " } else { "  " };
                ListItem::new(format!("{marker}{}", theme.label()))
            })
            .collect();

        let list = List::new(items)
            .style(Style::default().fg(pal.text).bg(pal.panel))
            .block(Block::default().borders(Borders::ALL).title("Theme"))
            .highlight_style(Style::default().bg(pal.bar).fg(pal.bar_text));

        f.render_stateful_widget(list, area, &mut self.theme_state);
    }

    /// Render a confirmation dialog for the destructive bulk delete.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let pal = self.palette();
        let area = centered_rect(50, 25, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "Are you sure you want to delete {} checked task(s)?",
                    self.checked.len()
                ),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let dialog = Paragraph::new(text)
            .style(Style::default().fg(pal.bar_text).bg(pal.bar))
            .block(Block::default().borders(Borders::ALL).title("Confirm Delete"))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(dialog, area);
    }

    /// Render the help screen.
    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let pal = self.palette();
        let lines = vec![
            Line::from(Span::styled(
                "Keyboard Shortcuts",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("a          Add a task"),
            Line::from("e / Enter  Update the highlighted task"),
            Line::from("Space      Check / uncheck the highlighted task"),
            Line::from("A / Ctrl+a Select all tasks"),
            Line::from("d          Delete checked tasks (asks first)"),
            Line::from("p          Print checked tasks to a dialog"),
            Line::from("t          Choose a color theme"),
            Line::from("j/k, arrows  Move the highlight"),
            Line::from("q / Esc    Quit"),
            Line::from(""),
            Line::from("Press Esc to return"),
        ];

        let help = Paragraph::new(lines)
            .style(Style::default().fg(pal.text).bg(pal.panel))
            .block(Block::default().borders(Borders::ALL).title("Help"));
        f.render_widget(help, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let pal = self.palette();
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => format!(
                    "Tasks: {} | a add  e update  Space check  d delete  p print  t theme  h help",
                    self.tasks.len()
                ),
                AppState::AddTask => "Add Task".to_string(),
                AppState::EditTask => "Update Task".to_string(),
                AppState::PrintView => "Selected Tasks".to_string(),
                AppState::ThemePicker => "Choose a theme (Enter applies, Esc cancels)".to_string(),
                AppState::ConfirmDelete => "Confirm Delete".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(pal.bar).fg(pal.bar_text))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to the active view.
    fn render(&mut self, f: &mut Frame) {
        let pal = self.palette();
        f.render_widget(
            Block::default().style(Style::default().bg(pal.background)),
            f.area(),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[0]),
            AppState::AddTask => self.render_task_form(f, chunks[0], false),
            AppState::EditTask => self.render_task_form(f, chunks[0], true),
            AppState::PrintView => {
                self.render_task_list(f, chunks[0]);
                self.render_print(f, chunks[0]);
            }
            AppState::ThemePicker => {
                self.render_task_list(f, chunks[0]);
                self.render_theme_picker(f, chunks[0]);
            }
            AppState::ConfirmDelete => {
                self.render_task_list(f, chunks[0]);
                self.render_confirm(f, chunks[0]);
            }
            AppState::Help => self.render_help(f, chunks[0]),
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
