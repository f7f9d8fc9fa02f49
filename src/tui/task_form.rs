//! Task form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` structure used by both the add
//! and edit screens, including field ordering and validation.

use chrono::NaiveDate;

use crate::store::{format_date, parse_deadline_input};
use crate::task::Task;
use crate::tui::input::InputField;

/// Field order in the form.
pub const LABEL_FIELD: usize = 0;
pub const DEADLINE_FIELD: usize = 1;
pub const INFO_FIELD: usize = 2;
pub const FIELD_COUNT: usize = 3;

/// Why a form submission was refused.
#[derive(Debug)]
pub enum FormIssue {
    EmptyLabel,
    BadDeadline(String),
}

/// Form state for adding or editing a task.
pub struct TaskForm {
    pub label: InputField,
    pub deadline: InputField,
    pub info: InputField,
    pub current_field: usize,
}

impl TaskForm {
    /// Create an empty form with the deadline prefilled to today.
    pub fn new() -> Self {
        Self {
            label: InputField::new(),
            deadline: InputField::with_value("today"),
            info: InputField::new(),
            current_field: LABEL_FIELD,
        }
    }

    /// Create a form prefilled from an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            label: InputField::with_value(&task.label),
            deadline: InputField::with_value(&format_date(task.deadline)),
            info: InputField::with_value(&task.info),
            current_field: LABEL_FIELD,
        }
    }

    /// Move focus to the next field, wrapping around.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
    }

    /// Move focus to the previous field, wrapping around.
    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
    }

    /// The field that currently has focus.
    pub fn active_field_mut(&mut self) -> &mut InputField {
        match self.current_field {
            LABEL_FIELD => &mut self.label,
            DEADLINE_FIELD => &mut self.deadline,
            _ => &mut self.info,
        }
    }

    /// Validate the form and return the values a store call needs.
    pub fn submit(&self) -> Result<(String, NaiveDate, String), FormIssue> {
        let label = self.label.value.trim();
        if label.is_empty() {
            return Err(FormIssue::EmptyLabel);
        }
        let deadline = parse_deadline_input(&self.deadline.value)
            .ok_or_else(|| FormIssue::BadDeadline(self.deadline.value.clone()))?;
        Ok((label.to_string(), deadline, self.info.value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::parse_date;

    #[test]
    fn empty_label_blocks_submission() {
        let mut form = TaskForm::new();
        form.info = InputField::with_value("notes");
        assert!(matches!(form.submit(), Err(FormIssue::EmptyLabel)));

        form.label = InputField::with_value("   ");
        assert!(matches!(form.submit(), Err(FormIssue::EmptyLabel)));
    }

    #[test]
    fn unparseable_deadline_blocks_submission() {
        let mut form = TaskForm::new();
        form.label = InputField::with_value("Buy milk");
        form.deadline = InputField::with_value("next sprint");
        assert!(matches!(form.submit(), Err(FormIssue::BadDeadline(_))));
    }

    #[test]
    fn valid_form_submits_trimmed_label() {
        let mut form = TaskForm::new();
        form.label = InputField::with_value("  Buy milk  ");
        form.deadline = InputField::with_value("2024-01-05");
        let (label, deadline, info) = form.submit().unwrap();
        assert_eq!(label, "Buy milk");
        assert_eq!(deadline, parse_date("2024-01-05").unwrap());
        assert_eq!(info, "");
    }
}
