//! SQLite-backed task store and date utilities.
//!
//! This module provides the `Store` struct that owns the database
//! connection and exposes the CRUD operations the rest of the program
//! is built on, along with helpers for parsing and formatting the
//! `yyyy-MM-dd` dates the table stores.

use std::path::Path;

use chrono::{Datelike, Duration, Local, NaiveDate};
use rusqlite::{params, Connection};
use thiserror::Error;

use crate::task::Task;

// AUTOINCREMENT keeps ids of deleted rows from being reallocated.
const SCHEMA_TASKS: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    task TEXT NOT NULL,
    date_added TEXT NOT NULL,
    deadline TEXT NOT NULL,
    info TEXT
)";
const INSERT_TASK: &str =
    "INSERT INTO tasks (task, date_added, deadline, info) VALUES (?1, ?2, ?3, ?4)";
const SELECT_TASKS: &str = "SELECT id, task, date_added, deadline, info FROM tasks";
const UPDATE_TASK: &str = "UPDATE tasks SET task = ?1, deadline = ?2, info = ?3 WHERE id = ?4";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";

/// Date format used for both stored columns and user-facing output.
pub const DATE_FMT: &str = "%Y-%m-%d";

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task label cannot be empty")]
    EmptyLabel,
    #[error("no task with id {0}")]
    NotFound(i64),
    #[error("invalid stored date {0:?}")]
    BadDate(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Durable storage for the task set.
///
/// Owns the connection for the process lifetime; the schema is created
/// on open. Every operation commits independently except `delete_many`,
/// which removes its whole set under one transaction.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_conn(Connection::open(path)?)
    }

    fn from_conn(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(SCHEMA_TASKS, [])?;
        Ok(Store { conn })
    }

    /// Append one task row and return its assigned id.
    ///
    /// Rejects an empty or whitespace-only label; the same rule is
    /// enforced again by the form layer before this is ever reached.
    pub fn create(
        &self,
        label: &str,
        date_added: NaiveDate,
        deadline: NaiveDate,
        info: &str,
    ) -> Result<i64, StoreError> {
        if label.trim().is_empty() {
            return Err(StoreError::EmptyLabel);
        }
        self.conn.execute(
            INSERT_TASK,
            params![label, format_date(date_added), format_date(deadline), info],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Return every task in storage order.
    ///
    /// Callers must not rely on that order for display.
    pub fn read_all(&self) -> Result<Vec<Task>, StoreError> {
        let mut stmt = self.conn.prepare(SELECT_TASKS)?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut tasks = Vec::new();
        for row in rows {
            let (id, label, date_added, deadline, info) = row?;
            tasks.push(Task {
                id,
                label,
                date_added: parse_date(&date_added)
                    .ok_or_else(|| StoreError::BadDate(date_added.clone()))?,
                deadline: parse_date(&deadline)
                    .ok_or_else(|| StoreError::BadDate(deadline.clone()))?,
                info: info.unwrap_or_default(),
            });
        }
        Ok(tasks)
    }

    /// Rewrite the editable fields of the task with `id`.
    ///
    /// `date_added` is immutable and never touched here.
    pub fn update(
        &self,
        id: i64,
        label: &str,
        deadline: NaiveDate,
        info: &str,
    ) -> Result<(), StoreError> {
        if label.trim().is_empty() {
            return Err(StoreError::EmptyLabel);
        }
        let changed = self
            .conn
            .execute(UPDATE_TASK, params![label, format_date(deadline), info, id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    /// Remove the task with `id`.
    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        let changed = self.conn.execute(DELETE_TASK, params![id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    /// Remove exactly the given set of ids under one transaction.
    ///
    /// Ids that no longer exist are tolerated; returns how many rows
    /// were actually removed.
    pub fn delete_many(&mut self, ids: &[i64]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let mut removed = 0;
        for &id in ids {
            removed += tx.execute(DELETE_TASK, params![id])?;
        }
        tx.commit()?;
        Ok(removed)
    }
}

/// Format a date as stored in the table.
pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

/// Parse a `yyyy-MM-dd` date string.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).ok()
}

/// Parse human-readable deadline input.
///
/// Supports "today", "tomorrow", "in Nd" / "in Nw", weekday names
/// ("friday" means this week's occurrence), and `yyyy-MM-dd`.
pub fn parse_deadline_input(s: &str) -> Option<NaiveDate> {
    parse_deadline_from(s, Local::now().date_naive())
}

fn parse_deadline_from(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    // "in X" patterns
    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Some(today + Duration::weeks(weeks));
            }
        }
    }

    // Weekday patterns
    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    for (day_name, target_day) in weekdays {
        if s == day_name {
            let current_day = today.weekday().num_days_from_monday() as i32;
            let days_ahead = (target_day + 7 - current_day) % 7;
            return Some(today + Duration::days(days_ahead as i64));
        }
    }

    NaiveDate::parse_from_str(&s, DATE_FMT).ok()
}

/// Format a deadline relative to today ("today", "tomorrow", "in 3d",
/// "2d late").
pub fn format_deadline_relative(deadline: NaiveDate, today: NaiveDate) -> String {
    let delta = (deadline - today).num_days();
    if delta == 0 {
        "today".into()
    } else if delta == 1 {
        "tomorrow".into()
    } else if delta > 1 {
        format!("in {}d", delta)
    } else {
        format!("{}d late", -delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> Store {
        Store::from_conn(Connection::open_in_memory().unwrap()).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn create_then_read_all_returns_the_record() {
        let store = memory_store();
        let id = store
            .create("Buy milk", date("2024-01-01"), date("2024-01-05"), "")
            .unwrap();
        assert_eq!(id, 1);

        let tasks = store.read_all().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 1);
        assert_eq!(tasks[0].label, "Buy milk");
        assert_eq!(tasks[0].date_added, date("2024-01-01"));
        assert_eq!(tasks[0].deadline, date("2024-01-05"));
        assert_eq!(tasks[0].info, "");
    }

    #[test]
    fn create_rejects_empty_label() {
        let store = memory_store();
        assert!(matches!(
            store.create("", date("2024-01-01"), date("2024-01-05"), ""),
            Err(StoreError::EmptyLabel)
        ));
        assert!(matches!(
            store.create("   ", date("2024-01-01"), date("2024-01-05"), ""),
            Err(StoreError::EmptyLabel)
        ));
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn update_changes_fields_but_not_date_added() {
        let store = memory_store();
        let id = store
            .create("Buy milk", date("2024-01-01"), date("2024-01-05"), "")
            .unwrap();

        store
            .update(id, "Buy oat milk", date("2024-01-10"), "urgent")
            .unwrap();

        let tasks = store.read_all().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].label, "Buy oat milk");
        assert_eq!(tasks[0].date_added, date("2024-01-01"));
        assert_eq!(tasks[0].deadline, date("2024-01-10"));
        assert_eq!(tasks[0].info, "urgent");
    }

    #[test]
    fn update_rejects_empty_label() {
        let store = memory_store();
        let id = store
            .create("Buy milk", date("2024-01-01"), date("2024-01-05"), "")
            .unwrap();
        assert!(matches!(
            store.update(id, "", date("2024-01-10"), ""),
            Err(StoreError::EmptyLabel)
        ));
        assert_eq!(store.read_all().unwrap()[0].label, "Buy milk");
    }

    #[test]
    fn update_missing_id_reports_not_found() {
        let store = memory_store();
        assert!(matches!(
            store.update(42, "x", date("2024-01-10"), ""),
            Err(StoreError::NotFound(42))
        ));
    }

    #[test]
    fn delete_removes_the_record() {
        let store = memory_store();
        let id = store
            .create("Buy milk", date("2024-01-01"), date("2024-01-05"), "")
            .unwrap();
        store.delete(id).unwrap();
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn delete_missing_id_reports_not_found() {
        let store = memory_store();
        assert!(matches!(store.delete(7), Err(StoreError::NotFound(7))));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = memory_store();
        let first = store
            .create("a", date("2024-01-01"), date("2024-01-05"), "")
            .unwrap();
        store.delete(first).unwrap();
        let second = store
            .create("b", date("2024-01-01"), date("2024-01-05"), "")
            .unwrap();
        assert!(second > first);
    }

    #[test]
    fn delete_many_removes_exactly_the_given_set() {
        let mut store = memory_store();
        let mut ids = Vec::new();
        for label in ["a", "b", "c", "d"] {
            ids.push(
                store
                    .create(label, date("2024-01-01"), date("2024-01-05"), "")
                    .unwrap(),
            );
        }

        let removed = store.delete_many(&[ids[0], ids[2]]).unwrap();
        assert_eq!(removed, 2);

        let remaining: Vec<i64> = store.read_all().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(remaining, vec![ids[1], ids[3]]);
    }

    #[test]
    fn delete_many_tolerates_missing_ids() {
        let mut store = memory_store();
        let id = store
            .create("a", date("2024-01-01"), date("2024-01-05"), "")
            .unwrap();
        let removed = store.delete_many(&[id, 999]).unwrap();
        assert_eq!(removed, 1);
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn info_round_trips_through_the_nullable_column() {
        let store = memory_store();
        store
            .create("with notes", date("2024-01-01"), date("2024-01-05"), "call first")
            .unwrap();
        assert_eq!(store.read_all().unwrap()[0].info, "call first");
    }

    #[test]
    fn parse_deadline_input_variants() {
        let today = date("2024-03-06"); // a Wednesday
        assert_eq!(parse_deadline_from("today", today), Some(today));
        assert_eq!(
            parse_deadline_from("tomorrow", today),
            Some(date("2024-03-07"))
        );
        assert_eq!(parse_deadline_from("in 3d", today), Some(date("2024-03-09")));
        assert_eq!(parse_deadline_from("in 2w", today), Some(date("2024-03-20")));
        assert_eq!(parse_deadline_from("friday", today), Some(date("2024-03-08")));
        assert_eq!(
            parse_deadline_from("2024-12-31", today),
            Some(date("2024-12-31"))
        );
        assert_eq!(parse_deadline_from("next sprint", today), None);
        assert_eq!(parse_deadline_from("", today), None);
    }

    #[test]
    fn format_deadline_relative_variants() {
        let today = date("2024-03-06");
        assert_eq!(format_deadline_relative(date("2024-03-06"), today), "today");
        assert_eq!(
            format_deadline_relative(date("2024-03-07"), today),
            "tomorrow"
        );
        assert_eq!(format_deadline_relative(date("2024-03-09"), today), "in 3d");
        assert_eq!(
            format_deadline_relative(date("2024-03-04"), today),
            "2d late"
        );
    }
}
