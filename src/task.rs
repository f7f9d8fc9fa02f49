//! Task data structure.
//!
//! This module defines the `Task` struct that represents a single to-do
//! record as persisted in the `tasks` table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single to-do record.
///
/// `id` and `date_added` are assigned at creation time and never change
/// afterwards; `label`, `deadline` and `info` are editable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub label: String,
    pub date_added: NaiveDate,
    pub deadline: NaiveDate,
    pub info: String,
}
