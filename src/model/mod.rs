//! Task domain model.
//!
//! This module defines the persisted task shapes and the pure helpers that
//! derive views from them:
//! - `format`: time, range and duration formatting
//! - `sort`: list ordering, list grouping and per-day lookup
//! - `calendar`: date keys and day/week/month navigation

pub mod calendar;
pub mod format;
pub mod sort;

use fake::Dummy;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

/// Defines subtask data structure. Owned by exactly one parent task.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    pub done: bool,
}

/// Defines task data structure as stored in the remote collection.
///
/// Dates are `YYYY-MM-DD` and times are 24-hour `HH:MM`; both compare
/// correctly as plain strings.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub done: bool,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    pub created_at: i64,
}

impl Task {
    /// Number of completed subtasks.
    ///
    pub fn subtasks_done(&self) -> usize {
        self.subtasks.iter().filter(|s| s.done).count()
    }

    /// Duration in minutes between start and end, if both are set and the
    /// range is positive.
    ///
    pub fn duration(&self) -> Option<u32> {
        format::dur_mins(self.start_time.as_deref(), self.end_time.as_deref())
    }
}

/// Raw values from an add/edit form. Empty strings mean "absent".
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskFormValues {
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

impl TaskFormValues {
    pub fn titled(title: &str) -> Self {
        TaskFormValues {
            title: title.to_owned(),
            ..TaskFormValues::default()
        }
    }

    /// Form prefilled from an existing task, as shown by the edit sheet.
    ///
    pub fn from_task(task: &Task) -> Self {
        TaskFormValues {
            title: task.title.clone(),
            date: task.date.clone().unwrap_or_default(),
            start_time: task.start_time.clone().unwrap_or_default(),
            end_time: task.end_time.clone().unwrap_or_default(),
        }
    }

    pub fn on(mut self, date: &str) -> Self {
        self.date = date.to_owned();
        self
    }

    pub fn at(mut self, start_time: &str, end_time: &str) -> Self {
        self.start_time = start_time.to_owned();
        self.end_time = end_time.to_owned();
        self
    }

    /// Trimmed title, or None when blank.
    ///
    pub fn clean_title(&self) -> Option<String> {
        let title = self.title.trim();
        if title.is_empty() {
            None
        } else {
            Some(title.to_owned())
        }
    }
}

/// Map an empty form field to absent.
///
pub fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// Returns a fresh id made of the current millisecond timestamp and a short
/// random suffix. Collisions are not handled.
///
pub fn new_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("{}-{}", now_millis(), suffix)
}

/// The random part of an id, used as a short handle in listings.
///
pub fn short_id(id: &str) -> &str {
    id.rsplit('-').next().unwrap_or(id)
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
