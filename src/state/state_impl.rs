use crate::model::{new_id, non_empty, now_millis, short_id, Subtask, Task, TaskFormValues};
use log::*;
use std::sync::Arc;
use tokio::sync::watch;

use super::error::StateError;
use super::navigation::{CalMode, Pane, Sheet, SyncStatus};

/// An immutable view of the task collection after a given change.
///
/// Revisions start at zero for the empty collection and grow by one for
/// every applied change.
///
#[derive(Debug, Clone)]
pub struct TaskSnapshot {
    pub revision: u64,
    pub tasks: Arc<Vec<Task>>,
}

/// Houses data representative of application state.
///
/// The task collection is only changed through the command methods below.
/// Each change installs a new collection and publishes it to subscribers;
/// commands that would change nothing publish nothing.
///
pub struct State {
    tasks: Arc<Vec<Task>>,
    revision: u64,
    changes: watch::Sender<TaskSnapshot>,
    sync_status: SyncStatus,
    pane: Pane,
    cal_mode: CalMode,
    cal_offset: i32,
    selected_day: Option<String>,
    detail_id: Option<String>,
    sheet: Sheet,
}

/// Defines default application state.
///
impl Default for State {
    fn default() -> State {
        let tasks = Arc::new(Vec::new());
        let (changes, _) = watch::channel(TaskSnapshot {
            revision: 0,
            tasks: Arc::clone(&tasks),
        });
        State {
            tasks,
            revision: 0,
            changes,
            sync_status: SyncStatus::Idle,
            pane: Pane::List,
            cal_mode: CalMode::Day,
            cal_offset: 0,
            selected_day: None,
            detail_id: None,
            sheet: Sheet::Closed,
        }
    }
}

impl State {
    pub fn new() -> Self {
        State::default()
    }

    /// Returns a receiver of task collection snapshots.
    ///
    pub fn subscribe(&self) -> watch::Receiver<TaskSnapshot> {
        self.changes.subscribe()
    }

    /// Returns the current task collection snapshot.
    ///
    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            revision: self.revision,
            tasks: Arc::clone(&self.tasks),
        }
    }

    /// Returns the tasks in collection (insertion) order.
    ///
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the task with the given id.
    ///
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Resolve a full id or the short handle shown in listings. Ambiguous
    /// handles resolve to nothing.
    ///
    pub fn resolve_task(&self, handle: &str) -> Option<&Task> {
        if let Some(task) = self.task(handle) {
            return Some(task);
        }
        let mut matches = self.tasks.iter().filter(|task| short_id(&task.id) == handle);
        match (matches.next(), matches.next()) {
            (Some(task), None) => Some(task),
            _ => None,
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Apply a change to a fresh copy of the collection and publish it.
    ///
    fn commit(&mut self, apply: impl FnOnce(&mut Vec<Task>)) -> u64 {
        apply(Arc::make_mut(&mut self.tasks));
        self.revision += 1;
        self.changes.send_replace(self.snapshot());
        self.revision
    }

    /// Replace the whole collection. Returns the new revision.
    ///
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) -> u64 {
        debug!("Replacing task collection with {} tasks.", tasks.len());
        self.commit(|current| *current = tasks)
    }

    /// Append a new task built from form values.
    ///
    pub fn add_task(&mut self, values: &TaskFormValues) -> Result<Task, StateError> {
        let title = values.clean_title().ok_or(StateError::BlankTitle)?;
        let task = Task {
            id: new_id(),
            title,
            date: non_empty(&values.date),
            start_time: non_empty(&values.start_time),
            end_time: non_empty(&values.end_time),
            done: false,
            subtasks: vec![],
            created_at: now_millis(),
        };
        debug!("Adding task {} '{}'.", task.id, task.title);
        let added = task.clone();
        self.commit(|tasks| tasks.push(task));
        Ok(added)
    }

    /// Replace title, date and times of an existing task. Unknown ids and
    /// blank titles leave the collection unchanged.
    ///
    pub fn update_task(&mut self, id: &str, values: &TaskFormValues) -> &mut Self {
        let Some(index) = self.position(id) else {
            debug!("Ignoring update for unknown task {}.", id);
            return self;
        };
        let Some(title) = values.clean_title() else {
            debug!("Ignoring update with blank title for task {}.", id);
            return self;
        };
        self.commit(|tasks| {
            let task = &mut tasks[index];
            task.title = title;
            task.date = non_empty(&values.date);
            task.start_time = non_empty(&values.start_time);
            task.end_time = non_empty(&values.end_time);
        });
        self
    }

    /// Remove a task if present.
    ///
    pub fn delete_task(&mut self, id: &str) -> &mut Self {
        if let Some(index) = self.position(id) {
            self.commit(|tasks| {
                tasks.remove(index);
            });
            if self.detail_id.as_deref() == Some(id) {
                self.detail_id = None;
            }
        }
        self
    }

    /// Flip a task's completion if present.
    ///
    pub fn toggle_task(&mut self, id: &str) -> &mut Self {
        if let Some(index) = self.position(id) {
            self.commit(|tasks| tasks[index].done = !tasks[index].done);
        }
        self
    }

    /// Append a subtask to an existing task.
    ///
    pub fn add_subtask(&mut self, task_id: &str, title: &str) -> Result<Subtask, StateError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StateError::BlankTitle);
        }
        let index = self.position(task_id).ok_or_else(|| StateError::TaskNotFound {
            id: task_id.to_owned(),
        })?;
        let subtask = Subtask {
            id: new_id(),
            title: title.to_owned(),
            done: false,
        };
        let added = subtask.clone();
        self.commit(|tasks| tasks[index].subtasks.push(subtask));
        Ok(added)
    }

    fn subtask_position(&self, task_id: &str, subtask_id: &str) -> Option<(usize, usize)> {
        let index = self.position(task_id)?;
        let sub_index = self.tasks[index]
            .subtasks
            .iter()
            .position(|subtask| subtask.id == subtask_id)?;
        Some((index, sub_index))
    }

    /// Flip a subtask's completion if present.
    ///
    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> &mut Self {
        if let Some((index, sub_index)) = self.subtask_position(task_id, subtask_id) {
            self.commit(|tasks| {
                let subtask = &mut tasks[index].subtasks[sub_index];
                subtask.done = !subtask.done;
            });
        }
        self
    }

    /// Remove a subtask if present.
    ///
    pub fn delete_subtask(&mut self, task_id: &str, subtask_id: &str) -> &mut Self {
        if let Some((index, sub_index)) = self.subtask_position(task_id, subtask_id) {
            self.commit(|tasks| {
                tasks[index].subtasks.remove(sub_index);
            });
        }
        self
    }

    /// Return the synchronization status.
    ///
    pub fn sync_status(&self) -> SyncStatus {
        self.sync_status
    }

    pub fn set_sync_status(&mut self, status: SyncStatus) -> &mut Self {
        if self.sync_status != status {
            debug!("Sync status {:?} -> {:?}.", self.sync_status, status);
        }
        self.sync_status = status;
        self
    }

    /// Return the current pane.
    ///
    pub fn pane(&self) -> Pane {
        self.pane
    }

    pub fn set_pane(&mut self, pane: Pane) -> &mut Self {
        self.pane = pane;
        self
    }

    /// Return the calendar mode.
    ///
    pub fn cal_mode(&self) -> CalMode {
        self.cal_mode
    }

    /// Change calendar mode, returning to the current period.
    ///
    pub fn set_cal_mode(&mut self, mode: CalMode) -> &mut Self {
        self.cal_mode = mode;
        self.cal_offset = 0;
        self.selected_day = None;
        self
    }

    /// Return the number of periods between today and the shown period.
    ///
    pub fn cal_offset(&self) -> i32 {
        self.cal_offset
    }

    pub fn set_cal_offset(&mut self, offset: i32) -> &mut Self {
        self.cal_offset = offset;
        self
    }

    /// Move the calendar by `delta` periods, dropping any selected day.
    ///
    pub fn nudge_cal_offset(&mut self, delta: i32) -> &mut Self {
        self.cal_offset += delta;
        self.selected_day = None;
        self
    }

    /// Return the day drilled into from the month view.
    ///
    pub fn selected_day(&self) -> Option<&str> {
        self.selected_day.as_deref()
    }

    pub fn set_selected_day(&mut self, day: Option<String>) -> &mut Self {
        self.selected_day = day;
        self
    }

    /// Return the task whose details are open, if it still exists.
    ///
    pub fn detail_task(&self) -> Option<&Task> {
        self.detail_id.as_deref().and_then(|id| self.task(id))
    }

    pub fn open_detail(&mut self, id: &str) -> &mut Self {
        self.detail_id = Some(id.to_owned());
        self
    }

    pub fn close_detail(&mut self) -> &mut Self {
        self.detail_id = None;
        self
    }

    /// Return the add/edit sheet.
    ///
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn open_create_sheet(&mut self, prefill_date: Option<String>) -> &mut Self {
        self.sheet = Sheet::Create { prefill_date };
        self
    }

    pub fn open_edit_sheet(&mut self, task_id: &str) -> &mut Self {
        self.sheet = Sheet::Edit {
            task_id: task_id.to_owned(),
        };
        self
    }

    pub fn close_sheet(&mut self) -> &mut Self {
        self.sheet = Sheet::Closed;
        self
    }
}
