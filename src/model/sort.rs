//! Derived orderings over a task collection.
//!
//! None of these functions reorder the collection itself; they return
//! borrowed views in display order.

use super::Task;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Start time assumed for dated tasks without one.
///
const UNTIMED_SORT_TIME: &str = "23:59";

/// Ordering key within the pending or done partition. Dated tasks sort
/// before undated ones because of variant order.
///
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum ListKey<'a> {
    Dated { date: &'a str, start: &'a str },
    Undated { title: String },
}

fn list_key(task: &Task) -> ListKey<'_> {
    match task.date.as_deref() {
        Some(date) => ListKey::Dated {
            date,
            start: task.start_time.as_deref().unwrap_or(UNTIMED_SORT_TIME),
        },
        None => ListKey::Undated {
            title: task.title.to_lowercase(),
        },
    }
}

fn list_order(a: &Task, b: &Task) -> Ordering {
    a.done
        .cmp(&b.done)
        .then_with(|| list_key(a).cmp(&list_key(b)))
}

/// Sort for the flat list: pending before done, then chronologically by
/// date and start time, undated tasks last in case-insensitive title order.
/// Ties keep their collection order.
///
pub fn sort_for_list(tasks: &[Task]) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| list_order(a, b));
    sorted
}

/// A contiguous run of list-sorted tasks sharing a date. `date` is None for
/// the unscheduled bucket.
///
#[derive(Debug, PartialEq, Eq)]
pub struct TaskGroup<'a> {
    pub date: Option<&'a str>,
    pub tasks: Vec<&'a Task>,
}

/// Sort for the flat list and split into runs of equal date. A date can
/// appear twice when it has both pending and done tasks.
///
pub fn group_for_list(tasks: &[Task]) -> Vec<TaskGroup<'_>> {
    let mut groups: Vec<TaskGroup<'_>> = Vec::new();
    for task in sort_for_list(tasks) {
        let date = task.date.as_deref();
        match groups.last_mut() {
            Some(group) if group.date == date => group.tasks.push(task),
            _ => groups.push(TaskGroup {
                date,
                tasks: vec![task],
            }),
        }
    }
    groups
}

/// Sort one day's tasks by start time with untimed tasks last.
///
pub fn sort_for_day(tasks: &mut [&Task]) {
    tasks.sort_by(|a, b| match (a.start_time.as_deref(), b.start_time.as_deref()) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Map each date key to its tasks in day order. Undated tasks are left out.
///
pub fn build_task_map(tasks: &[Task]) -> BTreeMap<&str, Vec<&Task>> {
    let mut map: BTreeMap<&str, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        if let Some(date) = task.date.as_deref() {
            map.entry(date).or_default().push(task);
        }
    }
    for day in map.values_mut() {
        sort_for_day(day);
    }
    map
}
