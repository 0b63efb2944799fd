use crate::model::format::{fmt_dur, fmt_range};
use crate::model::{short_id, Task};
use crate::ui::widgets::styling;
use ratatui::text::{Line, Span};

pub fn check(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Compact metadata: time range, duration, subtask progress, missing date.
///
pub fn task_meta(task: &Task) -> String {
    let mut meta = Vec::new();
    if task.start_time.is_some() {
        meta.push(fmt_range(task.start_time.as_deref(), task.end_time.as_deref()));
    }
    if let Some(mins) = task.duration() {
        meta.push(fmt_dur(mins));
    }
    if !task.subtasks.is_empty() {
        meta.push(format!("{}/{}", task.subtasks_done(), task.subtasks.len()));
    }
    if task.date.is_none() {
        meta.push(String::from("no date"));
    }
    meta.join(" · ")
}

/// One task line: checkbox, short handle, title and compact metadata.
///
pub fn task_line(task: &Task) -> Line<'static> {
    let title_style = if task.done {
        styling::done_text_style()
    } else {
        styling::normal_text_style()
    };
    let mut spans = vec![
        Span::raw(format!("{} ", check(task.done))),
        Span::styled(
            format!("{}  ", short_id(&task.id)),
            styling::muted_text_style(),
        ),
        Span::styled(task.title.clone(), title_style),
    ];
    let meta = task_meta(task);
    if !meta.is_empty() {
        spans.push(Span::styled(
            format!("  {}", meta),
            styling::time_text_style(),
        ));
    }
    Line::from(spans)
}
