use super::*;
use crate::state::{Pane, State};
use chrono::NaiveDate;
use ratatui::layout::{Constraint, Direction, Layout};

/// Render the whole screen: status bar, current pane with any open popup,
/// the reply of the last command and the command line.
///
pub fn all(
    frame: &mut Frame,
    state: &State,
    input: &str,
    reply: Option<&str>,
    today: NaiveDate,
) {
    let size = frame.size();
    let reply_height = reply
        .map(|text| text.lines().count() as u16 + 2)
        .unwrap_or(0)
        .min(size.height / 2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(reply_height),
            Constraint::Length(3),
        ])
        .split(size);

    status(frame, chunks[0], state);
    match state.pane() {
        Pane::List => list(frame, chunks[1], state.tasks(), today),
        Pane::Calendar => calendar(frame, chunks[1], state, today),
    }
    if let Some(task) = state.detail_task() {
        detail(frame, chunks[1], task);
    }
    sheet(frame, chunks[1], state);
    if let Some(text) = reply {
        output(frame, chunks[2], text);
    }
    prompt(frame, chunks[3], input);
}
