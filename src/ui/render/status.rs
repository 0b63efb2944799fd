use super::Frame;
use crate::state::{Pane, State};
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

/// One-line header with the pane, task count and sync indicator.
///
pub fn status(frame: &mut Frame, size: Rect, state: &State) {
    let pane = match state.pane() {
        Pane::List => "list",
        Pane::Calendar => "calendar",
    };
    let status = state.sync_status();
    let line = Line::from(vec![
        Span::styled("flow", styling::active_block_title_style()),
        Span::styled(
            format!(" · {} · {} tasks · ", pane, state.tasks().len()),
            styling::muted_text_style(),
        ),
        Span::styled(status.label(), styling::sync_style(status)),
    ]);
    frame.render_widget(Paragraph::new(line), size);
}
