use super::rows::check;
use super::Frame;
use crate::model::format::{fmt_dur, fmt_range};
use crate::model::{short_id, Task};
use crate::ui::widgets::{centered_rect, styling};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Render the detail popup of a task with its subtasks.
///
pub fn detail(frame: &mut Frame, size: Rect, task: &Task) {
    let title_style = if task.done {
        styling::done_text_style()
    } else {
        styling::active_block_title_style()
    };
    let mut lines = vec![Line::from(vec![
        Span::raw(format!("{} ", check(task.done))),
        Span::styled(task.title.clone(), title_style),
    ])];

    let mut chips = vec![task
        .date
        .clone()
        .unwrap_or_else(|| String::from("unscheduled"))];
    if task.start_time.is_some() {
        chips.push(fmt_range(task.start_time.as_deref(), task.end_time.as_deref()));
    }
    if let Some(mins) = task.duration() {
        chips.push(fmt_dur(mins));
    }
    lines.push(Line::from(Span::styled(
        format!("  {}", chips.join("  ")),
        styling::time_text_style(),
    )));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        format!("subtasks {}/{}", task.subtasks_done(), task.subtasks.len()),
        styling::active_block_title_style(),
    )));
    if task.subtasks.is_empty() {
        lines.push(Line::from(Span::styled(
            "  no subtasks",
            styling::muted_text_style(),
        )));
    }
    for subtask in &task.subtasks {
        let style = if subtask.done {
            styling::done_text_style()
        } else {
            styling::normal_text_style()
        };
        lines.push(Line::from(vec![
            Span::raw(format!("  {} ", check(subtask.done))),
            Span::styled(
                format!("{}  ", short_id(&subtask.id)),
                styling::muted_text_style(),
            ),
            Span::styled(subtask.title.clone(), style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("id {}", task.id),
        styling::muted_text_style(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style())
        .title(Span::styled("detail", styling::active_block_title_style()));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    let area = centered_rect(70, 60, size);
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::super::testing::{draw, row_of, rows};
    use super::*;
    use crate::model::Subtask;

    fn screen(task: &Task) -> Vec<String> {
        let buffer = draw(60, 24, |frame| {
            let size = frame.size();
            detail(frame, size, task)
        });
        rows(&buffer)
    }

    #[test]
    fn detail_lists_subtasks() {
        let task = Task {
            id: "1-abc".to_owned(),
            title: "Trip".to_owned(),
            date: Some("2024-02-01".to_owned()),
            start_time: Some("14:00".to_owned()),
            end_time: Some("15:30".to_owned()),
            done: false,
            subtasks: vec![Subtask {
                id: "2-pack".to_owned(),
                title: "Pack".to_owned(),
                done: true,
            }],
            created_at: 0,
        };
        let popup = screen(&task);
        let top = row_of(&popup, "detail");
        assert!(popup[top + 1].contains("│[ ] Trip"));
        assert!(popup[top + 2].contains("│  2024-02-01  2:00p–3:30p  1h30m"));
        assert!(popup[top + 4].contains("│subtasks 1/1"));
        assert!(popup[top + 5].contains("│  [x] pack  Pack"));
        assert!(popup[top + 7].contains("│id 1-abc"));
    }

    #[test]
    fn detail_without_date_or_subtasks() {
        let task = Task {
            id: "1-x".to_owned(),
            title: "Idea".to_owned(),
            date: None,
            start_time: None,
            end_time: None,
            done: false,
            subtasks: vec![],
            created_at: 0,
        };
        let popup = screen(&task);
        assert!(popup.iter().any(|row| row.contains("│  unscheduled")));
        assert!(popup.iter().any(|row| row.contains("no subtasks")));
    }
}
