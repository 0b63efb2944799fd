use super::Frame;
use crate::model::TaskFormValues;
use crate::state::{Sheet, State};
use crate::ui::widgets::{centered_rect, styling};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Render the open add/edit sheet, if any.
///
pub fn sheet(frame: &mut Frame, size: Rect, state: &State) {
    let (title, mut lines) = match state.sheet() {
        Sheet::Closed => return,
        Sheet::Create { prefill_date } => {
            let date = prefill_date.as_deref().unwrap_or_default();
            (
                "new task",
                vec![
                    field("date ", date),
                    Line::from(""),
                    hint("add <title> [@date] [HH:MM[-HH:MM]] to save, close to cancel"),
                ],
            )
        }
        Sheet::Edit { task_id } => {
            let task = match state.task(task_id) {
                Some(task) => task,
                None => return,
            };
            let values = TaskFormValues::from_task(task);
            (
                "edit task",
                vec![
                    field("title", &values.title),
                    field("date ", &values.date),
                    field("start", &values.start_time),
                    field("end  ", &values.end_time),
                    Line::from(""),
                    hint("edit <id> [title] [@date] [time] to save, close to cancel"),
                ],
            )
        }
    };
    lines.insert(0, Line::from(""));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style())
        .title(Span::styled(title, styling::active_block_title_style()));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    let area = centered_rect(70, 50, size);
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn field(label: &'static str, value: &str) -> Line<'static> {
    let value = if value.is_empty() {
        Span::styled("-", styling::muted_text_style())
    } else {
        Span::styled(value.to_owned(), styling::normal_text_style())
    };
    Line::from(vec![
        Span::styled(format!("  {} ", label), styling::muted_text_style()),
        value,
    ])
}

fn hint(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, styling::muted_text_style()))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{draw, rows};
    use super::*;

    fn screen(state: &State) -> Vec<String> {
        let buffer = draw(60, 24, |frame| {
            let size = frame.size();
            sheet(frame, size, state)
        });
        rows(&buffer)
    }

    fn shows(screen: &[String], text: &str) -> bool {
        screen.iter().any(|row| row.contains(text))
    }

    #[test]
    fn closed_sheet_renders_nothing() {
        assert!(screen(&State::new()).iter().all(|row| row.is_empty()));
    }

    #[test]
    fn create_sheet_shows_prefill() {
        let mut state = State::new();
        state.open_create_sheet(Some("2024-01-09".to_owned()));
        let prefilled = screen(&state);
        assert!(shows(&prefilled, "new task"));
        assert!(shows(&prefilled, "│  date  2024-01-09"));

        state.open_create_sheet(None);
        assert!(shows(&screen(&state), "│  date  -"));
    }

    #[test]
    fn edit_sheet_is_prefilled() {
        let mut state = State::new();
        let task = state
            .add_task(&TaskFormValues::titled("Dentist").on("2024-01-09").at("08:00", ""))
            .unwrap();
        state.open_edit_sheet(&task.id);
        let form = screen(&state);
        assert!(shows(&form, "edit task"));
        assert!(shows(&form, "│  title Dentist"));
        assert!(shows(&form, "│  start 08:00"));
        assert!(shows(&form, "│  end   -"));
    }
}
