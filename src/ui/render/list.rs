use super::rows::task_line;
use super::Frame;
use crate::model::calendar::{date_key, parse_date};
use crate::model::sort::group_for_list;
use crate::model::Task;
use crate::ui::widgets::styling;
use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// Render the flat list view grouped by date.
///
pub fn list(frame: &mut Frame, size: Rect, tasks: &[Task], today: NaiveDate) {
    let pending = tasks.iter().filter(|task| !task.done).count();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style())
        .title(Span::styled(
            format!("list · {} pending", pending),
            styling::active_block_title_style(),
        ));

    if tasks.is_empty() {
        let text = Paragraph::new(vec![
            Line::from("$ no tasks yet"),
            Line::from(Span::styled(
                "  type `add <title>` to create",
                styling::muted_text_style(),
            )),
        ])
        .block(block)
        .alignment(Alignment::Left);
        frame.render_widget(text, size);
        return;
    }

    let today_key = date_key(today);
    let mut items = Vec::new();
    for group in group_for_list(tasks) {
        let style = if group.date == Some(today_key.as_str()) {
            styling::today_style()
        } else {
            styling::active_block_title_style()
        };
        items.push(ListItem::new(Line::from(Span::styled(
            format!("── {}", group_label(group.date, today)),
            style,
        ))));
        for task in group.tasks {
            let mut line = task_line(task);
            line.spans.insert(0, Span::raw("  "));
            items.push(ListItem::new(line));
        }
    }

    let list = List::new(items)
        .style(styling::normal_text_style())
        .block(block);
    frame.render_widget(list, size);
}

fn group_label(date: Option<&str>, today: NaiveDate) -> String {
    let key = match date {
        Some(key) => key,
        None => return String::from("unscheduled"),
    };
    match parse_date(key) {
        Some(day) => {
            let mut label = day.format("%a, %b %-d").to_string().to_uppercase();
            if key == date_key(today) {
                label.push_str(" · TODAY");
            }
            label
        }
        None => key.to_owned(),
    }
}
