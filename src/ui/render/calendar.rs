use super::rows::{check, task_line};
use super::Frame;
use crate::model::calendar::{date_key, focus_date, month_grid, period_label, week_days, CalMode};
use crate::model::format::{fmt12, fmt_dur, fmt_range};
use crate::model::sort::build_task_map;
use crate::model::{short_id, Task};
use crate::state::State;
use crate::ui::widgets::styling;
use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
};
use std::collections::BTreeSet;

/// Hours always shown by the day view.
///
const DAY_HOURS: std::ops::RangeInclusive<u32> = 7..=21;

/// Month cells list at most this many tasks before collapsing to a count.
///
const MONTH_CELL_TASKS: usize = 3;

/// Render the calendar pane for the current mode and offset.
///
pub fn calendar(frame: &mut Frame, size: Rect, state: &State, today: NaiveDate) {
    let mode = state.cal_mode();
    let focus = focus_date(mode, state.cal_offset(), today);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style())
        .title(Span::styled(
            format!(
                "< {} >  [{}]",
                period_label(mode, focus, today),
                mode.as_str()
            ),
            styling::active_block_title_style(),
        ));
    let inner = block.inner(size);
    frame.render_widget(block, size);

    match mode {
        CalMode::Day => day_view(frame, inner, state.tasks(), focus),
        CalMode::Week => week_view(frame, inner, state.tasks(), focus, today),
        CalMode::Month => month_view(
            frame,
            inner,
            state.tasks(),
            focus,
            today,
            state.selected_day(),
        ),
    }
}

fn hour_of(time: &str) -> Option<u32> {
    time.split(':').next()?.parse().ok()
}

/// Untimed tasks on top, then one table row per hour.
///
fn day_view(frame: &mut Frame, size: Rect, tasks: &[Task], focus: NaiveDate) {
    let map = build_task_map(tasks);
    let day = map.get(date_key(focus).as_str()).cloned().unwrap_or_default();
    let (timed, untimed): (Vec<&Task>, Vec<&Task>) =
        day.into_iter().partition(|task| task.start_time.is_some());

    let mut top = Vec::new();
    if !untimed.is_empty() {
        top.push(Line::from(Span::styled(
            "UNSCHEDULED",
            styling::active_block_title_style(),
        )));
        for task in &untimed {
            let mut line = task_line(task);
            line.spans.insert(0, Span::raw("  "));
            top.push(line);
        }
    }
    if timed.is_empty() && untimed.is_empty() {
        top.push(Line::from(Span::styled(
            "— nothing here —",
            styling::muted_text_style(),
        )));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(top.len() as u16), Constraint::Min(0)])
        .split(size);
    frame.render_widget(Paragraph::new(top), chunks[0]);

    let mut hours: BTreeSet<u32> = DAY_HOURS.collect();
    hours.extend(
        timed
            .iter()
            .filter_map(|task| task.start_time.as_deref().and_then(hour_of)),
    );
    let rows: Vec<Row> = hours
        .into_iter()
        .map(|hour| {
            let slot: Vec<Line> = timed
                .iter()
                .filter(|task| task.start_time.as_deref().and_then(hour_of) == Some(hour))
                .map(|task| timed_line(task))
                .collect();
            let height = slot.len().max(1) as u16;
            Row::new(vec![
                Cell::from(Span::styled(
                    format!("{:>6} │", fmt12(&format!("{:02}:00", hour))),
                    styling::muted_text_style(),
                )),
                Cell::from(Text::from(slot)),
            ])
            .height(height)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(8), Constraint::Min(10)]);
    frame.render_widget(table, chunks[1]);
}

fn timed_line(task: &Task) -> Line<'static> {
    let mut when = fmt_range(task.start_time.as_deref(), task.end_time.as_deref());
    if let Some(mins) = task.duration() {
        when.push_str(&format!(" · {}", fmt_dur(mins)));
    }
    let title_style = if task.done {
        styling::done_text_style()
    } else {
        styling::normal_text_style()
    };
    Line::from(vec![
        Span::raw(format!("{} ", check(task.done))),
        Span::styled(
            format!("{}  ", short_id(&task.id)),
            styling::muted_text_style(),
        ),
        Span::styled(task.title.clone(), title_style),
        Span::styled(format!("  {}", when), styling::time_text_style()),
    ])
}

/// Day header such as `TUE  2*` or `THU  4  (1)`; `*` marks today and the
/// count is of pending tasks.
///
fn week_header(day: NaiveDate, today: NaiveDate, pending: usize) -> String {
    let marker = if day == today { "*" } else { " " };
    let mut header = format!(
        "{} {:>2}{}",
        day.format("%a").to_string().to_uppercase(),
        day.day(),
        marker
    );
    if pending > 0 {
        header.push_str(&format!(" ({})", pending));
    }
    header.trim_end().to_owned()
}

fn week_view(frame: &mut Frame, size: Rect, tasks: &[Task], focus: NaiveDate, today: NaiveDate) {
    let map = build_task_map(tasks);
    let rows: Vec<Row> = week_days(focus)
        .into_iter()
        .map(|day| {
            let key = date_key(day);
            let day_tasks = map.get(key.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            let pending = day_tasks.iter().filter(|task| !task.done).count();
            let header_style = if day == today {
                styling::today_style()
            } else {
                styling::active_block_title_style()
            };
            let lines: Vec<Line> = if day_tasks.is_empty() {
                vec![Line::from(Span::styled("—", styling::muted_text_style()))]
            } else {
                day_tasks.iter().map(|task| task_line(task)).collect()
            };
            let height = lines.len() as u16;
            Row::new(vec![
                Cell::from(Span::styled(week_header(day, today, pending), header_style)),
                Cell::from(Text::from(lines)),
            ])
            .height(height)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(10)]);
    frame.render_widget(table, size);
}

/// Text of one month cell: the day number, then as many titles as fit.
///
fn month_cell(
    day: NaiveDate,
    day_tasks: &[&Task],
    today: NaiveDate,
    selected: Option<&str>,
) -> Text<'static> {
    let key = date_key(day);
    let (marker, style) = if Some(key.as_str()) == selected {
        ('>', styling::selected_day_style())
    } else if day == today {
        ('*', styling::today_style())
    } else {
        (' ', Style::default())
    };
    let mut lines = vec![Line::from(Span::styled(
        format!("{}{:>2}", marker, day.day()),
        style,
    ))];

    let shown = if day_tasks.len() > MONTH_CELL_TASKS {
        MONTH_CELL_TASKS - 1
    } else {
        day_tasks.len()
    };
    for task in &day_tasks[..shown] {
        let style = if task.done {
            styling::done_text_style()
        } else {
            styling::time_text_style()
        };
        lines.push(Line::from(Span::styled(task.title.clone(), style)));
    }
    if shown < day_tasks.len() {
        lines.push(Line::from(Span::styled(
            format!("+{}", day_tasks.len() - shown),
            styling::muted_text_style(),
        )));
    }
    Text::from(lines)
}

fn month_view(
    frame: &mut Frame,
    size: Rect,
    tasks: &[Task],
    focus: NaiveDate,
    today: NaiveDate,
    selected: Option<&str>,
) {
    let map = build_task_map(tasks);
    let mut grid_height = 1;
    let rows: Vec<Row> = month_grid(focus)
        .chunks(7)
        .map(|week| {
            let cells: Vec<Text> = week
                .iter()
                .map(|day| {
                    if day.month() != focus.month() {
                        return Text::from(Span::styled("  ·", styling::muted_text_style()));
                    }
                    let key = date_key(*day);
                    let day_tasks = map.get(key.as_str()).map(Vec::as_slice).unwrap_or(&[]);
                    month_cell(*day, day_tasks, today, selected)
                })
                .collect();
            let height = cells.iter().map(Text::height).max().unwrap_or(1) as u16;
            grid_height += height;
            Row::new(cells.into_iter().map(Cell::from)).height(height)
        })
        .collect();

    let header = Row::new(["  S", "  M", "  T", "  W", "  T", "  F", "  S"])
        .style(styling::muted_text_style());
    let table = Table::new(rows, [Constraint::Ratio(1, 7); 7]).header(header);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(grid_height), Constraint::Min(0)])
        .split(size);
    frame.render_widget(table, chunks[0]);

    if let Some(day) = selected {
        if let Some(day_tasks) = map.get(day) {
            let mut items = vec![ListItem::new(Line::from(Span::styled(
                format!("── {}", day),
                styling::active_block_title_style(),
            )))];
            items.extend(day_tasks.iter().map(|task| {
                let mut line = task_line(task);
                line.spans.insert(0, Span::raw("  "));
                ListItem::new(line)
            }));
            frame.render_widget(List::new(items), chunks[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{draw, row_of, rows};
    use super::*;
    use crate::model::TaskFormValues;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn screen(state: &State, width: u16, height: u16) -> Vec<String> {
        let buffer = draw(width, height, |frame| {
            let size = frame.size();
            calendar(frame, size, state, today())
        });
        rows(&buffer)
    }

    #[test]
    fn day_view_places_tasks_by_hour() {
        let mut state = State::new();
        state
            .add_task(&TaskFormValues::titled("Standup").on("2024-01-02").at("09:00", "09:30"))
            .unwrap();
        state
            .add_task(&TaskFormValues::titled("Late call").on("2024-01-02").at("23:15", ""))
            .unwrap();
        state
            .add_task(&TaskFormValues::titled("Errands").on("2024-01-02"))
            .unwrap();

        let shown = screen(&state, 70, 24);
        assert!(shown[0].contains("< Tue, Jan 2 · today >  [day]"));
        assert!(row_of(&shown, "UNSCHEDULED") < row_of(&shown, "Errands"));
        let standup = &shown[row_of(&shown, "Standup")];
        assert!(standup.starts_with("│ 9:00a │ [ ] "));
        assert!(standup.contains("9:00a–9:30a · 30m"));
        assert!(shown[row_of(&shown, "Late call")].starts_with("│11:00p │"));
        assert!(row_of(&shown, " 9:00p │") < row_of(&shown, "Late call"));
        assert!(!shown.iter().any(|row| row.contains("nothing here")));
    }

    #[test]
    fn empty_day() {
        let mut state = State::new();
        state.set_cal_offset(1);
        let shown = screen(&state, 50, 20);
        assert!(shown[0].contains("< Wed, Jan 3 >  [day]"));
        assert!(shown[1].starts_with("│— nothing here —"));
        assert!(shown[2].starts_with("│ 7:00a │"));
    }

    #[test]
    fn week_view_lists_each_day() {
        let mut state = State::new();
        state.set_cal_mode(CalMode::Week);
        state
            .add_task(&TaskFormValues::titled("Gym").on("2024-01-04"))
            .unwrap();
        let shown = screen(&state, 60, 12);
        assert!(shown[0].contains("< Dec 31 – Jan 6 >  [week]"));
        assert!(shown[1].starts_with("│SUN 31"));
        assert!(shown[1].contains("—"));
        assert!(shown[3].starts_with("│TUE  2*"));
        let thursday = &shown[row_of(&shown, "THU  4  (1)")];
        assert!(thursday.contains("Gym"));
    }

    #[test]
    fn month_view_marks_days_and_selection() {
        let mut state = State::new();
        state.set_cal_mode(CalMode::Month);
        state
            .add_task(&TaskFormValues::titled("Rent").on("2024-01-15"))
            .unwrap();
        state.set_selected_day(Some("2024-01-15".to_owned()));
        let shown = screen(&state, 80, 20);
        assert!(shown[0].contains("< January 2024 >  [month]"));
        assert!(shown[1].contains("  S"));
        assert!(shown.iter().any(|row| row.contains("* 2")));
        let fifteenth = row_of(&shown, ">15");
        assert!(shown[fifteenth + 1].contains("Rent"));
        let panel = row_of(&shown, "── 2024-01-15");
        assert!(panel > fifteenth);
        assert!(shown[panel + 1].contains("Rent"));
    }

    #[test]
    fn month_cell_collapses_overflow() {
        let mut state = State::new();
        for title in ["a", "b", "c", "d"] {
            state
                .add_task(&TaskFormValues::titled(title).on("2024-01-10"))
                .unwrap();
        }
        let tasks: Vec<&Task> = state.tasks().iter().collect();
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let cell = month_cell(day, &tasks, today(), None);
        assert_eq!(cell.height(), MONTH_CELL_TASKS + 1);
        let last: String = cell.lines[MONTH_CELL_TASKS]
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        assert_eq!(last, "+2");
    }
}
