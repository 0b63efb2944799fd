//! Line-oriented command console.
//!
//! Each input line is parsed into a `Command` and applied to the state
//! through its command methods. Remote persistence is left to the sync
//! manager, which observes the resulting changes.

use crate::model::calendar::{date_key, parse_date, CalMode};
use crate::model::{short_id, Subtask, Task, TaskFormValues};
use crate::state::{Pane, Sheet, State, StateError};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use log::*;
use regex::Regex;

/// `HH:MM` or `HH:MM-HH:MM`.
///
const TIME_PATTERN: &str = r"^(\d{2}:\d{2})(?:-(\d{2}:\d{2}))?$";

const CLEAR_DATE: &str = "@none";
const CLEAR_TIME: &str = "@notime";

pub const HELP: &str = "\
tasks
  add <title> [@date] [HH:MM[-HH:MM]]    add a task
  edit <id> [title] [@date] [time]       change a task, or open it in the edit sheet
  done <id>                              toggle done
  rm <id>                                delete a task
  sub <id> <title>                       add a subtask
  subdone <id> <subid>                   toggle a subtask
  subrm <id> <subid>                     delete a subtask
views
  list                                   flat list grouped by date
  cal [day|week|month]                   calendar
  next | prev | today                    move the calendar
  pick <date>                            select a day in the month view
  show <id> | close                      open or close task detail
  new [@date]                            open the add sheet
  status | help | quit
keys
  tab switches pane, left/right move the calendar, esc closes, ctrl-c quits
dates are YYYY-MM-DD, today or tomorrow; @none clears a date, @notime clears times
";

/// Console-specific errors. None of them change state.
///
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Unknown command '{0}', type `help` for a list")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid date '{0}', expected YYYY-MM-DD, today or tomorrow")]
    InvalidDate(String),

    #[error("Invalid time '{0}', expected HH:MM or HH:MM-HH:MM")]
    InvalidTime(String),

    #[error("No task matches '{0}'")]
    NoSuchTask(String),

    #[error("No subtask matches '{0}'")]
    NoSuchSubtask(String),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("Failed to compile pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Title, date and time given on an `add` or `edit` line. For dates and
/// times, `None` means "not given" and an empty value means "clear".
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskArgs {
    pub title: String,
    pub date: Option<String>,
    pub times: Option<(String, String)>,
}

impl TaskArgs {
    /// Overlay the given fields on existing form values. A missing title
    /// keeps the current one.
    ///
    pub fn apply(&self, mut values: TaskFormValues) -> TaskFormValues {
        if !self.title.is_empty() {
            values.title = self.title.clone();
        }
        if let Some(date) = &self.date {
            values.date = date.clone();
        }
        if let Some((start, end)) = &self.times {
            values.start_time = start.clone();
            values.end_time = end.clone();
        }
        values
    }

    fn is_empty(&self) -> bool {
        self.title.is_empty() && self.date.is_none() && self.times.is_none()
    }
}

/// Specify different console commands.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(TaskArgs),
    Edit { task: String, args: Option<TaskArgs> },
    Done(String),
    Remove(String),
    AddSubtask { task: String, title: String },
    ToggleSubtask { task: String, subtask: String },
    RemoveSubtask { task: String, subtask: String },
    List,
    Calendar(Option<CalMode>),
    Next,
    Prev,
    Today,
    Pick(String),
    Show(String),
    Close,
    New(Option<String>),
    Status,
    Help,
    Quit,
}

/// Result of handling one line.
///
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    Nothing,
    Quit,
}

/// Specify struct for parsing and applying console commands.
///
pub struct Handler {
    time: Regex,
}

impl Handler {
    /// Return new instance with compiled patterns.
    ///
    pub fn new() -> Result<Self, ConsoleError> {
        Ok(Handler {
            time: Regex::new(TIME_PATTERN)?,
        })
    }

    /// Parse and apply one input line. A blank line does nothing.
    ///
    pub fn handle_line(
        &self,
        line: &str,
        state: &mut State,
        today: NaiveDate,
    ) -> Result<Outcome, ConsoleError> {
        match self.parse(line, today)? {
            Some(command) => {
                debug!("Processing console command {:?}...", command);
                execute(command, state, today)
            }
            None => Ok(Outcome::Nothing),
        }
    }

    /// Parse one input line. Blank lines parse to None.
    ///
    pub fn parse(&self, line: &str, today: NaiveDate) -> Result<Option<Command>, ConsoleError> {
        let mut words = line.split_whitespace();
        let name = match words.next() {
            Some(name) => name,
            None => return Ok(None),
        };
        let rest: Vec<&str> = words.collect();

        let command = match name {
            "add" | "a" => {
                let args = self.task_args(&rest, today)?;
                if args.title.trim().is_empty() {
                    return Err(StateError::BlankTitle.into());
                }
                Command::Add(args)
            }
            "edit" | "e" => {
                let (task, rest) = rest
                    .split_first()
                    .ok_or(ConsoleError::Usage("edit <id> [title] [@date] [time]"))?;
                let args = self.task_args(rest, today)?;
                Command::Edit {
                    task: task.to_string(),
                    args: if args.is_empty() { None } else { Some(args) },
                }
            }
            "done" | "x" => Command::Done(one(&rest, "done <id>")?),
            "rm" => Command::Remove(one(&rest, "rm <id>")?),
            "sub" => {
                let (task, title) = rest
                    .split_first()
                    .ok_or(ConsoleError::Usage("sub <id> <title>"))?;
                if title.is_empty() {
                    return Err(StateError::BlankTitle.into());
                }
                Command::AddSubtask {
                    task: task.to_string(),
                    title: title.join(" "),
                }
            }
            "subdone" => {
                let (task, subtask) = two(&rest, "subdone <id> <subid>")?;
                Command::ToggleSubtask { task, subtask }
            }
            "subrm" => {
                let (task, subtask) = two(&rest, "subrm <id> <subid>")?;
                Command::RemoveSubtask { task, subtask }
            }
            "list" | "ls" => Command::List,
            "cal" => match rest.as_slice() {
                [] => Command::Calendar(None),
                [mode] => Command::Calendar(Some(
                    CalMode::parse(mode).ok_or(ConsoleError::Usage("cal [day|week|month]"))?,
                )),
                _ => return Err(ConsoleError::Usage("cal [day|week|month]")),
            },
            "next" | "n" => Command::Next,
            "prev" | "p" => Command::Prev,
            "today" => Command::Today,
            "pick" => {
                let date = one(&rest, "pick <date>")?;
                Command::Pick(resolve_date(date.trim_start_matches('@'), today)?)
            }
            "show" => Command::Show(one(&rest, "show <id>")?),
            "close" => Command::Close,
            "new" => match rest.as_slice() {
                [] => Command::New(None),
                [date] if date.starts_with('@') => {
                    Command::New(Some(resolve_date(&date[1..], today)?))
                }
                _ => return Err(ConsoleError::Usage("new [@date]")),
            },
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(ConsoleError::UnknownCommand(other.to_owned())),
        };
        Ok(Some(command))
    }

    /// Split words into title, `@date` and time tokens.
    ///
    fn task_args(&self, words: &[&str], today: NaiveDate) -> Result<TaskArgs, ConsoleError> {
        let mut args = TaskArgs::default();
        let mut title = Vec::new();
        for word in words {
            if *word == CLEAR_DATE {
                args.date = Some(String::new());
            } else if *word == CLEAR_TIME {
                args.times = Some((String::new(), String::new()));
            } else if let Some(date) = word.strip_prefix('@') {
                args.date = Some(resolve_date(date, today)?);
            } else if let Some(captures) = self.time.captures(word) {
                let start = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
                let end = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
                for time in [start, end].iter().filter(|time| !time.is_empty()) {
                    if NaiveTime::parse_from_str(time, "%H:%M").is_err() {
                        return Err(ConsoleError::InvalidTime(word.to_string()));
                    }
                }
                args.times = Some((start.to_owned(), end.to_owned()));
            } else {
                title.push(*word);
            }
        }
        args.title = title.join(" ");
        Ok(args)
    }
}

fn one(words: &[&str], usage: &'static str) -> Result<String, ConsoleError> {
    match words {
        [word] => Ok(word.to_string()),
        _ => Err(ConsoleError::Usage(usage)),
    }
}

fn two(words: &[&str], usage: &'static str) -> Result<(String, String), ConsoleError> {
    match words {
        [first, second] => Ok((first.to_string(), second.to_string())),
        _ => Err(ConsoleError::Usage(usage)),
    }
}

/// Accepts `YYYY-MM-DD`, `today` and `tomorrow`.
///
fn resolve_date(value: &str, today: NaiveDate) -> Result<String, ConsoleError> {
    match value {
        "today" => Ok(date_key(today)),
        "tomorrow" => Ok(date_key(today + Duration::days(1))),
        _ => parse_date(value)
            .map(date_key)
            .ok_or_else(|| ConsoleError::InvalidDate(value.to_owned())),
    }
}

/// Months between the month of `today` and the month of `date`.
///
fn month_offset(date: NaiveDate, today: NaiveDate) -> i32 {
    (date.year() - today.year()) * 12 + date.month() as i32 - today.month() as i32
}

fn find_task(state: &State, handle: &str) -> Result<Task, ConsoleError> {
    state
        .resolve_task(handle)
        .cloned()
        .ok_or_else(|| ConsoleError::NoSuchTask(handle.to_owned()))
}

fn find_subtask<'a>(task: &'a Task, handle: &str) -> Result<&'a Subtask, ConsoleError> {
    if let Some(subtask) = task.subtasks.iter().find(|subtask| subtask.id == handle) {
        return Ok(subtask);
    }
    let mut matches = task
        .subtasks
        .iter()
        .filter(|subtask| short_id(&subtask.id) == handle);
    match (matches.next(), matches.next()) {
        (Some(subtask), None) => Ok(subtask),
        _ => Err(ConsoleError::NoSuchSubtask(handle.to_owned())),
    }
}

/// Apply a parsed command to the state.
///
pub fn execute(
    command: Command,
    state: &mut State,
    today: NaiveDate,
) -> Result<Outcome, ConsoleError> {
    let reply = match command {
        Command::Add(args) => {
            let mut values = args.apply(TaskFormValues::default());
            if args.date.is_none() {
                if let Sheet::Create {
                    prefill_date: Some(date),
                } = state.sheet()
                {
                    values.date = date.clone();
                }
            }
            let task = state.add_task(&values)?;
            state.close_sheet();
            format!("added {}  {}", short_id(&task.id), task.title)
        }
        Command::Edit { task, args } => {
            let task = find_task(state, &task)?;
            match args {
                Some(args) => {
                    let values = args.apply(TaskFormValues::from_task(&task));
                    state.update_task(&task.id, &values).close_sheet();
                    format!("updated {}", short_id(&task.id))
                }
                None => {
                    state.open_edit_sheet(&task.id);
                    return Ok(Outcome::Nothing);
                }
            }
        }
        Command::Done(task) => {
            let task = find_task(state, &task)?;
            state.toggle_task(&task.id);
            let verb = if task.done { "reopened" } else { "completed" };
            format!("{} {}", verb, short_id(&task.id))
        }
        Command::Remove(task) => {
            let task = find_task(state, &task)?;
            state.delete_task(&task.id);
            format!("removed {}  {}", short_id(&task.id), task.title)
        }
        Command::AddSubtask { task, title } => {
            let task = find_task(state, &task)?;
            let subtask = state.add_subtask(&task.id, &title)?;
            format!("added {} to {}", short_id(&subtask.id), short_id(&task.id))
        }
        Command::ToggleSubtask { task, subtask } => {
            let task = find_task(state, &task)?;
            let subtask = find_subtask(&task, &subtask)?;
            state.toggle_subtask(&task.id, &subtask.id);
            let verb = if subtask.done { "reopened" } else { "completed" };
            format!("{} {}", verb, short_id(&subtask.id))
        }
        Command::RemoveSubtask { task, subtask } => {
            let task = find_task(state, &task)?;
            let subtask = find_subtask(&task, &subtask)?;
            state.delete_subtask(&task.id, &subtask.id);
            format!("removed {}", short_id(&subtask.id))
        }
        Command::List => {
            state.set_pane(Pane::List);
            return Ok(Outcome::Nothing);
        }
        Command::Calendar(mode) => {
            state.set_pane(Pane::Calendar);
            if let Some(mode) = mode {
                state.set_cal_mode(mode);
            }
            return Ok(Outcome::Nothing);
        }
        Command::Next => {
            state.set_pane(Pane::Calendar).nudge_cal_offset(1);
            return Ok(Outcome::Nothing);
        }
        Command::Prev => {
            state.set_pane(Pane::Calendar).nudge_cal_offset(-1);
            return Ok(Outcome::Nothing);
        }
        Command::Today => {
            state.set_pane(Pane::Calendar).set_cal_offset(0);
            return Ok(Outcome::Nothing);
        }
        Command::Pick(day) => {
            state.set_pane(Pane::Calendar);
            if state.cal_mode() != CalMode::Month {
                state.set_cal_mode(CalMode::Month);
            }
            if let Some(date) = parse_date(&day) {
                state.set_cal_offset(month_offset(date, today));
            }
            if state.selected_day() == Some(day.as_str()) {
                state.set_selected_day(None);
            } else {
                state.set_selected_day(Some(day));
            }
            return Ok(Outcome::Nothing);
        }
        Command::Show(task) => {
            let task = find_task(state, &task)?;
            state.open_detail(&task.id);
            return Ok(Outcome::Nothing);
        }
        Command::Close => {
            state.close_detail().close_sheet();
            return Ok(Outcome::Nothing);
        }
        Command::New(date) => {
            state.open_create_sheet(date);
            return Ok(Outcome::Nothing);
        }
        Command::Status => format!(
            "{} tasks · {} pending · {}",
            state.tasks().len(),
            state.tasks().iter().filter(|task| !task.done).count(),
            state.sync_status().label()
        ),
        Command::Help => HELP.to_owned(),
        Command::Quit => return Ok(Outcome::Quit),
    };
    Ok(Outcome::Print(reply))
}
