use crate::events::console::{ConsoleError, Handler as ConsoleHandler, Outcome};
use crate::state::{Pane, State};
use chrono::NaiveDate;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use log::*;
use std::{thread, time::Duration};
use tokio::sync::mpsc;

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 250;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Specify struct for terminal events and the command line being typed.
///
pub struct Handler {
    rx: mpsc::UnboundedReceiver<Event<KeyEvent>>,
    console: ConsoleHandler,
    input: String,
    reply: Option<String>,
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new() -> Result<Self, ConsoleError> {
        let (tx, rx) = mpsc::unbounded_channel();
        thread::spawn(move || poll_input(tx));
        Handler::with_receiver(rx)
    }

    fn with_receiver(rx: mpsc::UnboundedReceiver<Event<KeyEvent>>) -> Result<Self, ConsoleError> {
        Ok(Handler {
            rx,
            console: ConsoleHandler::new()?,
            input: String::new(),
            reply: None,
        })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Output of the last submitted command, if it printed anything.
    ///
    pub fn reply(&self) -> Option<&str> {
        self.reply.as_deref()
    }

    /// Wait for the next terminal event. None once the poll thread stopped.
    ///
    pub async fn next(&mut self) -> Option<Event<KeyEvent>> {
        self.rx.recv().await
    }

    /// Handle one key press. Returns false if exit was requested.
    ///
    pub fn handle_key(&mut self, key: KeyEvent, state: &mut State, today: NaiveDate) -> bool {
        match key {
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => {
                debug!("Processing exit terminal event '{:?}'...", key);
                return false;
            }
            KeyEvent {
                code: KeyCode::Enter,
                ..
            } => return self.submit(state, today),
            KeyEvent {
                code: KeyCode::Esc, ..
            } => {
                if self.input.is_empty() {
                    state.close_detail().close_sheet();
                    self.reply = None;
                } else {
                    self.input.clear();
                }
            }
            KeyEvent {
                code: KeyCode::Backspace,
                ..
            } => {
                self.input.pop();
            }
            KeyEvent {
                code: KeyCode::Tab, ..
            } if self.input.is_empty() => {
                let pane = match state.pane() {
                    Pane::List => Pane::Calendar,
                    Pane::Calendar => Pane::List,
                };
                state.set_pane(pane);
            }
            KeyEvent {
                code: KeyCode::Left,
                ..
            } if self.input.is_empty() && state.pane() == Pane::Calendar => {
                state.nudge_cal_offset(-1);
            }
            KeyEvent {
                code: KeyCode::Right,
                ..
            } if self.input.is_empty() && state.pane() == Pane::Calendar => {
                state.nudge_cal_offset(1);
            }
            KeyEvent {
                code: KeyCode::Char(c),
                modifiers,
                ..
            } if modifiers == KeyModifiers::NONE || modifiers == KeyModifiers::SHIFT => {
                self.input.push(c);
            }
            _ => {}
        }
        true
    }

    /// Run the typed line through the console and keep its reply.
    ///
    fn submit(&mut self, state: &mut State, today: NaiveDate) -> bool {
        let line = std::mem::take(&mut self.input);
        match self.console.handle_line(&line, state, today) {
            Ok(Outcome::Print(text)) => self.reply = Some(text),
            Ok(Outcome::Nothing) => self.reply = None,
            Ok(Outcome::Quit) => {
                debug!("Received application exit request.");
                return false;
            }
            Err(e) => {
                debug!("Rejected console input '{}': {}", line, e);
                self.reply = Some(format!("error: {}", e));
            }
        }
        true
    }
}

/// Forward key presses and periodic ticks until the receiver is dropped.
///
fn poll_input(tx: mpsc::UnboundedSender<Event<KeyEvent>>) {
    let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
    loop {
        match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(Event::Input(key)).is_err() {
                        return;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    error!("Failed to read terminal event: {}", e);
                    return;
                }
            },
            Ok(false) => {}
            Err(e) => {
                error!("Failed to poll terminal events: {}", e);
                return;
            }
        }
        if tx.send(Event::Tick).is_err() {
            return;
        }
    }
}
