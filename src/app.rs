use crate::config::Config;
use crate::events::terminal::{Event, Handler as TerminalEventHandler};
use crate::remote;
use crate::state::State;
use crate::sync::SyncManager;
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout, Stdout};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Oversees state management, remote sync and terminal interaction.
///
pub struct App {
    state: Arc<Mutex<State>>,
    config: Config,
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub async fn start(config: Config) -> Result<()> {
        info!("Starting application...");
        let store = remote::connect(&config)?;
        let state = State::new();
        let changes = state.subscribe();
        let app = App {
            state: Arc::new(Mutex::new(state)),
            config,
        };

        debug!("Starting sync manager for {}...", store.describe());
        let sync = SyncManager::new(
            Arc::clone(&app.state),
            changes,
            store,
            app.config.debounce(),
        )
        .spawn();

        let result = app.start_ui().await;

        sync.shutdown().await;
        info!("Exiting application...");
        result
    }

    /// Set up the terminal, run the render loop and restore the terminal
    /// whatever the loop returned.
    ///
    async fn start_ui(&self) -> Result<()> {
        debug!("Starting user interface on main task...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        let result = self.run_ui(&mut terminal).await;

        disable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    /// Draw, then wait for the next key press or tick. Return following an
    /// exit request or unrecoverable error.
    ///
    async fn run_ui(&self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut handler = TerminalEventHandler::new()?;
        loop {
            let today = chrono::Local::now().date_naive();
            {
                let state = self.state.lock().await;
                terminal.draw(|frame| {
                    crate::ui::render(frame, &state, handler.input(), handler.reply(), today)
                })?;
            }

            match handler.next().await {
                Some(Event::Input(key)) => {
                    let mut state = self.state.lock().await;
                    if !handler.handle_key(key, &mut state, today) {
                        debug!("Received application exit request.");
                        break;
                    }
                }
                Some(Event::Tick) => {}
                None => {
                    warn!("Terminal input closed.");
                    break;
                }
            }
        }
        Ok(())
    }
}
