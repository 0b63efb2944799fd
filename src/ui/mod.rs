//! User interface module.
//!
//! This module renders the state with the `ratatui` library:
//! - Status bar with the sync indicator
//! - Flat list grouped by date
//! - Day, week and month calendar views
//! - Task detail and add/edit sheet popups
//! - Command line and command output

type Frame<'a> = ratatui::Frame<'a>;

mod render;
mod widgets;

pub use render::render;
