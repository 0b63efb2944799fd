//! Event handling module.
//!
//! This module contains handlers for different types of events:
//! - Network events: loading and saving the task collection
//! - Console events: parsing and applying typed commands
//! - Terminal events: key presses feeding the command line

pub mod console;
pub mod network;
pub mod terminal;
