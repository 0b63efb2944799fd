//! Application state management module.
//!
//! This module contains the state store for the application, including:
//! - Main `State` struct holding the task collection and selection state
//! - Navigation types (Pane, CalMode, Sheet, SyncStatus)
//! - Change snapshots published on every collection change
//! - State error handling

mod error;
mod navigation;

pub use error::StateError;
pub use navigation::{CalMode, Pane, Sheet, SyncStatus};

#[path = "state_impl.rs"]
mod state_impl;

pub use state_impl::{State, TaskSnapshot};
