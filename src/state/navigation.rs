//! Navigation-related state types.
//!
//! This module contains the transient selection types: which pane is shown,
//! the add/edit sheet, and the synchronization status indicator.

pub use crate::model::calendar::CalMode;

/// Specifying the different panes.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Pane {
    List,
    Calendar,
}

/// Specifying the add/edit sheet.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Sheet {
    Closed,
    Create { prefill_date: Option<String> },
    Edit { task_id: String },
}

/// Specifying the remote synchronization status.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SyncStatus {
    Idle,
    Loading,
    Syncing,
    Synced,
    Error,
}

impl SyncStatus {
    /// Short indicator text.
    ///
    pub fn label(&self) -> &'static str {
        match self {
            SyncStatus::Idle => "--",
            SyncStatus::Loading => "loading",
            SyncStatus::Syncing => "saving",
            SyncStatus::Synced => "synced",
            SyncStatus::Error => "offline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pane() {
        assert_eq!(Pane::List, Pane::List);
        assert_ne!(Pane::List, Pane::Calendar);
    }

    #[test]
    fn test_sheet() {
        assert_ne!(
            Sheet::Create { prefill_date: None },
            Sheet::Edit { task_id: "1".to_owned() }
        );
        assert_eq!(Sheet::Closed, Sheet::Closed);
    }

    #[test]
    fn test_sync_status_label() {
        assert_eq!(SyncStatus::Idle.label(), "--");
        assert_eq!(SyncStatus::Syncing.label(), "saving");
        assert_eq!(SyncStatus::Error.label(), "offline");
    }
}
