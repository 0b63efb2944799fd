use crate::remote::RemoteStore;
use crate::state::{State, SyncStatus, TaskSnapshot};
use crate::sync::WriteLedger;
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Specify struct for moving the task collection between state and the
/// remote store. Failures only ever show up as sync status.
///
#[derive(Clone)]
pub struct Handler {
    state: Arc<Mutex<State>>,
    store: Arc<dyn RemoteStore>,
    ledger: Arc<WriteLedger>,
}

impl Handler {
    /// Return new instance with reference to state.
    ///
    pub fn new(
        state: Arc<Mutex<State>>,
        store: Arc<dyn RemoteStore>,
        ledger: Arc<WriteLedger>,
    ) -> Self {
        Handler {
            state,
            store,
            ledger,
        }
    }

    /// Fetch the stored collection and install it as the state baseline.
    /// Returns the revision from which later changes count as local edits.
    ///
    pub async fn load(&self) -> u64 {
        self.state.lock().await.set_sync_status(SyncStatus::Loading);
        info!("Loading tasks from {}...", self.store.describe());
        let result = self.store.get().await;

        let mut state = self.state.lock().await;
        match result {
            Ok(tasks) => {
                let tasks = tasks.unwrap_or_default();
                info!("Loaded {} tasks.", tasks.len());
                let revision = state.replace_tasks(tasks);
                state.set_sync_status(SyncStatus::Synced);
                revision
            }
            Err(e) => {
                error!("Failed to load tasks from {}: {}", self.store.describe(), e);
                state.set_sync_status(SyncStatus::Error);
                state.revision()
            }
        }
    }

    /// Write a snapshot of the whole collection and settle the sync status,
    /// unless a newer write or change supersedes this one.
    ///
    pub async fn save(self, snapshot: TaskSnapshot) {
        debug!(
            "Saving revision {} ({} tasks)...",
            snapshot.revision,
            snapshot.tasks.len()
        );
        let result = self.store.set(&snapshot.tasks).await;
        if let Err(e) = &result {
            error!("Failed to save tasks to {}: {}", self.store.describe(), e);
        }

        let mut state = self.state.lock().await;
        match self.ledger.settle(snapshot.revision, result.is_ok()) {
            Some(status) => {
                state.set_sync_status(status);
            }
            None => debug!("Ignoring superseded write of revision {}.", snapshot.revision),
        }
    }
}
