//! Remote persistence of the task collection.
//!
//! One load at startup, then whole-collection writes debounced after the
//! last local change. Writes are never cancelled; the status of an older
//! write is dropped once a newer change exists.

use crate::events::network::Handler;
use crate::remote::RemoteStore;
use crate::state::{State, SyncStatus, TaskSnapshot};
use log::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch, Mutex};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{sleep_until, Instant};

/// Quiet period after the last change before a write starts.
///
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);

/// Orders write completions by the revision they carry.
///
#[derive(Debug, Default)]
pub struct WriteLedger {
    latest_change: AtomicU64,
    completed: AtomicU64,
}

impl WriteLedger {
    /// Note a local change that will be written later.
    ///
    pub fn record_change(&self, revision: u64) {
        self.latest_change.fetch_max(revision, Ordering::SeqCst);
    }

    /// Returns the status a finished write of `revision` should install, or
    /// None when a newer write finished first or a newer change is pending.
    ///
    pub fn settle(&self, revision: u64, ok: bool) -> Option<SyncStatus> {
        let previous = self.completed.fetch_max(revision, Ordering::SeqCst);
        if previous > revision || self.latest_change.load(Ordering::SeqCst) > revision {
            return None;
        }
        Some(if ok {
            SyncStatus::Synced
        } else {
            SyncStatus::Error
        })
    }
}

/// Specify struct for the background task keeping the remote copy current.
///
/// The state owns the change sender and outlives the manager, so the only
/// way to stop it is `SyncHandle::shutdown`.
///
pub struct SyncManager {
    handler: Handler,
    state: Arc<Mutex<State>>,
    changes: watch::Receiver<TaskSnapshot>,
    ledger: Arc<WriteLedger>,
    debounce: Duration,
}

/// Running sync manager.
///
pub struct SyncHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Flush any pending change, wait for in-flight writes and stop.
    ///
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            error!("Sync manager stopped abnormally: {}", e);
        }
    }
}

impl SyncManager {
    /// Return new instance. `changes` must come from the same state.
    ///
    pub fn new(
        state: Arc<Mutex<State>>,
        changes: watch::Receiver<TaskSnapshot>,
        store: Arc<dyn RemoteStore>,
        debounce: Duration,
    ) -> Self {
        let ledger = Arc::new(WriteLedger::default());
        SyncManager {
            handler: Handler::new(Arc::clone(&state), store, Arc::clone(&ledger)),
            state,
            changes,
            ledger,
            debounce,
        }
    }

    pub fn spawn(self) -> SyncHandle {
        let (shutdown, signal) = oneshot::channel();
        SyncHandle {
            shutdown,
            task: tokio::spawn(self.run(signal)),
        }
    }

    async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        let baseline = self.handler.load().await;
        let mut writes = JoinSet::new();
        let mut deadline = None;

        // Anything changed during the load was replaced by it.
        let current = self.changes.borrow_and_update().revision;
        if current > baseline {
            deadline = Some(self.observe(current).await);
        }

        loop {
            tokio::select! {
                changed = self.changes.changed() => {
                    // Only after the state is dropped; stop instead of spinning.
                    if changed.is_err() {
                        break;
                    }
                    let revision = self.changes.borrow_and_update().revision;
                    if revision > baseline {
                        deadline = Some(self.observe(revision).await);
                    }
                }
                _ = deadline_elapsed(deadline) => {
                    deadline = None;
                    writes.spawn(self.handler.clone().save(self.latest()));
                }
                Some(joined) = writes.join_next(), if !writes.is_empty() => {
                    if let Err(e) = joined {
                        error!("Write task failed: {}", e);
                    }
                }
                _ = &mut shutdown => break,
            }
        }

        if deadline.is_some() {
            info!("Flushing pending changes...");
            writes.spawn(self.handler.clone().save(self.latest()));
        }
        while let Some(joined) = writes.join_next().await {
            if let Err(e) = joined {
                error!("Write task failed: {}", e);
            }
        }
        debug!("Sync manager stopped.");
    }

    /// Mark the state as syncing and return the new write deadline.
    ///
    async fn observe(&self, revision: u64) -> Instant {
        let mut state = self.state.lock().await;
        self.ledger.record_change(revision);
        state.set_sync_status(SyncStatus::Syncing);
        Instant::now() + self.debounce
    }

    fn latest(&self) -> TaskSnapshot {
        self.changes.borrow().clone()
    }
}

async fn deadline_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskFormValues;
    use crate::remote::MemoryStore;
    use fake::{Fake, Faker};

    const DEBOUNCE: Duration = DEFAULT_DEBOUNCE;

    fn start(store: &Arc<MemoryStore>) -> (Arc<Mutex<State>>, SyncHandle) {
        let state = State::new();
        let changes = state.subscribe();
        let state = Arc::new(Mutex::new(state));
        let remote: Arc<dyn RemoteStore> = store.clone();
        let manager = SyncManager::new(Arc::clone(&state), changes, remote, DEBOUNCE);
        (state, manager.spawn())
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    async fn status(state: &Arc<Mutex<State>>) -> SyncStatus {
        state.lock().await.sync_status()
    }

    #[test]
    fn ledger_settles_latest_write() {
        let ledger = WriteLedger::default();
        ledger.record_change(1);
        assert_eq!(ledger.settle(1, true), Some(SyncStatus::Synced));
        ledger.record_change(2);
        assert_eq!(ledger.settle(2, false), Some(SyncStatus::Error));
    }

    #[test]
    fn ledger_ignores_write_with_newer_change_pending() {
        let ledger = WriteLedger::default();
        ledger.record_change(1);
        ledger.record_change(2);
        assert_eq!(ledger.settle(1, false), None);
        assert_eq!(ledger.settle(2, true), Some(SyncStatus::Synced));
    }

    #[test]
    fn ledger_ignores_out_of_order_completion() {
        let ledger = WriteLedger::default();
        ledger.record_change(3);
        assert_eq!(ledger.settle(3, true), Some(SyncStatus::Synced));
        assert_eq!(ledger.settle(1, false), None);
    }

    #[tokio::test(start_paused = true)]
    async fn loads_once_then_writes_after_quiet_period() {
        let store = Arc::new(MemoryStore::new());
        let (state, handle) = start(&store);
        settle().await;
        assert_eq!(status(&state).await, SyncStatus::Synced);
        assert_eq!(store.read_count(), 1);

        let task = state
            .lock()
            .await
            .add_task(&TaskFormValues::titled("Buy milk"))
            .unwrap();
        settle().await;
        assert_eq!(status(&state).await, SyncStatus::Syncing);
        assert_eq!(store.write_count(), 0);

        tokio::time::sleep(DEBOUNCE + Duration::from_millis(10)).await;
        settle().await;
        assert_eq!(status(&state).await, SyncStatus::Synced);
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.stored().await, Some(vec![task]));

        handle.shutdown().await;
        assert_eq!(store.read_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_changes_coalesce_into_one_write() {
        let store = Arc::new(MemoryStore::new());
        let (state, handle) = start(&store);
        settle().await;

        let task = state
            .lock()
            .await
            .add_task(&TaskFormValues::titled("one"))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        state.lock().await.toggle_task(&task.id);
        tokio::time::sleep(Duration::from_millis(200)).await;
        state
            .lock()
            .await
            .add_task(&TaskFormValues::titled("two"))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(store.write_count(), 0);

        tokio::time::sleep(DEBOUNCE).await;
        settle().await;
        assert_eq!(store.write_count(), 1);
        let expected = state.lock().await.tasks().to_vec();
        assert_eq!(store.stored().await, Some(expected));
        assert_eq!(status(&state).await, SyncStatus::Synced);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn load_is_not_written_back() {
        let remote = vec![Faker.fake()];
        let store = Arc::new(
            MemoryStore::with_tasks(remote.clone()).with_latency(Duration::from_secs(1)),
        );
        let (state, handle) = start(&store);
        settle().await;
        assert_eq!(status(&state).await, SyncStatus::Loading);

        // An edit made while loading is replaced and never written.
        state
            .lock()
            .await
            .add_task(&TaskFormValues::titled("early"))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;
        settle().await;
        assert_eq!(state.lock().await.tasks(), &remote[..]);
        assert_eq!(status(&state).await, SyncStatus::Synced);

        tokio::time::sleep(DEBOUNCE * 3).await;
        assert_eq!(store.write_count(), 0);

        let id = remote[0].id.clone();
        state.lock().await.toggle_task(&id);
        tokio::time::sleep(DEBOUNCE + Duration::from_millis(1100)).await;
        settle().await;
        assert_eq!(store.write_count(), 1);
        assert_eq!(status(&state).await, SyncStatus::Synced);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn no_op_commands_do_not_write() {
        let store = Arc::new(MemoryStore::new());
        let (state, handle) = start(&store);
        settle().await;

        state
            .lock()
            .await
            .toggle_task("missing")
            .delete_task("missing")
            .update_task("missing", &TaskFormValues::titled("x"));
        tokio::time::sleep(DEBOUNCE * 2).await;
        settle().await;
        assert_eq!(store.write_count(), 0);
        assert_eq!(status(&state).await, SyncStatus::Synced);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failures_surface_as_error_until_next_change() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        let (state, handle) = start(&store);
        settle().await;
        assert_eq!(status(&state).await, SyncStatus::Error);

        let task = state
            .lock()
            .await
            .add_task(&TaskFormValues::titled("offline"))
            .unwrap();
        tokio::time::sleep(DEBOUNCE + Duration::from_millis(10)).await;
        settle().await;
        assert_eq!(status(&state).await, SyncStatus::Error);
        assert_eq!(store.write_count(), 1);

        // No retry without a new change.
        tokio::time::sleep(DEBOUNCE * 5).await;
        assert_eq!(store.write_count(), 1);

        store.set_offline(false);
        state.lock().await.toggle_task(&task.id);
        tokio::time::sleep(DEBOUNCE + Duration::from_millis(10)).await;
        settle().await;
        assert_eq!(status(&state).await, SyncStatus::Synced);
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.stored().await.map(|tasks| tasks[0].done), Some(true));
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn idle_manager_runs_until_shutdown() {
        let store = Arc::new(MemoryStore::new());
        let (state, handle) = start(&store);
        tokio::time::sleep(DEBOUNCE * 10).await;
        settle().await;
        assert!(!handle.task.is_finished());

        handle.shutdown().await;
        assert_eq!(store.write_count(), 0);
        assert_eq!(status(&state).await, SyncStatus::Synced);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_flushes_pending_change() {
        let store = Arc::new(MemoryStore::new());
        let (state, handle) = start(&store);
        settle().await;

        let task = state
            .lock()
            .await
            .add_task(&TaskFormValues::titled("last words"))
            .unwrap();
        settle().await;
        assert_eq!(store.write_count(), 0);

        handle.shutdown().await;
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.stored().await, Some(vec![task]));
        assert_eq!(status(&state).await, SyncStatus::Synced);
    }
}
