//! In-process key-value store.
//!
//! Keeps the collection for the lifetime of the process. Latency and an
//! offline switch can be configured to exercise the sync manager.

use super::{RemoteError, RemoteStore, TASKS_KEY};
use crate::model::Task;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Vec<Task>>>,
    latency: Option<Duration>,
    offline: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Start with a stored collection.
    ///
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let mut records = HashMap::new();
        records.insert(TASKS_KEY.to_owned(), tasks);
        MemoryStore {
            records: Mutex::new(records),
            ..MemoryStore::default()
        }
    }

    /// Delay every call by `latency`.
    ///
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make subsequent calls fail with `RemoteError::Unavailable`.
    ///
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of `get` calls issued, including failed ones.
    ///
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `set` calls issued, including failed ones.
    ///
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// The currently stored collection.
    ///
    pub async fn stored(&self) -> Option<Vec<Task>> {
        self.records.lock().await.get(TASKS_KEY).cloned()
    }

    async fn call(&self) -> Result<(), RemoteError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn get(&self) -> Result<Option<Vec<Task>>, RemoteError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.call().await?;
        Ok(self.stored().await)
    }

    async fn set(&self, tasks: &[Task]) -> Result<(), RemoteError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let tasks = tasks.to_vec();
        self.call().await?;
        self.records
            .lock()
            .await
            .insert(TASKS_KEY.to_owned(), tasks);
        Ok(())
    }

    fn describe(&self) -> String {
        String::from("memory")
    }
}
