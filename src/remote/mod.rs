//! Remote key-value store holding the task collection.
//!
//! The collection is always read and written whole. Backends:
//! - `HttpStore`: the `/tasks` HTTP endpoint
//! - `FileStore`: a local JSON file
//! - `MemoryStore`: process memory

mod error;
mod file;
mod http;
mod memory;

pub use error::RemoteError;
pub use file::FileStore;
pub use http::HttpStore;
pub use memory::MemoryStore;

use crate::config::{Config, RemoteKind};
use crate::error::AppError;
use crate::model::Task;
use async_trait::async_trait;
use std::sync::Arc;

/// The single key under which the task collection is stored.
///
pub const TASKS_KEY: &str = "flow:tasks";

/// Whole-value access to the stored task collection.
///
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Returns the stored collection, or None if nothing was stored yet.
    ///
    async fn get(&self) -> Result<Option<Vec<Task>>, RemoteError>;

    /// Overwrites the stored collection.
    ///
    async fn set(&self, tasks: &[Task]) -> Result<(), RemoteError>;

    /// Human-readable location for log messages.
    ///
    fn describe(&self) -> String;
}

/// Build the store selected by the configuration.
///
pub fn connect(config: &Config) -> Result<Arc<dyn RemoteStore>, AppError> {
    config.validate()?;
    let store: Arc<dyn RemoteStore> = match config.remote.kind {
        RemoteKind::Http => {
            let url = config
                .remote
                .url
                .as_deref()
                .ok_or(crate::config::ConfigError::RemoteUrlNotSet)?;
            Arc::new(HttpStore::new(url, config.remote.api_key.as_deref())?)
        }
        RemoteKind::File => Arc::new(FileStore::new(config.tasks_path()?)),
        RemoteKind::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}
