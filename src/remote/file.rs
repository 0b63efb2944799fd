//! Local JSON file acting as a key-value store.
//!
//! The file holds an object mapping keys to task arrays. Every write
//! replaces the file atomically.

use super::{RemoteError, RemoteStore, TASKS_KEY};
use crate::model::Task;
use async_trait::async_trait;
use log::*;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

type Records = BTreeMap<String, Vec<Task>>;

/// Stores the task collection under one key in a JSON file.
///
pub struct FileStore {
    path: PathBuf,
    key: String,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileStore {
            path: path.as_ref().to_path_buf(),
            key: TASKS_KEY.to_owned(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RemoteError + '_ {
    move |source| RemoteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn read_records(path: &Path) -> Result<Records, RemoteError> {
    if !path.exists() {
        return Ok(Records::new());
    }
    let contents = std::fs::read_to_string(path).map_err(io_error(path))?;
    if contents.trim().is_empty() {
        return Ok(Records::new());
    }
    Ok(serde_json::from_str(&contents)?)
}

fn write_records(path: &Path, records: &Records) -> Result<(), RemoteError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(io_error(&dir))?;
    let content = serde_json::to_string_pretty(records)?;
    let mut temp_file = NamedTempFile::new_in(&dir).map_err(io_error(&dir))?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(io_error(path))?;
    temp_file.as_file().sync_all().map_err(io_error(path))?;
    temp_file
        .persist(path)
        .map_err(|e| io_error(path)(e.error))?;
    Ok(())
}

#[async_trait]
impl RemoteStore for FileStore {
    async fn get(&self) -> Result<Option<Vec<Task>>, RemoteError> {
        let path = self.path.clone();
        let key = self.key.clone();
        debug!("Reading task collection from {}...", path.display());
        let mut records = tokio::task::spawn_blocking(move || read_records(&path)).await??;
        Ok(records.remove(&key))
    }

    async fn set(&self, tasks: &[Task]) -> Result<(), RemoteError> {
        let path = self.path.clone();
        let key = self.key.clone();
        let tasks = tasks.to_vec();
        debug!("Writing {} tasks to {}...", tasks.len(), path.display());
        tokio::task::spawn_blocking(move || {
            let mut records = read_records(&path)?;
            records.insert(key, tasks);
            write_records(&path, &records)
        })
        .await?
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
