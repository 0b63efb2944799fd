//! Configuration management module.
//!
//! This module handles loading and saving the application configuration:
//! which remote store holds the task collection, how long to debounce
//! writes, and the log level.

mod error;

pub use error::ConfigError;

use crate::error::AppError;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

const FILE_NAME: &str = "config.yml";
const TASKS_FILE_NAME: &str = "tasks.json";
const LOG_FILE_NAME: &str = "flow.log";
const DEFAULT_DIRECTORY_PATH: &str = ".config/flow";

/// Specifying where the task collection is kept.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteKind {
    Http,
    File,
    Memory,
}

impl Default for RemoteKind {
    fn default() -> Self {
        RemoteKind::File
    }
}

/// Remote store settings.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub kind: RemoteKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub remote: RemoteConfig,
    pub debounce_ms: u64,
    pub log_level: String,
    dir_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_debounce_ms() -> u64 {
    crate::sync::DEFAULT_DEBOUNCE.as_millis() as u64
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance with default settings.
    ///
    pub fn new() -> Config {
        Config {
            remote: RemoteConfig::default(),
            debounce_ms: default_debounce_ms(),
            log_level: default_log_level(),
            dir_path: None,
        }
    }

    /// Load configuration from the custom directory if provided, otherwise
    /// from the default directory. The directory is created when missing;
    /// a missing file keeps the defaults.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        let file_path = dir_path.join(Path::new(FILE_NAME));
        self.dir_path = Some(dir_path);

        if file_path.exists() {
            let contents = fs::read_to_string(&file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            let data: FileSpec = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
            self.remote = data.remote;
            self.debounce_ms = data.debounce_ms;
            self.log_level = data.log_level;
        }

        self.validate()?;
        Ok(())
    }

    /// Check settings that cannot be expressed by the file format alone.
    ///
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote.kind == RemoteKind::Http && self.remote.url.is_none() {
            return Err(ConfigError::RemoteUrlNotSet);
        }
        self.log_level_filter()?;
        Ok(())
    }

    /// Serialize the configuration and write it to the disk.
    ///
    pub fn save(&self) -> Result<PathBuf, AppError> {
        let file_path = self.file_path().ok_or(ConfigError::FilePathNotSet)?;
        let data = FileSpec {
            remote: self.remote.clone(),
            debounce_ms: self.debounce_ms,
            log_level: self.log_level.clone(),
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(&file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(file_path)
    }

    /// Path of the configuration file, once a directory is known.
    ///
    pub fn file_path(&self) -> Option<PathBuf> {
        self.dir_path.as_ref().map(|dir| dir.join(FILE_NAME))
    }

    /// Location of the task file for the `file` remote kind.
    ///
    pub fn tasks_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.remote.path {
            return Ok(path.clone());
        }
        self.dir_path
            .as_ref()
            .map(|dir| dir.join(TASKS_FILE_NAME))
            .ok_or(ConfigError::FilePathNotSet)
    }

    /// Location of the log file written while the terminal UI runs.
    ///
    pub fn log_path(&self) -> Result<PathBuf, ConfigError> {
        self.dir_path
            .as_ref()
            .map(|dir| dir.join(LOG_FILE_NAME))
            .ok_or(ConfigError::FilePathNotSet)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    /// Returns the path buffer for the default configuration directory or an
    /// error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}
