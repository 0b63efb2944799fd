//! Logging backend.
//!
//! Formats records with a UTC timestamp. The terminal UI owns the screen
//! while it runs, so the app logs to a file in the configuration directory;
//! one-shot commands log to stderr.

use crate::error::AppError;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Format a log record into a single line.
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!("{} {} {}", timestamp, level_str, record.args())
}

/// Logger writing records at or above a level to a sink.
///
pub struct Logger {
    level: LevelFilter,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Logger {
    pub fn new(level: LevelFilter) -> Self {
        Logger {
            level,
            sink: Mutex::new(Box::new(std::io::stderr())),
        }
    }

    /// Logger appending to the file at `path`, created when missing.
    ///
    pub fn to_file(level: LevelFilter, path: &Path) -> Result<Self, AppError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Logger {
            level,
            sink: Mutex::new(Box::new(file)),
        })
    }

    /// Install as the global logger. Fails when a logger is already set.
    ///
    pub fn init(self) -> Result<(), AppError> {
        let level = self.level;
        log::set_logger(Box::leak(Box::new(self))).map_err(|e| AppError::Logger(e.to_string()))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut sink) = self.sink.lock() {
            let _ = writeln!(sink, "{}", format_log(record));
        }
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.flush();
        }
    }
}
