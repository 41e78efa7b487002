//! Logging setup.
//!
//! Records go through the `log` facade. [`init`] installs a `fern` dispatch that
//! feeds a shared in-memory [`Logger`] buffer and, when enabled in the
//! configuration, a log file under the platform data directory.

use anyhow::{Context, Result};
use chrono::Local;
use log::LevelFilter;
use once_cell::sync::OnceCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use crate::config::LoggingConfig;
use crate::constants::{LOG_BUFFER_CAPACITY, LOG_FILE_NAME, LOG_TIMESTAMP_FORMAT};

static DISPATCH_INSTALLED: OnceCell<()> = OnceCell::new();

/// Shared in-memory log buffer that can be used across the application
#[derive(Clone)]
pub struct Logger {
    logs: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl Logger {
    pub fn new() -> Self {
        Self::with_capacity(LOG_BUFFER_CAPACITY)
    }

    /// Buffer that keeps at most `capacity` entries, dropping the oldest first.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            logs: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// Add a log entry
    pub fn log(&self, message: String) {
        let timestamp = Local::now().format(LOG_TIMESTAMP_FORMAT).to_string();
        let formatted_message = format!("[{}] {}", timestamp, message);
        self.push(formatted_message);
    }

    fn push(&self, line: String) {
        if let Ok(mut logs) = self.logs.lock() {
            if logs.len() == self.capacity {
                logs.pop_front();
            }
            logs.push_back(line);
        }
    }

    /// Get all logs sorted by date (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            logs.iter().rev().cloned().collect()
        } else {
            Vec::new()
        }
    }

    pub fn len(&self) -> usize {
        self.logs.lock().map(|logs| logs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all logs
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Path of the log file written when file logging is enabled.
pub fn get_log_file_path() -> Result<PathBuf> {
    let dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
        .join("sitelens");
    Ok(dir.join(LOG_FILE_NAME))
}

/// Install the global log dispatch.
///
/// Only the first call in a process installs anything; later calls return
/// `Ok(())` and keep the first configuration.
pub fn init(config: &LoggingConfig, buffer: &Logger) -> Result<()> {
    DISPATCH_INSTALLED
        .get_or_try_init(|| -> Result<()> {
            let level = LevelFilter::from_str(&config.level)
                .with_context(|| format!("Invalid log level '{}'", config.level))?;

            let sink = buffer.clone();
            let mut dispatch = fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!("{} {} {}", record.level(), record.target(), message))
                })
                .level(level)
                // Keep SQL driver chatter out of the application log
                .level_for("sqlx", LevelFilter::Warn)
                .level_for("sea_orm", LevelFilter::Warn)
                .chain(fern::Output::call(move |record| sink.log(record.args().to_string())));

            if config.enabled {
                let path = get_log_file_path()?;
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
                }
                let file = fern::log_file(&path)
                    .with_context(|| format!("Failed to open log file: {}", path.display()))?;
                dispatch = dispatch.chain(
                    fern::Dispatch::new()
                        .format(|out, message, _record| {
                            out.finish(format_args!("[{}] {}", Local::now().format(LOG_TIMESTAMP_FORMAT), message))
                        })
                        .chain(file),
                );
            }

            dispatch.apply().context("Failed to install logger")?;
            Ok(())
        })
        .map(|_| ())
}
