//! Logging configuration structures.
//!
//! These are plain serde types so that a `log:` section of a configuration
//! file can be deserialized straight into them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::{LogFormat, LogLevel, LogRotation};

/// Logger configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Logger name, used as the default filter target
    #[serde(default = "default_log_name")]
    pub name: String,
    /// Console log level
    #[serde(default)]
    pub level: LogLevel,
    /// Console format
    #[serde(default)]
    pub format: LogFormat,
    /// Optional file output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileLogConfig>,
}

fn default_log_name() -> String {
    "sdsstools".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            name: default_log_name(),
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

impl LogConfig {
    /// Create a configuration for a named logger with default settings.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// File log output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileLogConfig {
    /// Path of the log file; rotated files get a date suffix
    pub path: PathBuf,
    /// File log level
    #[serde(default = "default_file_level")]
    pub level: LogLevel,
    /// File format
    #[serde(default = "default_file_format")]
    pub format: LogFormat,
    /// Rotation schedule
    #[serde(default)]
    pub rotation: LogRotation,
}

fn default_file_level() -> LogLevel {
    LogLevel::Debug
}

fn default_file_format() -> LogFormat {
    LogFormat::Compact
}

impl FileLogConfig {
    /// File output at `path` with debug level, compact format, daily rotation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            level: default_file_level(),
            format: default_file_format(),
            rotation: LogRotation::default(),
        }
    }
}
