//! Error types for sdsstools operations.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for sdsstools operations.
///
/// Configuration errors are fatal and propagate to the caller of the
/// construction, `load` or `reload` call that produced them.
#[derive(Error, Debug)]
pub enum ToolsError {
    /// An argument was not one of the accepted values or shapes
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An `#!extends` directive names a file that does not exist
    #[error("Cannot find !extends file {}", .0.display())]
    MissingExtendsTarget(PathBuf),

    /// An explicit user configuration path does not exist
    #[error("User path {} not found", .0.display())]
    UserPathNotFound(PathBuf),

    /// A key is missing under strict lookup
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Logging setup error
    #[error("Logging error: {0}")]
    Logging(String),

    /// The current observatory could not be determined
    #[error("Cannot determine the current observatory")]
    UnknownObservatory,

    /// A background task failed or was cancelled
    #[error("Task error: {0}")]
    Task(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal bug - should never happen in production
    #[error("Bug detected: {0}\n\nThis is an internal error, please report it.")]
    Bug(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for sdsstools operations.
pub type Result<T> = std::result::Result<T, ToolsError>;

/// Helper macro to create and return a ToolsError::Bug
///
/// # Example
///
/// ```ignore
/// if some_impossible_condition {
///     bug!("This should never happen: {:?}", condition);
/// }
/// ```
#[macro_export]
macro_rules! bug {
    ($msg:expr) => {
        return Err($crate::ToolsError::Bug($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::ToolsError::Bug(format!($fmt, $($arg)*)))
    };
}

/// Helper macro to bail out with a ToolsError
///
/// # Example
///
/// ```ignore
/// if !valid {
///     bail!(InvalidArgument, "invalid merge mode {:?}", mode);
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::ToolsError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::ToolsError::$variant(format!($fmt, $($arg)*)))
    };
    ($msg:expr) => {
        return Err($crate::ToolsError::Other($msg.to_string()))
    };
}
