//! # sdsstools types
//!
//! Types, traits, and enums shared by the sdsstools crates.
//!
//! This crate provides:
//!
//! - The [`ToolsError`] taxonomy and the [`Result`] alias
//! - Enums for log levels, configuration merge modes, and observatories
//! - Serializable logging configuration
//! - The [`VarSource`] trait used for environment variable lookups
//!
//! ## Example
//!
//! ```
//! use sdsstools_types::{MergeMode, Observatory};
//!
//! let mode: MergeMode = "replace".parse().unwrap();
//! assert_eq!(mode, MergeMode::Replace);
//!
//! let obs: Observatory = "apo".parse().unwrap();
//! assert_eq!(obs.sjd_offset(), 0.3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod enums;
pub mod traits;
pub mod config;

// Re-export common types for convenience
pub use errors::{ToolsError, Result};
pub use enums::{LogLevel, LogFormat, LogRotation, MergeMode, Observatory};
pub use traits::{MapVars, ProcessEnv, VarSource};
pub use config::{FileLogConfig, LogConfig};

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
