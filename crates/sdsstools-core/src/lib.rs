//! # sdsstools core
//!
//! Configuration, logging and small utilities shared by SDSS packages.
//!
//! This crate provides:
//!
//! - **Configuration**: layered YAML configuration with `${VAR}`
//!   interpolation, `#!extends` inclusion and dotted-key lookup
//! - **Logging**: console and rolling file output through `tracing`
//! - **Time**: SJD computation and a simple timer
//! - **Retrier**: retries with exponential backoff, blocking or async
//! - **Utilities**: YAML loading and merging, path expansion, task helpers
//!
//! ## Example
//!
//! ```no_run
//! use sdsstools_core::{get_config, log, time};
//!
//! // Package defaults from etc/myactor.yml, user overrides from
//! // $MYACTOR_CONFIG_PATH or ~/.config/sdss/myactor.yaml
//! let config = get_config!("myactor")?;
//!
//! let _guard = log::init_default()?;
//! tracing::info!(sjd = time::get_sjd(Some("APO"), None, true)?, "Starting");
//!
//! if let Some(port) = config.get_as::<u16>("actor.port")? {
//!     tracing::info!(port, "Listening");
//! }
//! # Ok::<(), sdsstools_types::ToolsError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod log;
pub mod retrier;
pub mod time;
pub mod util;

// Re-export commonly used items
pub use config::{ConfigItem, ConfigSource, ConfigView, Configuration, GetConfigOptions};
pub use retrier::{AttemptError, Retrier};
pub use sdsstools_types::{Result, ToolsError};
pub use util::{merge_config, read_yaml_file};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const APP_NAME: &str = "sdsstools";
