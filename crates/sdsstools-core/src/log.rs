//! Logging setup on top of `tracing`.
//!
//! [`init`] installs a global subscriber with a console layer on stderr and,
//! optionally, a non-blocking rolling file layer. Keep the returned
//! [`LogGuard`] alive for as long as file output should be flushed.
//!
//! ```no_run
//! use sdsstools_core::log;
//! use sdsstools_types::{FileLogConfig, LogConfig};
//!
//! let mut config = LogConfig::named("myactor");
//! config.file = Some(FileLogConfig::new("/data/logs/myactor/myactor.log"));
//!
//! let _guard = log::init(&config)?;
//! tracing::info!("Logging to console and file");
//! # Ok::<(), sdsstools_types::ToolsError>(())
//! ```

use sdsstools_types::{FileLogConfig, LogConfig, LogFormat, LogLevel, LogRotation, Result, ToolsError};
use std::fs;
use std::path::Path;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Filter, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps the file writer alive. Dropping it flushes pending records.
#[derive(Debug)]
#[must_use = "file logging stops when the guard is dropped"]
pub struct LogGuard {
    name: String,
    file: Option<WorkerGuard>,
}

impl LogGuard {
    /// Name of the logger this guard belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether records are also written to a file.
    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }
}

/// Initialize logging with info level, pretty format and no file output.
pub fn init_default() -> Result<LogGuard> {
    init(&LogConfig::default())
}

/// Initialize logging from configuration.
///
/// A log file that cannot be opened is not fatal: the console keeps working
/// and a warning is emitted once the subscriber is installed. Installing a
/// second subscriber fails.
pub fn init(config: &LogConfig) -> Result<LogGuard> {
    let mut layers: Vec<BoxedLayer> = vec![formatted(
        config.format,
        std::io::stderr,
        true,
        console_filter(config.level),
    )];

    let mut guard = None;
    let mut pending_warning = None;

    if let Some(file) = &config.file {
        match file_writer(file) {
            Ok(appender) => {
                let (writer, worker) = tracing_appender::non_blocking(appender);
                layers.push(formatted(file.format, writer, false, level_filter(file.level)));
                guard = Some(worker);
            }
            Err(e) => pending_warning = Some(e),
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| ToolsError::Logging(e.to_string()))?;

    if let Some(e) = pending_warning {
        warn!(logger = %config.name, "Logging to file disabled: {}", e);
    }

    Ok(LogGuard {
        name: config.name.clone(),
        file: guard,
    })
}

/// `RUST_LOG` if set, otherwise the configured level.
fn console_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_filter(level).into()))
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::None => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

fn rotation(rotation: LogRotation) -> Rotation {
    match rotation {
        LogRotation::Never => Rotation::NEVER,
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
    }
}

fn formatted<W, F>(format: LogFormat, writer: W, ansi: bool, filter: F) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    F: Filter<Registry> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_ansi(ansi);
    match format {
        LogFormat::Pretty => layer.pretty().with_filter(filter).boxed(),
        LogFormat::Json => layer.json().with_filter(filter).boxed(),
        LogFormat::Compact => layer.compact().with_filter(filter).boxed(),
    }
}

/// Create the log directory and open the rolling appender.
fn file_writer(file: &FileLogConfig) -> Result<RollingFileAppender> {
    let dir = match file.path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = file
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ToolsError::Logging(format!("Invalid log file path {}", file.path.display())))?;

    fs::create_dir_all(dir).map_err(|e| {
        ToolsError::Logging(format!("Cannot create log directory {}: {}", dir.display(), e))
    })?;

    RollingFileAppender::builder()
        .rotation(rotation(file.rotation))
        .filename_prefix(prefix)
        .build(dir)
        .map_err(|e| ToolsError::Logging(format!("Cannot open {}: {}", file.path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter(LogLevel::None), LevelFilter::OFF);
        assert_eq!(level_filter(LogLevel::Warn), LevelFilter::WARN);
        assert_eq!(level_filter(LogLevel::Trace), LevelFilter::TRACE);
    }

    #[test]
    fn test_file_writer_creates_directory() {
        let dir = TempDir::new().unwrap();
        let mut file = FileLogConfig::new(dir.path().join("logs/nested/actor.log"));
        file.rotation = LogRotation::Never;

        file_writer(&file).unwrap();
        assert!(dir.path().join("logs/nested").is_dir());
    }

    #[test]
    fn test_file_writer_unopenable_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "").unwrap();

        let file = FileLogConfig::new(blocker.join("actor.log"));
        assert!(matches!(file_writer(&file), Err(ToolsError::Logging(_))));
    }

    // The only test that installs the global subscriber.
    #[test]
    fn test_init_writes_file_and_rejects_second_init() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("actor.log");

        let mut config = LogConfig::named("actor");
        config.level = LogLevel::Warn;
        config.file = Some(FileLogConfig {
            path: path.clone(),
            level: LogLevel::Debug,
            format: LogFormat::Compact,
            rotation: LogRotation::Never,
        });

        let guard = init(&config).unwrap();
        assert_eq!(guard.name(), "actor");
        assert!(guard.has_file());

        tracing::info!("written to the file only");
        assert!(matches!(init_default(), Err(ToolsError::Logging(_))));

        drop(guard);
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("written to the file only"));
    }
}
