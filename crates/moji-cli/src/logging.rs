//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! Every crate in the workspace logs through `tracing`; this module installs
//! the subscriber for the `mojimap` binary.
//!
//! # Log Levels
//!
//! - `error`: Run failures
//! - `warn`: Missing characters, unrepresentable characters, short records
//! - `info`: Run progress and the final report
//! - `debug`: Per-field changes, file details
//!
//! # Log Files
//!
//! With file output and no explicit path, logs go to `logs/` as
//! `mojimap-YYYY-MM-DD-HHMMSS.log`. The newest file is reused until it
//! reaches [`MAX_LOG_FILE_SIZE`].

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDateTime};
use moji_model::{LogLevel, LogOutput, LoggingConfig};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Default directory for generated log files.
pub const LOG_DIR: &str = "logs";

/// Log files at or above this size are not reused.
pub const MAX_LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;

const LOG_FILE_PREFIX: &str = "mojimap-";
const LOG_FILE_SUFFIX: &str = ".log";
const LOG_FILE_STAMP: &str = "%Y-%m-%d-%H%M%S";

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Maximum level emitted.
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace the level filter.
    pub use_env_filter: bool,
    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
    /// Whether to include target (module path) in log output.
    pub with_target: bool,
    /// Whether to use ANSI colors in output.
    pub with_ansi: bool,
    /// Output format.
    pub format: LogFormat,
    /// Optional log file path. When set, logs are appended to the file.
    pub log_file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON format for machine parsing.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::INFO,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

impl LogConfig {
    /// Base settings from the `logging` section of the configuration file.
    ///
    /// File output without an explicit path resolves a file under [`LOG_DIR`].
    ///
    /// # Errors
    ///
    /// Returns an error if the log directory cannot be created or listed.
    pub fn from_settings(settings: &LoggingConfig) -> io::Result<Self> {
        let log_file = match (settings.output, &settings.log_file) {
            (LogOutput::Console, _) => None,
            (LogOutput::File, Some(path)) => Some(path.clone()),
            (LogOutput::File, None) => Some(select_log_file(
                Path::new(LOG_DIR),
                Local::now().naive_local(),
            )?),
        };
        Ok(Self {
            level_filter: level_filter(settings.level),
            with_timestamps: log_file.is_some(),
            with_ansi: log_file.is_none(),
            log_file,
            ..Self::default()
        })
    }
}

/// Map a configured level to a filter.
pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
    }
}

/// Pick the log file inside `dir` for a run starting at `now`.
///
/// The newest `mojimap-YYYY-MM-DD-HHMMSS.log` is reused while it is smaller
/// than [`MAX_LOG_FILE_SIZE`]; otherwise a new name is stamped with `now`.
/// Creates `dir` when missing.
///
/// # Errors
///
/// Returns an error if `dir` cannot be created or read.
pub fn select_log_file(dir: &Path, now: NaiveDateTime) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let mut newest: Option<(NaiveDateTime, PathBuf)> = None;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(stamp) = name.to_str().and_then(parse_log_file_name) else {
            continue;
        };
        if newest.as_ref().is_none_or(|(current, _)| stamp > *current) {
            newest = Some((stamp, entry.path()));
        }
    }

    if let Some((_, path)) = newest {
        let size = std::fs::metadata(&path)?.len();
        if size < MAX_LOG_FILE_SIZE {
            return Ok(path);
        }
    }
    Ok(dir.join(log_file_name(now)))
}

fn log_file_name(stamp: NaiveDateTime) -> String {
    format!(
        "{LOG_FILE_PREFIX}{}{LOG_FILE_SUFFIX}",
        stamp.format(LOG_FILE_STAMP)
    )
}

fn parse_log_file_name(name: &str) -> Option<NaiveDateTime> {
    let stamp = name
        .strip_prefix(LOG_FILE_PREFIX)?
        .strip_suffix(LOG_FILE_SUFFIX)?;
    NaiveDateTime::parse_from_str(stamp, LOG_FILE_STAMP).ok()
}

/// Initialize the global tracing subscriber with the given configuration.
///
/// This should be called once at application startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    if let Some(path) = &config.log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        init_logging_with_writer(config, SharedFileWriter::new(file));
    } else {
        init_logging_with_writer(config, io::stderr);
    }
    Ok(())
}

/// Initialize logging with a custom writer (useful for testing).
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = build_env_filter(config.level_filter, config.use_env_filter);

    match config.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(config.with_target);

            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_writer(writer)
                .with_ansi(config.with_ansi)
                .with_target(config.with_target);

            if config.with_timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .init();
            }
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(config.with_ansi)
                .with_target(config.with_target);

            if config.with_timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .init();
            }
        }
    }
}

#[derive(Clone)]
struct SharedFileWriter {
    file: Arc<Mutex<std::fs::File>>,
}

impl SharedFileWriter {
    fn new(file: std::fs::File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

struct SharedFileGuard {
    file: Arc<Mutex<std::fs::File>>,
}

impl Write for SharedFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedFileWriter {
    type Writer = SharedFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedFileGuard {
            file: Arc::clone(&self.file),
        }
    }
}

/// Build an `EnvFilter` for the workspace crates at `level`.
///
/// `RUST_LOG` takes over when `use_env` is set and the variable parses.
fn build_env_filter(level: LevelFilter, use_env: bool) -> EnvFilter {
    let fallback = || {
        let level = level.to_string().to_lowercase();
        // External crates stay at warn level to reduce noise
        EnvFilter::new(format!(
            "warn,moji_cli={level},moji_core={level},moji_ingest={level},moji_model={level}"
        ))
    };
    if use_env {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    }
}
