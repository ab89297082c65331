//! Logging setup for the CLI
//!
//! Every command except `validate` logs to two places:
//! - stderr, at INFO, without targets
//! - `autokit-backup.log.<date>` in the configured log directory, at the
//!   configured level, one file per day
//!
//! `RUST_LOG` replaces both filters when set.

use crate::config::{expand_tilde, GlobalConfig};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Rolled files are named `{LOG_FILE_NAME}.{YYYY-MM-DD}`
const LOG_FILE_NAME: &str = "autokit-backup.log";

/// Where and how much the file layer logs
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_directory: PathBuf,
    /// Level of the file layer; stderr stays at INFO
    pub log_level: Level,
    /// Rolled files kept after startup cleanup
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::from_config(&GlobalConfig::default())
    }
}

impl LoggingConfig {
    pub fn from_config(global: &GlobalConfig) -> Self {
        Self::new(&global.log_directory, &global.log_level, global.log_max_files)
    }

    /// Unknown level names fall back to INFO (the config loader rejects them first)
    pub fn new(log_directory: &Path, log_level: &str, max_files: u32) -> Self {
        let log_level = match log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" | "warning" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        Self {
            log_directory: log_directory.to_path_buf(),
            log_level,
            max_files,
        }
    }
}

/// Install the stderr and rolling-file subscribers.
///
/// Keep the returned guard alive until exit; dropping it flushes the file writer.
pub fn init_logging(config: &LoggingConfig) -> Result<LogGuard> {
    let log_dir = expand_tilde(&config.log_directory);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

    let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(level_filter(config.log_level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(level_filter(Level::INFO));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    prune_log_files(&log_dir, config.max_files)?;

    Ok(LogGuard { _guard: guard })
}

/// Stderr-only logging, used before a config file has been validated
pub fn init_console_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn level_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("autokit_backup={}", level))
            .add_directive(LevelFilter::from_level(level).into())
    })
}

/// Keep the `max_files` newest rolled files.
///
/// The date suffix sorts lexically, so names order the files by age.
fn prune_log_files(log_dir: &Path, max_files: u32) -> Result<()> {
    let mut rolled: Vec<PathBuf> = fs::read_dir(log_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(LOG_FILE_NAME))
        .map(|entry| entry.path())
        .collect();

    rolled.sort_unstable_by(|a, b| b.cmp(a));

    for path in rolled.into_iter().skip(max_files as usize) {
        match fs::remove_file(&path) {
            Ok(()) => tracing::debug!("Removed old log file: {:?}", path),
            Err(e) => tracing::warn!("Failed to remove old log file {:?}: {}", path, e),
        }
    }

    Ok(())
}

/// Flushes the file writer when dropped
pub struct LogGuard {
    _guard: WorkerGuard,
}
