use crate::utils::archive::ArchiveFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub backup: BackupConfig,
}

/// Global configuration settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GlobalConfig {
    /// Logging configuration
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_max_files")]
    pub log_max_files: u32,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_directory: default_log_directory(),
            log_level: default_log_level(),
            log_max_files: default_log_max_files(),
        }
    }
}

/// Backup defaults (overridable per invocation)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackupConfig {
    /// Directory holding the snapshot archives
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,

    /// Archive format used when none is given on the command line
    #[serde(default)]
    pub compression: ArchiveFormat,

    /// Number of snapshots kept per source (0 keeps everything)
    #[serde(default = "default_keep_versions")]
    pub keep_versions: u32,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            backup_dir: default_backup_dir(),
            compression: ArchiveFormat::default(),
            keep_versions: default_keep_versions(),
        }
    }
}

/// Resolved settings handed to the backup manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSettings {
    pub backup_dir: PathBuf,
    pub compression: ArchiveFormat,
    pub keep_versions: u32,
}

impl BackupSettings {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            compression: ArchiveFormat::default(),
            keep_versions: default_keep_versions(),
        }
    }

    pub fn with_compression(mut self, compression: ArchiveFormat) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_keep_versions(mut self, keep_versions: u32) -> Self {
        self.keep_versions = keep_versions;
        self
    }
}

// Default value functions

fn default_log_directory() -> PathBuf { PathBuf::from("~/.local/state/autokit/logs") }
fn default_log_level() -> String { "info".to_string() }
fn default_log_max_files() -> u32 { 10 }
fn default_backup_dir() -> PathBuf { PathBuf::from("~/backups") }
fn default_keep_versions() -> u32 { 5 }
