//! Fluent API for building test configurations
//!
//! Provides a builder pattern for creating test configurations with sensible defaults.

use autokit_backup::config::{BackupConfig, Config, GlobalConfig};
use autokit_backup::utils::archive::ArchiveFormat;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for creating test configurations
pub struct ConfigBuilder {
    temp_dir: TempDir,
    global: GlobalConfig,
    backup: BackupConfig,
}

impl ConfigBuilder {
    /// Create a new ConfigBuilder with backup and log directories inside a temp dir
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        // Create log directory
        let log_directory = temp_dir.path().join("logs");
        fs::create_dir_all(&log_directory).expect("Failed to create log_directory");

        let global = GlobalConfig {
            log_directory,
            log_level: "info".to_string(),
            log_max_files: 5,
        };

        let backup = BackupConfig {
            backup_dir: temp_dir.path().join("backups"),
            compression: ArchiveFormat::Zip,
            keep_versions: 5,
        };

        Self {
            temp_dir,
            global,
            backup,
        }
    }

    /// Set the backup directory
    pub fn with_backup_dir(mut self, path: &Path) -> Self {
        self.backup.backup_dir = path.to_path_buf();
        self
    }

    /// Set the default compression
    pub fn with_compression(mut self, compression: ArchiveFormat) -> Self {
        self.backup.compression = compression;
        self
    }

    /// Set the default retention
    pub fn with_keep_versions(mut self, keep_versions: u32) -> Self {
        self.backup.keep_versions = keep_versions;
        self
    }

    /// Set the log directory
    pub fn with_log_dir(mut self, path: &Path) -> Self {
        self.global.log_directory = path.to_path_buf();
        self
    }

    /// Set the log level
    pub fn with_log_level(mut self, level: &str) -> Self {
        self.global.log_level = level.to_string();
        self
    }

    /// Get the temp directory path
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        Config {
            global: self.global,
            backup: self.backup,
        }
    }

    /// Build and write `config.toml` into the temp dir.
    ///
    /// Returns the config, its path and the TempDir (which must be kept alive).
    pub fn persist(self) -> (Config, PathBuf, TempDir) {
        let config = Config {
            global: self.global,
            backup: self.backup,
        };

        let config_path = self.temp_dir.path().join("config.toml");
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize config");
        fs::write(&config_path, toml_str).expect("Failed to write config file");

        (config, config_path, self.temp_dir)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
