use super::types::*;
use super::expand_tilde;
use crate::utils::archive::ArchiveFormat;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "warning", "error"];

/// Load and validate configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load configuration, falling back to defaults when `path` is absent.
///
/// An explicitly requested file must exist; the default location may not.
pub fn load_or_default<P: AsRef<Path>>(path: P, explicit: bool) -> Result<Config> {
    let path = expand_tilde(path.as_ref());
    if !explicit && !path.exists() {
        return Ok(Config::default());
    }
    load_config(path)
}

/// Default config file location (`<config_dir>/autokit/backup.toml`)
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("autokit")
        .join("backup.toml")
}

/// Validate the configuration
fn validate_config(config: &Config) -> Result<()> {
    let level = config.global.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "Unknown log level: {}",
            config.global.log_level
        )));
    }

    if config.global.log_max_files == 0 {
        return Err(ConfigError::ValidationError(
            "log_max_files must be at least 1".to_string(),
        ));
    }

    let backup_dir = expand_tilde(&config.backup.backup_dir);
    if backup_dir.is_file() {
        return Err(ConfigError::ValidationError(format!(
            "Backup directory is a file: {:?}",
            backup_dir
        )));
    }

    Ok(())
}

/// Resolve backup settings (command line > config file > defaults)
pub fn resolve_settings(
    config: &Config,
    backup_dir: Option<&Path>,
    compression: Option<ArchiveFormat>,
    keep_versions: Option<u32>,
) -> BackupSettings {
    let backup_dir = backup_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.backup.backup_dir.clone());

    BackupSettings {
        backup_dir: expand_tilde(&backup_dir),
        compression: compression.unwrap_or(config.backup.compression),
        keep_versions: keep_versions.unwrap_or(config.backup.keep_versions),
    }
}
