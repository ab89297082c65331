//! Configuration module for autokit-backup
//!
//! This module handles loading, validating, and resolving configuration from TOML files.
//!
//! ## Settings Resolution
//!
//! Settings are applied in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Config file (`[global]` and `[backup]` tables)
//! 3. Command-line flags
//!
//! ## Example Usage
//!
//! ```no_run
//! use autokit_backup::config;
//!
//! let config = config::load_config("backup.toml")?;
//! let settings = config::resolve_settings(&config, None, None, None);
//!
//! println!("Backups go to {:?}, keeping {}", settings.backup_dir, settings.keep_versions);
//! # Ok::<(), config::ConfigError>(())
//! ```

mod loader;
mod types;

pub use loader::{
    default_config_path, load_config, load_or_default, resolve_settings, ConfigError, Result,
};
pub use types::*;

/// Expand tilde (~) in path
pub fn expand_tilde(path: &std::path::Path) -> std::path::PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
