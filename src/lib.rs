//! Autokit Backup Library
//!
//! Timestamped directory snapshots (zip, tar, tar.gz) with keep-last-N retention.

pub mod config;
pub mod managers;
pub mod utils;

// Re-export commonly used types
pub use config::{load_config, resolve_settings, BackupSettings, Config};
pub use managers::backup::{BackupError, BackupManager, CreateReport};
pub use managers::logging::{init_console_logging, init_logging, LogGuard, LoggingConfig};
pub use utils::archive::ArchiveFormat;
pub use utils::snapshot::Snapshot;
