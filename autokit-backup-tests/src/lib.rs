//! Test utilities for autokit-backup
//!
//! This crate provides shared test utilities, fixtures and helper
//! functions for testing the backup manager.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use test_utils::{ConfigBuilder, TestContext};
//!
//! #[test]
//! fn my_test() {
//!     let ctx = TestContext::new();
//!     let source = ctx.create_source_tree("proj");
//!     let manager = ctx.manager();
//!     manager.create_default(&source).unwrap();
//! }
//! ```

pub mod config_builder;
pub mod fixtures;
pub mod test_context;

// Re-export commonly used items
pub use config_builder::ConfigBuilder;
pub use fixtures::*;
pub use test_context::{OptionAssertions, ResultAssertions, TestContext};

// Re-export types from the main crate for convenience
pub use autokit_backup::config::{BackupConfig, BackupSettings, Config, GlobalConfig};
pub use autokit_backup::managers::backup::{BackupError, BackupManager, CreateReport};
pub use autokit_backup::utils::archive::ArchiveFormat;
pub use autokit_backup::utils::clock::mock::MockClock;
pub use autokit_backup::utils::clock::Clock;
pub use autokit_backup::utils::snapshot::Snapshot;

/// Common test result type
pub type TestResult<T = ()> = anyhow::Result<T>;
