//! Unit tests for configuration loading and validation
//!
//! These tests verify config parsing, defaults, validation and settings resolution.

use autokit_backup::config::{load_config, load_or_default, resolve_settings, ConfigError};
use std::path::Path;
use test_utils::{
    full_config_toml, minimal_config_toml, render_config, ArchiveFormat, Config, ConfigBuilder,
    TestContext,
};

#[test]
fn test_config_loading_valid() {
    let (config, config_path, _temp_dir) = ConfigBuilder::new().with_keep_versions(7).persist();

    let loaded = load_config(&config_path);
    assert!(loaded.is_ok(), "Config should load successfully: {:?}", loaded.err());

    let loaded = loaded.unwrap();
    assert_eq!(loaded.backup.keep_versions, 7);
    assert_eq!(loaded.backup.backup_dir, config.backup.backup_dir);
}

#[test]
fn test_minimal_config_uses_defaults() {
    let ctx = TestContext::new();
    let content = render_config(minimal_config_toml(), &ctx.backup_dir(), ctx.temp_dir());
    let path = ctx.create_file("config.toml", &content);

    let config = load_config(&path).unwrap();

    assert_eq!(config.backup.backup_dir, ctx.backup_dir());
    assert_eq!(config.backup.compression, ArchiveFormat::Zip);
    assert_eq!(config.backup.keep_versions, 5);
    assert_eq!(config.global.log_level, "info");
    assert_eq!(config.global.log_max_files, 10);
}

#[test]
fn test_full_config() {
    let ctx = TestContext::new();
    let log_dir = ctx.temp_dir().join("logs");
    let content = render_config(full_config_toml(), &ctx.backup_dir(), &log_dir);
    let path = ctx.create_file("config.toml", &content);

    let config = load_config(&path).unwrap();

    assert_eq!(config.global.log_directory, log_dir);
    assert_eq!(config.global.log_level, "debug");
    assert_eq!(config.global.log_max_files, 3);
    assert_eq!(config.backup.compression, ArchiveFormat::TarGz);
    assert_eq!(config.backup.keep_versions, 2);
}

#[test]
fn test_empty_file_is_all_defaults() {
    let ctx = TestContext::new();
    let path = ctx.create_file("config.toml", "");

    let config = load_config(&path).unwrap();
    let defaults = Config::default();

    assert_eq!(config.backup.backup_dir, defaults.backup.backup_dir);
    assert_eq!(config.backup.keep_versions, defaults.backup.keep_versions);
}

#[test]
fn test_tgz_alias_in_config() {
    let ctx = TestContext::new();
    let path = ctx.create_file("config.toml", "[backup]\ncompression = \"tgz\"\n");

    let config = load_config(&path).unwrap();
    assert_eq!(config.backup.compression, ArchiveFormat::TarGz);
}

#[test]
fn test_unknown_compression_rejected() {
    let ctx = TestContext::new();
    let path = ctx.create_file("config.toml", "[backup]\ncompression = \"rar\"\n");

    assert!(matches!(load_config(&path), Err(ConfigError::ParseError(_))));
}

#[test]
fn test_invalid_toml_rejected() {
    let ctx = TestContext::new();
    let path = ctx.create_file("config.toml", "[backup\nkeep_versions = ");

    assert!(matches!(load_config(&path), Err(ConfigError::ParseError(_))));
}

#[test]
fn test_unknown_log_level_rejected() {
    let ctx = TestContext::new();
    let path = ctx.create_file("config.toml", "[global]\nlog_level = \"chatty\"\n");

    let result = load_config(&path);
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_zero_log_files_rejected() {
    let ctx = TestContext::new();
    let path = ctx.create_file("config.toml", "[global]\nlog_max_files = 0\n");

    assert!(matches!(load_config(&path), Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_backup_dir_pointing_at_file_rejected() {
    let ctx = TestContext::new();
    let file = ctx.create_file("not-a-dir", "x");
    let content = render_config(minimal_config_toml(), &file, ctx.temp_dir());
    let path = ctx.create_file("config.toml", &content);

    assert!(matches!(load_config(&path), Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_missing_default_config_falls_back() {
    let ctx = TestContext::new();
    let missing = ctx.temp_dir().join("absent.toml");

    let config = load_or_default(&missing, false).unwrap();
    assert_eq!(config.backup.keep_versions, Config::default().backup.keep_versions);
}

#[test]
fn test_missing_explicit_config_is_error() {
    let ctx = TestContext::new();
    let missing = ctx.temp_dir().join("absent.toml");

    assert!(matches!(
        load_or_default(&missing, true),
        Err(ConfigError::ReadError(_))
    ));
}

#[test]
fn test_resolve_settings_precedence() {
    let config = ConfigBuilder::new()
        .with_compression(ArchiveFormat::Tar)
        .with_keep_versions(4)
        .build();

    let from_file = resolve_settings(&config, None, None, None);
    assert_eq!(from_file.compression, ArchiveFormat::Tar);
    assert_eq!(from_file.keep_versions, 4);
    assert_eq!(from_file.backup_dir, config.backup.backup_dir);

    let flags = resolve_settings(
        &config,
        Some(Path::new("/srv/backups")),
        Some(ArchiveFormat::TarGz),
        Some(0),
    );
    assert_eq!(flags.backup_dir, Path::new("/srv/backups"));
    assert_eq!(flags.compression, ArchiveFormat::TarGz);
    assert_eq!(flags.keep_versions, 0);
}
