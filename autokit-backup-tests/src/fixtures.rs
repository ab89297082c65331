//! Test fixtures and sample data
//!
//! Provides pre-built test data and templates for testing.

use autokit_backup::utils::archive::ArchiveFormat;
use autokit_backup::utils::snapshot::Snapshot;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};

/// Files written by `TestContext::create_source_tree`, relative to the tree root
pub const SAMPLE_FILES: &[(&str, &[u8])] = &[
    ("README.md", b"# sample project\n"),
    ("src/main.rs", b"fn main() {\n    println!(\"hi\");\n}\n"),
    ("src/util/mod.rs", b"pub mod strings;\n"),
    ("src/util/strings.rs", b"pub fn shout(s: &str) -> String { s.to_uppercase() }\n"),
    ("assets/logo.bin", &[0x89, 0x50, 0x4e, 0x47, 0x00, 0xff, 0x10]),
    ("notes with spaces.txt", b"file names may contain spaces\n"),
];

/// A timestamp on 2025-01-01
pub fn timestamp(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .expect("valid timestamp")
}

/// Create a sample snapshot for testing
pub fn sample_snapshot() -> Snapshot {
    Snapshot {
        base_name: "proj".to_string(),
        created_at: timestamp(10, 30, 0),
        format: ArchiveFormat::Zip,
        archive_path: PathBuf::from("/backups/proj_20250101_103000.zip"),
        size_bytes: 2048,
    }
}

/// Create multiple sample snapshots one minute apart, oldest first
pub fn sample_snapshots(count: usize) -> Vec<Snapshot> {
    (0..count)
        .map(|i| {
            let created_at = timestamp(10, i as u32 % 60, 0);
            Snapshot {
                base_name: "proj".to_string(),
                created_at,
                format: ArchiveFormat::Zip,
                archive_path: PathBuf::from(format!(
                    "/backups/proj_{}.zip",
                    created_at.format("%Y%m%d_%H%M%S")
                )),
                size_bytes: 1024,
            }
        })
        .collect()
}

/// Minimal valid config TOML template
pub fn minimal_config_toml() -> &'static str {
    r#"
[backup]
backup_dir = "{backup_dir}"
"#
}

/// Config with every setting spelled out
pub fn full_config_toml() -> &'static str {
    r#"
[global]
log_directory = "{log_dir}"
log_level = "debug"
log_max_files = 3

[backup]
backup_dir = "{backup_dir}"
compression = "tar.gz"
keep_versions = 2
"#
}

/// Fill the `{backup_dir}` / `{log_dir}` placeholders of a template
pub fn render_config(template: &str, backup_dir: &Path, log_dir: &Path) -> String {
    // TOML basic strings need forward slashes on Windows
    let to_toml = |p: &Path| p.to_string_lossy().replace('\\', "/");
    template
        .replace("{backup_dir}", &to_toml(backup_dir))
        .replace("{log_dir}", &to_toml(log_dir))
}

/// Relative path -> content for every regular file under `root`
pub fn read_tree(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<(PathBuf, Vec<u8>)>) {
        for entry in fs::read_dir(dir).expect("Failed to read directory") {
            let path = entry.expect("Failed to read entry").path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let relative = path.strip_prefix(root).expect("path under root").to_path_buf();
                out.push((relative, fs::read(&path).expect("Failed to read file")));
            }
        }
    }

    let mut files = Vec::new();
    walk(root, root, &mut files);
    files.sort();
    files
}

/// Assert two directory trees hold the same files with the same bytes
pub fn assert_same_tree(expected: &Path, actual: &Path) {
    let expected_files = read_tree(expected);
    let actual_files = read_tree(actual);
    assert_eq!(
        expected_files.iter().map(|(p, _)| p).collect::<Vec<_>>(),
        actual_files.iter().map(|(p, _)| p).collect::<Vec<_>>(),
        "file sets differ"
    );
    assert_eq!(expected_files, actual_files, "file contents differ");
}
