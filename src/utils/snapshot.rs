//! Snapshot file naming: `{base_name}_{YYYYMMDD}_{HHMMSS}.{ext}`
//!
//! The file name is the only metadata a snapshot carries, so listing and
//! retention both depend on `snapshot_file_name` and `parse_snapshot_name`
//! staying inverse to each other.

use super::archive::ArchiveFormat;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A snapshot archive found in the backup directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub base_name: String,
    pub created_at: NaiveDateTime,
    pub format: ArchiveFormat,
    pub archive_path: PathBuf,
    pub size_bytes: u64,
}

impl Snapshot {
    /// File name of the archive
    pub fn file_name(&self) -> String {
        self.archive_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Build a snapshot from an on-disk archive, if its name follows the convention
    pub fn from_path(path: &Path, size_bytes: u64) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let parsed = parse_snapshot_name(name)?;
        Some(Self {
            base_name: parsed.base_name,
            created_at: parsed.created_at,
            format: parsed.format,
            archive_path: path.to_path_buf(),
            size_bytes,
        })
    }
}

/// Components recovered from a snapshot file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotName {
    pub base_name: String,
    pub created_at: NaiveDateTime,
    pub format: ArchiveFormat,
}

/// Build the archive file name for a snapshot
pub fn snapshot_file_name(base_name: &str, created_at: NaiveDateTime, format: ArchiveFormat) -> String {
    format!(
        "{}_{}.{}",
        base_name,
        created_at.format(TIMESTAMP_FORMAT),
        format.extension()
    )
}

/// Parse a file name produced by `snapshot_file_name`
pub fn parse_snapshot_name(file_name: &str) -> Option<SnapshotName> {
    let (stem, format) = ArchiveFormat::split_extension(file_name)?;

    let mut parts = stem.rsplitn(3, '_');
    let time = parts.next()?;
    let date = parts.next()?;
    let base_name = parts.next()?;

    if base_name.is_empty() || date.len() != 8 || time.len() != 6 {
        return None;
    }

    let created_at =
        NaiveDateTime::parse_from_str(&format!("{}_{}", date, time), TIMESTAMP_FORMAT).ok()?;

    Some(SnapshotName {
        base_name: base_name.to_string(),
        created_at,
        format,
    })
}

/// Sort newest first; equal timestamps fall back to file name so the order is stable
pub fn sort_newest_first(snapshots: &mut [Snapshot]) {
    snapshots.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.archive_path.cmp(&a.archive_path))
    });
}

/// A usable base name: non-empty, not `.`/`..`, no path separators.
/// Hidden names such as `.config` are fine.
pub fn is_valid_base_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().map(|n| n == name).unwrap_or(false)
}
