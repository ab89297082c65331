//! File-based locking so overlapping runs don't prune the same family at once

use anyhow::{Context, Result};
use fd_lock::RwLock;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path of the lock file guarding one snapshot family
pub fn family_lock_path(backup_dir: &Path, base_name: &str) -> PathBuf {
    backup_dir.join(format!(".{}.lock", base_name))
}

/// Run `f` while holding the exclusive lock for `base_name`.
///
/// Blocks until any other process holding the same lock releases it.
/// The lock file stays on disk; it is hidden and never parsed as a snapshot.
pub fn with_family_lock<T>(backup_dir: &Path, base_name: &str, f: impl FnOnce() -> T) -> Result<T> {
    let lock_path = family_lock_path(backup_dir, base_name);

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .with_context(|| format!("Failed to open lock file: {:?}", lock_path))?;

    let mut lock = RwLock::new(file);
    debug!("Waiting for lock: {:?}", lock_path);
    let _guard = lock
        .write()
        .with_context(|| format!("Failed to acquire lock: {:?}", lock_path))?;
    debug!("Acquired lock: {:?}", lock_path);

    Ok(f())
}
