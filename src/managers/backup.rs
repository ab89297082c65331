//! Backup manager - creates, lists, restores and deletes snapshots
//!
//! The backup directory is the only persisted state: every snapshot is one
//! archive named `{base_name}_{YYYYMMDD}_{HHMMSS}.{ext}`, and retention is
//! enforced per base name right after each successful create.

use crate::config::BackupSettings;
use crate::utils::archive::{self, ArchiveFormat, ArchiveSource};
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::format::format_bytes;
use crate::utils::locker;
use crate::utils::snapshot::{self, Snapshot};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("Source not found: {0:?}")]
    SourceNotFound(PathBuf),

    #[error("Failed to write archive {path:?}: {source}")]
    ArchiveWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove old backup {path:?}: {source}")]
    RetentionCleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Destination is not empty: {0:?} (use --overwrite to restore into it)")]
    DestinationExists(PathBuf),

    #[error("Unsupported archive format: {0:?}")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to extract {path:?}: {reason}")]
    CorruptArchive { path: PathBuf, reason: String },

    #[error("Archive not found: {0:?}")]
    ArchiveNotFound(PathBuf),

    #[error("Invalid backup name: '{0}'")]
    InvalidName(String),

    #[error("Backup directory {path:?} is unusable: {source}")]
    BackupDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BackupError>;

/// Outcome of a successful create
#[derive(Debug)]
pub struct CreateReport {
    /// The snapshot just written
    pub snapshot: Snapshot,
    /// Older snapshots removed by the retention sweep
    pub pruned: Vec<PathBuf>,
    /// Retention failures; the new snapshot is kept regardless
    pub cleanup_errors: Vec<BackupError>,
}

pub struct BackupManager {
    settings: BackupSettings,
    clock: Box<dyn Clock>,
}

impl BackupManager {
    /// Create new backup manager
    ///
    /// Nothing touches the disk until the first `create`, which makes the
    /// backup directory if it is missing.
    pub fn new(settings: BackupSettings) -> Self {
        Self::with_clock(settings, Box::new(SystemClock))
    }

    /// Create backup manager with a specific time source
    pub fn with_clock(settings: BackupSettings, clock: Box<dyn Clock>) -> Self {
        Self { settings, clock }
    }

    pub fn settings(&self) -> &BackupSettings {
        &self.settings
    }

    pub fn backup_dir(&self) -> &Path {
        &self.settings.backup_dir
    }

    /// Create a snapshot using the configured compression and retention
    pub fn create_default(&self, source: &Path) -> Result<CreateReport> {
        self.create(
            source,
            self.settings.compression,
            self.settings.keep_versions,
            None,
        )
    }

    /// Archive `source` and prune its family down to `keep_versions` (0 keeps all)
    pub fn create(
        &self,
        source: &Path,
        format: ArchiveFormat,
        keep_versions: u32,
        name_override: Option<&str>,
    ) -> Result<CreateReport> {
        let source = source
            .canonicalize()
            .map_err(|_| BackupError::SourceNotFound(source.to_path_buf()))?;

        let source_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());

        let base_name = match (name_override, source_name.as_deref()) {
            (Some(name), _) => name.to_string(),
            (None, Some(name)) => name.to_string(),
            (None, None) => return Err(BackupError::InvalidName(source.display().to_string())),
        };
        if !snapshot::is_valid_base_name(&base_name) {
            return Err(BackupError::InvalidName(base_name));
        }
        let root_name = source_name.unwrap_or_else(|| base_name.clone());

        info!("Starting {} backup of {:?} as '{}'", format, source, base_name);
        let start_time = Instant::now();

        fs::create_dir_all(&self.settings.backup_dir).map_err(|e| BackupError::BackupDir {
            path: self.settings.backup_dir.clone(),
            source: e,
        })?;

        let created_at = self.clock.now();
        let file_name = snapshot::snapshot_file_name(&base_name, created_at, format);
        let archive_path = self.settings.backup_dir.join(&file_name);

        self.write_snapshot(&source, &root_name, format, &archive_path)?;

        let size_bytes = fs::metadata(&archive_path).map(|m| m.len()).unwrap_or(0);
        info!(
            "Backup created: {} ({}) in {:.2}s",
            file_name,
            format_bytes(size_bytes),
            start_time.elapsed().as_secs_f64()
        );

        let snapshot = Snapshot {
            base_name: base_name.clone(),
            created_at,
            format,
            archive_path: archive_path.clone(),
            size_bytes,
        };

        let (pruned, cleanup_errors) = if keep_versions > 0 {
            self.apply_retention(&base_name, keep_versions, &archive_path)
        } else {
            debug!("keep_versions = 0, retention disabled");
            (Vec::new(), Vec::new())
        };

        Ok(CreateReport {
            snapshot,
            pruned,
            cleanup_errors,
        })
    }

    /// Write the archive to a hidden temp file, then move it into place.
    ///
    /// The final name is never overwritten; on any failure the temp file is removed.
    fn write_snapshot(
        &self,
        source: &Path,
        root_name: &str,
        format: ArchiveFormat,
        archive_path: &Path,
    ) -> Result<()> {
        let write_error = |source: io::Error| BackupError::ArchiveWrite {
            path: archive_path.to_path_buf(),
            source,
        };

        if archive_path.exists() {
            return Err(write_error(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "a snapshot with this name already exists",
            )));
        }

        let backup_dir = &self.settings.backup_dir;
        let mut temp = tempfile::Builder::new()
            .prefix(".autokit-")
            .suffix(".partial")
            .tempfile_in(backup_dir)
            .map_err(write_error)?;

        // don't archive the backup directory into itself
        let backup_dir = backup_dir.canonicalize().ok();
        let exclude = backup_dir.as_deref().filter(|dir| dir.starts_with(source));
        let archive_source = ArchiveSource::new(source, root_name).excluding(exclude);

        if let Err(e) = archive::write_archive(format, &archive_source, temp.as_file_mut()) {
            error!("Failed to write archive {:?}: {}", archive_path, e);
            return Err(write_error(e));
        }

        temp.persist_noclobber(archive_path)
            .map_err(|e| write_error(e.error))?;

        Ok(())
    }

    /// Delete the oldest snapshots of `base_name` so at most `keep_versions` remain.
    ///
    /// `keep` is the snapshot just created; it always survives and counts
    /// towards the limit.
    fn apply_retention(
        &self,
        base_name: &str,
        keep_versions: u32,
        keep: &Path,
    ) -> (Vec<PathBuf>, Vec<BackupError>) {
        let backup_dir = &self.settings.backup_dir;
        let locked = locker::with_family_lock(backup_dir, base_name, || {
            self.prune_family(base_name, keep_versions, keep)
        });

        match locked {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Pruning '{}' without lock: {:#}", base_name, e);
                self.prune_family(base_name, keep_versions, keep)
            }
        }
    }

    fn prune_family(
        &self,
        base_name: &str,
        keep_versions: u32,
        keep: &Path,
    ) -> (Vec<PathBuf>, Vec<BackupError>) {
        let mut family: Vec<Snapshot> = match self.scan() {
            Ok(snapshots) => snapshots
                .into_iter()
                .filter(|s| s.base_name == base_name && s.archive_path != keep)
                .collect(),
            Err(e) => {
                warn!("Skipping retention for '{}': {}", base_name, e);
                return (Vec::new(), vec![e]);
            }
        };
        snapshot::sort_newest_first(&mut family);

        let mut pruned = Vec::new();
        let mut errors = Vec::new();

        for old in family.into_iter().skip(keep_versions as usize - 1) {
            match fs::remove_file(&old.archive_path) {
                Ok(()) => {
                    info!("Removed old backup: {}", old.file_name());
                    pruned.push(old.archive_path);
                }
                Err(source) => {
                    let err = BackupError::RetentionCleanup {
                        path: old.archive_path,
                        source,
                    };
                    warn!("{}", err);
                    errors.push(err);
                }
            }
        }

        (pruned, errors)
    }

    /// Snapshots in the backup directory, unordered
    fn scan(&self) -> Result<Vec<Snapshot>> {
        let backup_dir = &self.settings.backup_dir;
        let entries = match fs::read_dir(backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(BackupError::BackupDir {
                    path: backup_dir.clone(),
                    source,
                })
            }
        };

        let snapshots = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let metadata = entry.metadata().ok()?;
                if !metadata.is_file() {
                    return None;
                }
                Snapshot::from_path(&entry.path(), metadata.len())
            })
            .collect();

        Ok(snapshots)
    }

    /// List snapshots newest first, optionally only those whose base name starts with `filter_prefix`
    pub fn list(&self, filter_prefix: Option<&str>) -> Result<Vec<Snapshot>> {
        let mut snapshots: Vec<Snapshot> = self
            .scan()?
            .into_iter()
            .filter(|s| filter_prefix.map_or(true, |p| s.base_name.starts_with(p)))
            .collect();

        snapshot::sort_newest_first(&mut snapshots);
        Ok(snapshots)
    }

    /// Extract `archive` into `destination`, creating it if absent
    pub fn restore(&self, archive: &Path, destination: &Path, overwrite: bool) -> Result<()> {
        if !archive.is_file() {
            return Err(BackupError::ArchiveNotFound(archive.to_path_buf()));
        }

        let format = ArchiveFormat::from_path(archive)
            .ok_or_else(|| BackupError::UnsupportedFormat(archive.to_path_buf()))?;

        if destination.exists() && !overwrite && !is_empty_dir(destination)? {
            return Err(BackupError::DestinationExists(destination.to_path_buf()));
        }

        fs::create_dir_all(destination).map_err(|source| BackupError::Io {
            path: destination.to_path_buf(),
            source,
        })?;

        info!("Restoring {:?} to {:?}", archive, destination);

        archive::extract_archive(format, archive, destination).map_err(|e| {
            error!("Restore of {:?} failed: {}", archive, e);
            BackupError::CorruptArchive {
                path: archive.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        info!("Restored backup to {:?}", destination);
        Ok(())
    }

    /// Remove a single archive
    pub fn delete(&self, archive: &Path) -> Result<()> {
        if !archive.is_file() {
            return Err(BackupError::ArchiveNotFound(archive.to_path_buf()));
        }

        fs::remove_file(archive).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => BackupError::ArchiveNotFound(archive.to_path_buf()),
            _ => BackupError::Io {
                path: archive.to_path_buf(),
                source,
            },
        })?;

        info!("Deleted backup: {:?}", archive);
        Ok(())
    }

    /// Resolve a user-supplied archive reference.
    ///
    /// Existing paths are used as given; a bare file name that doesn't exist
    /// in the working directory is looked up in the backup directory.
    pub fn resolve_archive(&self, archive: &Path) -> PathBuf {
        let is_bare_name = archive
            .parent()
            .map_or(true, |parent| parent.as_os_str().is_empty());

        if !archive.exists() && is_bare_name {
            return self.settings.backup_dir.join(archive);
        }
        archive.to_path_buf()
    }
}

/// Whether `path` is a directory with no entries (a file counts as non-empty)
fn is_empty_dir(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }

    let mut entries = fs::read_dir(path).map_err(|source| BackupError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(entries.next().is_none())
}
