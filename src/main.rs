use anyhow::{Context, Result};
use autokit_backup::config::{self, Config};
use autokit_backup::managers::logging::{self, LoggingConfig};
use autokit_backup::utils::format::format_bytes;
use autokit_backup::{ArchiveFormat, BackupManager};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(name = "autokit-backup")]
#[command(about = "Timestamped backups with keep-last-N retention", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file (defaults to <config dir>/autokit/backup.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the backups (overrides the config file)
    #[arg(long)]
    backup_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a backup of a directory
    Create {
        /// Directory (or file) to back up
        source: PathBuf,

        /// Archive format: zip, tar or tar.gz
        #[arg(long)]
        compression: Option<ArchiveFormat>,

        /// Custom backup name (defaults to the source's name)
        #[arg(short, long)]
        name: Option<String>,

        /// Number of backups to keep for this name (0 = unlimited)
        #[arg(short, long)]
        keep: Option<u32>,
    },

    /// List backups, newest first
    List {
        /// Only show backups whose name starts with this prefix
        #[arg(short, long)]
        filter: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Restore a backup into a directory
    Restore {
        /// Backup file (path, or file name inside the backup directory)
        archive: PathBuf,

        /// Directory to extract into (created if missing)
        destination: PathBuf,

        /// Extract even if the destination is not empty
        #[arg(long)]
        overwrite: bool,
    },

    /// Delete a backup
    Delete {
        /// Backup file (path, or file name inside the backup directory)
        archive: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config_path, explicit) = match cli.config {
        Some(ref path) => (path.clone(), true),
        None => (config::default_config_path(), false),
    };

    // Validate reports config problems itself - use simple console logging
    if let Commands::Validate = cli.command {
        logging::init_console_logging();
        return handle_validate(&config_path, explicit, cli.backup_dir.as_deref());
    }

    let config = config::load_or_default(&config_path, explicit)
        .with_context(|| format!("Failed to load config: {:?}", config_path))?;

    // Setup logging with file rotation (must keep guard alive)
    let logging_config = LoggingConfig::from_config(&config.global);
    let _log_guard = logging::init_logging(&logging_config)?;

    let backup_dir = cli.backup_dir.as_deref();

    match cli.command {
        Commands::Create {
            source,
            compression,
            name,
            keep,
        } => {
            let settings = config::resolve_settings(&config, backup_dir, compression, keep);
            let manager = BackupManager::new(settings);

            let report = manager.create(
                &source,
                manager.settings().compression,
                manager.settings().keep_versions,
                name.as_deref(),
            )?;

            if !report.cleanup_errors.is_empty() {
                warn!(
                    "Backup created, but {} old backup(s) could not be removed",
                    report.cleanup_errors.len()
                );
            }

            println!("{}", report.snapshot.archive_path.display());
        }

        Commands::List { filter, json } => {
            let manager = BackupManager::new(config::resolve_settings(&config, backup_dir, None, None));
            let snapshots = manager.list(filter.as_deref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshots)?);
            } else {
                for snapshot in &snapshots {
                    println!(
                        "{} - {} - {}",
                        snapshot.file_name(),
                        format_bytes(snapshot.size_bytes),
                        snapshot.created_at.format("%Y-%m-%dT%H:%M:%S")
                    );
                }
            }
        }

        Commands::Restore {
            archive,
            destination,
            overwrite,
        } => {
            let manager = BackupManager::new(config::resolve_settings(&config, backup_dir, None, None));
            let archive = manager.resolve_archive(&archive);

            manager.restore(&archive, &destination, overwrite)?;
            println!("✓ Restored {} to {}", archive.display(), destination.display());
        }

        Commands::Delete { archive } => {
            let manager = BackupManager::new(config::resolve_settings(&config, backup_dir, None, None));
            let archive = manager.resolve_archive(&archive);

            manager.delete(&archive)?;
            println!("✓ Deleted {}", archive.display());
        }

        Commands::Validate => unreachable!("handled before logging setup"),
    }

    Ok(())
}

fn handle_validate(config_path: &Path, explicit: bool, backup_dir: Option<&Path>) -> Result<()> {
    let source = if explicit || config_path.exists() {
        config_path.display().to_string()
    } else {
        "built-in defaults".to_string()
    };
    println!("Validating configuration: {}\n", source);

    let config: Config = config::load_or_default(config_path, explicit)
        .with_context(|| format!("Invalid configuration: {:?}", config_path))?;
    let settings = config::resolve_settings(&config, backup_dir, None, None);

    println!("Backup directory: {}", settings.backup_dir.display());
    println!("Compression: {}", settings.compression);
    if settings.keep_versions == 0 {
        println!("Keep versions: unlimited");
    } else {
        println!("Keep versions: {}", settings.keep_versions);
    }
    println!(
        "Log directory: {}",
        config::expand_tilde(&config.global.log_directory).display()
    );
    println!("Log level: {}", config.global.log_level);
    println!("\n✓ Configuration is valid");

    Ok(())
}
