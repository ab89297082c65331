//! Archive writers and extractors (zip, tar, tar.gz)

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Seek, Write};
use std::path::{Component, Path};
use std::str::FromStr;
use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Supported snapshot formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArchiveFormat {
    #[default]
    #[serde(rename = "zip")]
    Zip,
    #[serde(rename = "tar")]
    Tar,
    #[serde(rename = "tar.gz", alias = "tgz")]
    TarGz,
}

impl ArchiveFormat {
    /// File extension without the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::Tar => "tar",
            ArchiveFormat::TarGz => "tar.gz",
        }
    }

    /// Split a file name into its stem and archive format.
    pub fn split_extension(file_name: &str) -> Option<(&str, Self)> {
        // tar.gz before tar, otherwise "x.tar.gz" never matches
        [ArchiveFormat::TarGz, ArchiveFormat::Tar, ArchiveFormat::Zip]
            .into_iter()
            .find_map(|format| {
                file_name
                    .strip_suffix(format.extension())
                    .and_then(|stem| stem.strip_suffix('.'))
                    .map(|stem| (stem, format))
            })
    }

    /// Detect the format from a path's file name
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        Self::split_extension(name).map(|(_, format)| format)
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ArchiveFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zip" => Ok(ArchiveFormat::Zip),
            "tar" => Ok(ArchiveFormat::Tar),
            "tar.gz" | "tgz" => Ok(ArchiveFormat::TarGz),
            other => Err(format!(
                "unknown compression '{}' (expected zip, tar or tar.gz)",
                other
            )),
        }
    }
}

/// What to put into an archive
#[derive(Debug, Clone, Copy)]
pub struct ArchiveSource<'a> {
    /// File or directory being archived
    pub path: &'a Path,
    /// Top-level entry name: a directory `proj` is stored as `proj/...`,
    /// a single file is stored under this name itself
    pub root_name: &'a str,
    /// Subtree left out of the archive (the backup directory, when it lives
    /// inside the source)
    pub exclude: Option<&'a Path>,
}

impl<'a> ArchiveSource<'a> {
    pub fn new(path: &'a Path, root_name: &'a str) -> Self {
        Self {
            path,
            root_name,
            exclude: None,
        }
    }

    pub fn excluding(mut self, exclude: Option<&'a Path>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Walk the source in sorted order, yielding each entry with its archive name
    fn entries(&self) -> impl Iterator<Item = io::Result<(walkdir::DirEntry, String)>> + 'a {
        let root = self.path;
        let root_name = self.root_name;
        let exclude = self.exclude;

        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| exclude.map_or(true, |ex| e.path() != ex))
            .map(move |entry| {
                let entry = entry?;
                let relative = entry.path().strip_prefix(root).map_err(io::Error::other)?;
                let name = entry_name(root_name, relative);
                Ok((entry, name))
            })
    }
}

/// Write an archive of `source` into `out`, flushing it to disk
pub fn write_archive(format: ArchiveFormat, source: &ArchiveSource<'_>, out: &mut File) -> io::Result<()> {
    debug!("Writing {} archive of {:?}", format, source.path);

    match format {
        ArchiveFormat::Zip => {
            write_zip(source, &mut *out)?;
        }
        ArchiveFormat::Tar => {
            write_tar(source, &mut *out)?;
        }
        ArchiveFormat::TarGz => {
            let encoder = GzEncoder::new(&mut *out, Compression::default());
            write_tar(source, encoder)?.finish()?;
        }
    }

    out.flush()?;
    out.sync_all()
}

fn write_zip<W: Write + Seek>(source: &ArchiveSource<'_>, out: W) -> io::Result<W> {
    let mut zip = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    if source.path.is_file() {
        zip.start_file(source.root_name, file_options(source.path, options)?)?;
        io::copy(&mut File::open(source.path)?, &mut zip)?;
        return Ok(zip.finish()?);
    }

    for entry in source.entries() {
        let (entry, name) = entry?;

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else if entry.file_type().is_file() {
            zip.start_file(name, file_options(entry.path(), options)?)?;
            io::copy(&mut File::open(entry.path())?, &mut zip)?;
        } else if entry.file_type().is_symlink() {
            // stored as a link, same as tar
            let target = fs::read_link(entry.path())?;
            zip.add_symlink(name, target.to_string_lossy(), options)?;
        } else {
            debug!("Skipping non-regular entry: {:?}", entry.path());
        }
    }

    Ok(zip.finish()?)
}

fn file_options(path: &Path, options: SimpleFileOptions) -> io::Result<SimpleFileOptions> {
    let metadata = fs::metadata(path)?;
    let options = options.large_file(metadata.len() >= u32::MAX as u64);

    #[cfg(unix)]
    let options = {
        use std::os::unix::fs::PermissionsExt;
        options.unix_permissions(metadata.permissions().mode())
    };

    Ok(options)
}

/// Archive entry names always use '/' separators
fn entry_name(root_name: &str, relative: &Path) -> String {
    let mut name = root_name.to_string();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            name.push('/');
            name.push_str(&part.to_string_lossy());
        }
    }
    name
}

fn write_tar<W: Write>(source: &ArchiveSource<'_>, out: W) -> io::Result<W> {
    let mut builder = tar::Builder::new(out);
    builder.follow_symlinks(false);

    if source.path.is_file() {
        builder.append_path_with_name(source.path, source.root_name)?;
        return builder.into_inner();
    }

    for entry in source.entries() {
        let (entry, name) = entry?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            builder.append_dir(&name, entry.path())?;
        } else if file_type.is_file() || file_type.is_symlink() {
            // symlinks are stored as links, not followed
            builder.append_path_with_name(entry.path(), &name)?;
        } else {
            debug!("Skipping special file: {:?}", entry.path());
        }
    }

    builder.into_inner()
}

/// Extract every entry of `archive` into `destination`
pub fn extract_archive(format: ArchiveFormat, archive: &Path, destination: &Path) -> io::Result<()> {
    debug!("Extracting {} archive {:?} into {:?}", format, archive, destination);

    let file = File::open(archive)?;
    match format {
        ArchiveFormat::Zip => {
            let mut zip = ZipArchive::new(file)?;
            zip.extract(destination)?;
        }
        ArchiveFormat::Tar => {
            tar::Archive::new(file).unpack(destination)?;
        }
        ArchiveFormat::TarGz => {
            tar::Archive::new(GzDecoder::new(file)).unpack(destination)?;
        }
    }

    Ok(())
}
