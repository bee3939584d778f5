//! Archive extraction (zip, tar.gz, gz).

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use flate2::read::GzDecoder;

use crate::error::BackendError;

/// Supported archive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    Zip,
    TarGz,
    /// A single gzip-compressed file, not a tarball.
    Gz,
}

impl ArchiveType {
    /// Detect archive type from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let path_str = path.to_string_lossy().to_lowercase();

        if path_str.ends_with(".zip") {
            Some(ArchiveType::Zip)
        } else if path_str.ends_with(".tar.gz") || path_str.ends_with(".tgz") {
            Some(ArchiveType::TarGz)
        } else if path_str.ends_with(".gz") {
            Some(ArchiveType::Gz)
        } else {
            None
        }
    }

    /// File extension used for the temporary download artifact
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveType::Zip => "zip",
            ArchiveType::TarGz => "tar.gz",
            ArchiveType::Gz => "gz",
        }
    }

    /// Whether the destination of this archive type is a directory tree.
    pub fn extracts_to_directory(&self) -> bool {
        !matches!(self, ArchiveType::Gz)
    }
}

impl FromStr for ArchiveType {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zip" => Ok(ArchiveType::Zip),
            "tar.gz" | "tgz" => Ok(ArchiveType::TarGz),
            "gz" => Ok(ArchiveType::Gz),
            _ => Err(BackendError::UnsupportedArchiveType(s.to_string())),
        }
    }
}

impl fmt::Display for ArchiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Archive extractor
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Decode `archive_path` into `dest`.
    ///
    /// For `Zip` and `TarGz`, `dest` is a directory and every member is
    /// written below it at its relative path inside the archive. For `Gz`,
    /// `dest` is the output file.
    pub fn extract(
        archive_path: &Path,
        dest: &Path,
        archive_type: ArchiveType,
    ) -> Result<(), BackendError> {
        match archive_type {
            ArchiveType::Zip => Self::extract_zip(archive_path, dest),
            ArchiveType::TarGz => Self::extract_tar_gz(archive_path, dest),
            ArchiveType::Gz => Self::extract_gz(archive_path, dest),
        }
    }

    /// Extract a zip archive
    fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<(), BackendError> {
        std::fs::create_dir_all(dest_dir)?;

        let file = File::open(archive_path)?;
        let reader = BufReader::new(file);
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|e| extraction_failed(archive_path, format!("Failed to open zip: {}", e)))?;

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| {
                extraction_failed(archive_path, format!("Failed to read zip entry: {}", e))
            })?;

            // Rejects absolute paths and `..` components
            let Some(relative_path) = entry.enclosed_name() else {
                return Err(extraction_failed(
                    archive_path,
                    format!("Path traversal detected in archive: {}", entry.name()),
                ));
            };
            let outpath = dest_dir.join(relative_path);

            if entry.is_dir() {
                std::fs::create_dir_all(&outpath)?;
                continue;
            }

            if let Some(parent) = outpath.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&outpath)?;
            std::io::copy(&mut entry, &mut outfile)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
                }
            }
        }

        log::debug!("Extracted {} zip entries into {}", archive.len(), dest_dir.display());
        Ok(())
    }

    /// Extract a gzipped tar archive
    fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<(), BackendError> {
        std::fs::create_dir_all(dest_dir)?;

        let file = File::open(archive_path)?;
        let decoder = GzDecoder::new(BufReader::new(file));
        Self::extract_tar_reader(decoder, archive_path, dest_dir)
    }

    /// Extract from a tar reader, keeping every member's relative path
    fn extract_tar_reader<R: Read>(
        reader: R,
        archive_path: &Path,
        dest_dir: &Path,
    ) -> Result<(), BackendError> {
        let mut archive = tar::Archive::new(reader);
        let mut count = 0usize;

        let entries = archive
            .entries()
            .map_err(|e| extraction_failed(archive_path, format!("Failed to read tar: {}", e)))?;

        for entry in entries {
            let mut entry = entry.map_err(|e| {
                extraction_failed(archive_path, format!("Failed to read tar entry: {}", e))
            })?;

            // unpack_in refuses entries that would land outside dest_dir
            let unpacked = entry.unpack_in(dest_dir).map_err(|e| {
                extraction_failed(archive_path, format!("Failed to extract: {}", e))
            })?;
            if !unpacked {
                let name = entry
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                return Err(extraction_failed(
                    archive_path,
                    format!("Path traversal detected in archive: {}", name),
                ));
            }
            count += 1;
        }

        log::debug!("Extracted {} tar entries into {}", count, dest_dir.display());
        Ok(())
    }

    /// Decompress a single gzip stream into `dest_file`
    fn extract_gz(archive_path: &Path, dest_file: &Path) -> Result<(), BackendError> {
        if let Some(parent) = dest_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::open(archive_path)?;
        let mut decoder = GzDecoder::new(BufReader::new(file));
        let mut outfile = File::create(dest_file)?;
        let written = std::io::copy(&mut decoder, &mut outfile).map_err(|e| {
            extraction_failed(archive_path, format!("Failed to decompress: {}", e))
        })?;

        log::debug!("Decompressed {} bytes into {}", written, dest_file.display());
        Ok(())
    }
}

fn extraction_failed(path: &Path, reason: String) -> BackendError {
    BackendError::Extraction {
        path: path.to_path_buf(),
        reason,
    }
}
