//! Sources installed by downloading and unpacking a release archive.

use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use crate::downloader::{ArchiveExtractor, ArchiveType, Download};
use crate::error::BackendError;
use crate::finalize::FinalizeHook;

/// Where an archive comes from and where it ends up.
pub struct ArchiveSpec {
    pub url: String,
    pub archive_type: ArchiveType,
    /// A directory for `Zip`/`TarGz`, the output file for `Gz`
    pub destination: PathBuf,
    pub finalize: Option<FinalizeHook>,
}

impl ArchiveSpec {
    pub fn new(url: impl Into<String>, archive_type: ArchiveType, destination: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            archive_type,
            destination: destination.into(),
            finalize: None,
        }
    }

    pub fn with_finalize(mut self, hook: FinalizeHook) -> Self {
        self.finalize = Some(hook);
        self
    }
}

impl fmt::Debug for ArchiveSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveSpec")
            .field("url", &self.url)
            .field("archive_type", &self.archive_type)
            .field("destination", &self.destination)
            .field("finalize", &self.finalize.is_some())
            .finish()
    }
}

/// Download + extract + finalize backend.
pub struct ArchiveSource {
    name: String,
    spec: ArchiveSpec,
    downloader: Arc<dyn Download>,
    temp_dir: PathBuf,
}

impl ArchiveSource {
    /// `temp_dir` holds the download artifact while it is being extracted.
    pub fn new(
        name: impl Into<String>,
        spec: ArchiveSpec,
        downloader: Arc<dyn Download>,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            spec,
            downloader,
            temp_dir: temp_dir.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &ArchiveSpec {
        &self.spec
    }

    /// The destination exists. Its contents are not verified.
    pub fn installed(&self) -> bool {
        self.spec.destination.exists()
    }

    /// Fixed artifact path for this archive type.
    ///
    /// Every archive source of the same type shares it, so two installs
    /// must never run at the same time.
    pub fn temp_artifact(&self) -> PathBuf {
        self.temp_dir
            .join(format!("lspinstall-download.{}", self.spec.archive_type.extension()))
    }

    pub fn install(&self) -> Result<(), BackendError> {
        let dest = &self.spec.destination;
        self.reconcile_destination()?;

        let artifact = self.temp_artifact();
        self.downloader.download(&self.spec.url, &artifact)?;

        // On failure past this point the artifact stays on disk
        ArchiveExtractor::extract(&artifact, dest, self.spec.archive_type)?;

        if artifact.exists() {
            std::fs::remove_file(&artifact)?;
            log::debug!("Removed temporary file {}", artifact.display());
        }

        // A failing hook leaves the destination extracted but unfinalized
        if let Some(finalize) = &self.spec.finalize {
            log::debug!("Calling finalize function for {}", self.name);
            finalize(dest).map_err(|e| BackendError::Finalize {
                path: dest.clone(),
                source: e,
            })?;
        }

        Ok(())
    }

    /// Archives have no incremental update; this is a full reinstall.
    pub fn update(&self) -> Result<(), BackendError> {
        self.install()
    }

    /// Clear whatever is at the destination so extraction starts clean.
    fn reconcile_destination(&self) -> Result<(), BackendError> {
        let dest = &self.spec.destination;

        match std::fs::symlink_metadata(dest) {
            Ok(meta) if meta.is_dir() => {
                std::fs::remove_dir_all(dest)?;
                log::debug!("Removed existing directory {}", dest.display());
            }
            Ok(_) => {
                std::fs::remove_file(dest)?;
                log::debug!("Removed existing file {}", dest.display());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        if self.spec.archive_type.extracts_to_directory() {
            std::fs::create_dir_all(dest)?;
        } else if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        Ok(())
    }
}

impl fmt::Debug for ArchiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveSource")
            .field("name", &self.name)
            .field("spec", &self.spec)
            .field("temp_dir", &self.temp_dir)
            .finish()
    }
}
