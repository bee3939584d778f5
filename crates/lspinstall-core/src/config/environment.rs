use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::util::ExecutableLookup;

pub const CACHE_DIR_ENV: &str = "LSPINSTALL_CACHE_DIR";
pub const BIN_DIR_ENV: &str = "LSPINSTALL_BIN_DIR";

/// Directories and search path that sources are constructed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Root for extracted archives and the temporary download artifact
    pub cache_dir: PathBuf,
    /// User-local binary directory that launchers are written into
    pub bin_dir: PathBuf,
    /// Executable search path; `None` means the process `PATH`
    pub search_path: Option<OsString>,
}

impl Environment {
    pub fn new(cache_dir: impl Into<PathBuf>, bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            bin_dir: bin_dir.into(),
            search_path: None,
        }
    }

    /// Use an explicit executable search path instead of `PATH`.
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    /// Resolve the directories for the current user.
    ///
    /// `LSPINSTALL_CACHE_DIR` and `LSPINSTALL_BIN_DIR` take precedence over
    /// the platform defaults (`~/.cache` and `~/.local/bin` on Linux).
    pub fn detect() -> Result<Self> {
        Self::detect_with(|key| std::env::var_os(key))
    }

    /// [`detect`](Self::detect) with environment variables read through `var`.
    fn detect_with(var: impl Fn(&str) -> Option<OsString>) -> Result<Self> {
        let cache_dir = env_path(&var, CACHE_DIR_ENV);
        let bin_dir = env_path(&var, BIN_DIR_ENV);
        if let (Some(cache_dir), Some(bin_dir)) = (&cache_dir, &bin_dir) {
            return Ok(Self::new(cache_dir, bin_dir));
        }

        let base = directories::BaseDirs::new()
            .ok_or_else(|| Error::Config("Could not determine the home directory".to_string()))?;

        let cache_dir = cache_dir.unwrap_or_else(|| base.cache_dir().to_path_buf());
        let bin_dir = bin_dir.unwrap_or_else(|| {
            base.executable_dir()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| base.home_dir().join(".local").join("bin"))
        });

        Ok(Self::new(cache_dir, bin_dir))
    }

    /// Create the cache and bin directories if they are missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.cache_dir, &self.bin_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
                log::debug!("Created directory {}", dir.display());
            }
        }
        Ok(())
    }

    pub fn executable_lookup(&self) -> ExecutableLookup {
        ExecutableLookup::new(self.search_path.clone())
    }
}

fn env_path(var: impl Fn(&str) -> Option<OsString>, key: &str) -> Option<PathBuf> {
    var(key).filter(|value| !value.is_empty()).map(PathBuf::from)
}
