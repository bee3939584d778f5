//! Utility functions shared by the source backends.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Resolves command names against an executable search path.
///
/// With no explicit search path the process `PATH` is used.
#[derive(Debug, Clone, Default)]
pub struct ExecutableLookup {
    search_path: Option<OsString>,
}

impl ExecutableLookup {
    pub fn new(search_path: Option<OsString>) -> Self {
        Self { search_path }
    }

    /// Returns true if an executable called `command` resolves.
    pub fn has_command(&self, command: &str) -> bool {
        self.find(command).is_some()
    }

    /// Full path of `command`, if it resolves.
    pub fn find(&self, command: &str) -> Option<PathBuf> {
        let found = match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                which::which_in(command, Some(paths), cwd)
            }
            None => which::which(command),
        };
        found.ok()
    }
}

/// Make `path` executable by adding the exec bits to its current mode.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    std::fs::set_permissions(path, perms)?;

    log::debug!("Made {} into an executable", path.display());
    Ok(())
}

/// Make `path` executable (only checks that it exists off Unix).
#[cfg(not(unix))]
pub fn make_executable(path: &Path) -> std::io::Result<()> {
    std::fs::metadata(path).map(|_| ())
}
