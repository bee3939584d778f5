//! Installable language servers.
//!
//! Every server is a [`Source`]: one of a fixed set of backends that all
//! answer the same three questions. Is it installed, install it, update it.
//! Callers drive them identically and never need to know which mechanism
//! sits underneath.

mod archive;
mod go;
mod npm;
mod pip;

use std::fmt;

pub use archive::{ArchiveSource, ArchiveSpec};
pub use go::GoModuleSource;
pub use npm::{NpmRegistry, NpmSource};
pub use pip::PipSource;

use crate::error::{Error, Result};

/// Installation mechanism behind a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Archive,
    Npm,
    Pip,
    Go,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::Archive => "archive",
            SourceKind::Npm => "npm",
            SourceKind::Pip => "pip",
            SourceKind::Go => "go",
        };
        f.write_str(label)
    }
}

/// A named installable unit.
#[derive(Debug)]
pub enum Source {
    Archive(ArchiveSource),
    Npm(NpmSource),
    Pip(PipSource),
    Go(GoModuleSource),
}

impl Source {
    pub fn name(&self) -> &str {
        match self {
            Source::Archive(s) => s.name(),
            Source::Npm(s) => s.name(),
            Source::Pip(s) => s.name(),
            Source::Go(s) => s.name(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Source::Archive(_) => SourceKind::Archive,
            Source::Npm(_) => SourceKind::Npm,
            Source::Pip(_) => SourceKind::Pip,
            Source::Go(_) => SourceKind::Go,
        }
    }

    /// Whether the source is currently installed. Never modifies anything.
    ///
    /// Only the npm backend can fail here, when its one-time package
    /// listing cannot be obtained.
    pub fn installed(&self) -> Result<bool> {
        match self {
            Source::Archive(s) => Ok(s.installed()),
            Source::Npm(s) => s.installed().map_err(|source| Error::PresenceCheck {
                name: s.name().to_string(),
                source,
            }),
            Source::Pip(s) => Ok(s.installed()),
            Source::Go(s) => Ok(s.installed()),
        }
    }

    /// Install from scratch.
    pub fn install(&self) -> Result<()> {
        let result = match self {
            Source::Archive(s) => s.install(),
            Source::Npm(s) => s.install(),
            Source::Pip(s) => s.install(),
            Source::Go(s) => s.install(),
        };

        result.map_err(|source| Error::Install {
            name: self.name().to_string(),
            source,
        })
    }

    /// Bring an installed source to its latest version.
    ///
    /// Callers check [`installed`](Self::installed) first.
    pub fn update(&self) -> Result<()> {
        let result = match self {
            Source::Archive(s) => s.update(),
            Source::Npm(s) => s.update(),
            Source::Pip(s) => s.update(),
            Source::Go(s) => s.update(),
        };

        result.map_err(|source| Error::Update {
            name: self.name().to_string(),
            source,
        })
    }
}

impl From<ArchiveSource> for Source {
    fn from(source: ArchiveSource) -> Self {
        Source::Archive(source)
    }
}

impl From<NpmSource> for Source {
    fn from(source: NpmSource) -> Self {
        Source::Npm(source)
    }
}

impl From<PipSource> for Source {
    fn from(source: PipSource) -> Self {
        Source::Pip(source)
    }
}

impl From<GoModuleSource> for Source {
    fn from(source: GoModuleSource) -> Self {
        Source::Go(source)
    }
}
