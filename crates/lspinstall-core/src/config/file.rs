use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::backends::Backends;
use crate::downloader::ArchiveType;
use crate::error::{Error, Result};
use crate::finalize::{chain, exec_launcher, mark_executable, mark_executable_at, FinalizeHook};
use crate::source::{ArchiveSpec, Source};

pub const CONFIG_ENV: &str = "LSPINSTALL_CONFIG";

/// The user configuration file structure (config.toml)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Extra sources appended after the built-in ones
    #[serde(rename = "source")]
    pub sources: Vec<SourceConfig>,
}

/// One `[[source]]` table, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    Archive(ArchiveConfig),
    Npm(NpmConfig),
    Pip(PipConfig),
    Go(GoConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArchiveConfig {
    pub name: String,
    pub url: String,
    /// `zip`, `tar.gz` or `gz`; inferred from the URL when omitted
    #[serde(rename = "type")]
    pub archive_type: Option<String>,
    /// Relative paths are resolved against the cache dir (bin dir for `gz`)
    pub destination: Option<PathBuf>,
    /// File inside the destination to mark executable
    pub executable: Option<PathBuf>,
    /// Name of a launcher script in the bin dir that execs `executable`
    pub launcher: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NpmConfig {
    pub name: String,
    pub package: Option<String>,
    #[serde(default)]
    pub requires: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipConfig {
    pub name: String,
    pub package: String,
    pub command: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoConfig {
    pub name: String,
    pub module: String,
}

impl SourceConfig {
    pub fn name(&self) -> &str {
        match self {
            SourceConfig::Archive(c) => &c.name,
            SourceConfig::Npm(c) => &c.name,
            SourceConfig::Pip(c) => &c.name,
            SourceConfig::Go(c) => &c.name,
        }
    }

    /// Turn this entry into a source built from `backends`.
    pub fn build(&self, backends: &Backends) -> Result<Source> {
        match self {
            SourceConfig::Archive(c) => c.build(backends),
            SourceConfig::Npm(c) => {
                let package = c.package.as_deref().unwrap_or(&c.name);
                let requires: Vec<&str> = c.requires.iter().map(String::as_str).collect();
                Ok(backends.npm(&c.name, package, &requires))
            }
            SourceConfig::Pip(c) => {
                let command = c.command.as_deref().unwrap_or(&c.name);
                Ok(backends.pip(&c.name, command, &c.package))
            }
            SourceConfig::Go(c) => Ok(backends.go(&c.name, &c.module)),
        }
    }
}

impl ArchiveConfig {
    fn archive_type(&self) -> Result<ArchiveType> {
        let parsed = match &self.archive_type {
            Some(tag) => tag.parse::<ArchiveType>(),
            None => ArchiveType::from_path(Path::new(&self.url)).ok_or_else(|| {
                crate::error::BackendError::UnsupportedArchiveType(self.url.clone())
            }),
        };

        parsed.map_err(|e| Error::Config(format!("source {}: {}", self.name, e)))
    }

    fn build(&self, backends: &Backends) -> Result<Source> {
        let archive_type = self.archive_type()?;

        let base = if archive_type.extracts_to_directory() {
            &backends.env.cache_dir
        } else {
            &backends.env.bin_dir
        };
        let relative = self.destination.as_deref().unwrap_or(Path::new(&self.name));
        if !is_plain_relative(relative) {
            return Err(self.path_error("destination", relative));
        }
        let destination = base.join(relative);

        let mut spec = ArchiveSpec::new(&self.url, archive_type, destination);
        if let Some(hook) = self.finalize_hook(archive_type, backends)? {
            spec = spec.with_finalize(hook);
        }

        Ok(backends.archive(&self.name, spec))
    }

    fn path_error(&self, field: &str, path: &Path) -> Error {
        Error::Config(format!(
            "source {}: {} '{}' must be a relative path below the install directory",
            self.name,
            field,
            path.display()
        ))
    }

    fn finalize_hook(&self, archive_type: ArchiveType, backends: &Backends) -> Result<Option<FinalizeHook>> {
        if !archive_type.extracts_to_directory() {
            return Ok(Some(mark_executable()));
        }

        if let Some(path) = self.executable.as_deref().filter(|p| !is_plain_relative(p)) {
            return Err(self.path_error("executable", path));
        }
        if let Some(launcher) = self.launcher.as_deref().filter(|l| !is_plain_relative(Path::new(l))) {
            return Err(self.path_error("launcher", Path::new(launcher)));
        }

        let mut hooks = Vec::new();
        if let Some(executable) = &self.executable {
            hooks.push(mark_executable_at(executable));
        }
        match (&self.launcher, &self.executable) {
            (Some(launcher), Some(executable)) => {
                hooks.push(exec_launcher(&backends.env.bin_dir, launcher, executable));
            }
            (Some(_), None) => {
                return Err(Error::Config(format!(
                    "source {}: launcher requires executable",
                    self.name
                )));
            }
            _ => {}
        }

        Ok(match hooks.len() {
            0 => None,
            1 => hooks.pop(),
            _ => Some(chain(hooks)),
        })
    }
}

/// Non-empty and made only of normal components, so joining it onto a
/// directory always lands strictly below that directory.
fn is_plain_relative(path: &Path) -> bool {
    path.components().next().is_some() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

impl UserConfig {
    /// Parse configuration from TOML text
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load the configuration file, or an empty configuration if it is missing
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No configuration file at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// `$LSPINSTALL_CONFIG`, or `config.toml` in the platform config dir
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(path));
        }

        directories::ProjectDirs::from("", "", "lspinstall")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Build every configured source, rejecting names already in `taken`.
    pub fn build_sources<'a>(
        &self,
        backends: &Backends,
        taken: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<Source>> {
        let mut seen: std::collections::HashSet<String> = taken.into_iter().map(str::to_string).collect();
        let mut sources = Vec::with_capacity(self.sources.len());

        for entry in &self.sources {
            if !seen.insert(entry.name().to_string()) {
                return Err(Error::Config(format!("duplicate source name: {}", entry.name())));
            }
            sources.push(entry.build(backends)?);
        }

        Ok(sources)
    }
}
