//! Shared collaborators that sources are built from.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Environment;
use crate::downloader::{Download, HttpDownloader};
use crate::error::{Error, Result};
use crate::process::{CommandRunner, SystemRunner};
use crate::source::{ArchiveSource, ArchiveSpec, GoModuleSource, NpmRegistry, NpmSource, PipSource, Source};

/// Environment, downloader, command runner and npm registry for one process.
///
/// Every source built through the same `Backends` shares one
/// [`NpmRegistry`], so npm is asked for its package listing at most once.
#[derive(Clone)]
pub struct Backends {
    pub env: Environment,
    pub downloader: Arc<dyn Download>,
    pub runner: Arc<dyn CommandRunner>,
    pub npm_registry: Arc<NpmRegistry>,
}

impl Backends {
    pub fn new(env: Environment, downloader: Arc<dyn Download>, runner: Arc<dyn CommandRunner>) -> Self {
        let npm_registry = Arc::new(NpmRegistry::new(runner.clone()));
        Self {
            env,
            downloader,
            runner,
            npm_registry,
        }
    }

    /// Real HTTP downloads and child processes.
    pub fn system(env: Environment) -> Result<Self> {
        let downloader = HttpDownloader::new()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::new(env, Arc::new(downloader), Arc::new(SystemRunner)))
    }

    /// Path below the cache directory, for extracted archive trees.
    pub fn cache_path(&self, relative: &str) -> PathBuf {
        self.env.cache_dir.join(relative)
    }

    /// Path below the user-local bin directory.
    pub fn bin_path(&self, relative: &str) -> PathBuf {
        self.env.bin_dir.join(relative)
    }

    pub fn archive(&self, name: &str, spec: ArchiveSpec) -> Source {
        ArchiveSource::new(name, spec, self.downloader.clone(), self.env.cache_dir.clone()).into()
    }

    pub fn npm(&self, name: &str, package: &str, requires: &[&str]) -> Source {
        NpmSource::new(
            name,
            package,
            requires.iter().map(|r| r.to_string()).collect(),
            self.runner.clone(),
            self.npm_registry.clone(),
        )
        .into()
    }

    pub fn pip(&self, name: &str, command: &str, package: &str) -> Source {
        PipSource::new(name, command, package, self.runner.clone(), self.env.executable_lookup()).into()
    }

    pub fn go(&self, name: &str, module: &str) -> Source {
        GoModuleSource::new(name, module, self.runner.clone(), self.env.executable_lookup()).into()
    }
}
