//! Where things get installed, and which extra sources the user declared.

mod environment;
mod file;

pub use environment::{Environment, BIN_DIR_ENV, CACHE_DIR_ENV};
pub use file::{ArchiveConfig, GoConfig, NpmConfig, PipConfig, SourceConfig, UserConfig, CONFIG_ENV};
