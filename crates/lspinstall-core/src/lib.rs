pub mod backends;
pub mod catalog;
pub mod config;
pub mod downloader;
pub mod error;
pub mod finalize;
pub mod process;
pub mod registry;
pub mod source;
pub mod util;

pub use backends::Backends;
pub use catalog::builtin_sources;
pub use config::{Environment, UserConfig};
pub use downloader::{ArchiveType, Download, HttpDownloader};
pub use error::{BackendError, Error, Result};
pub use process::{CommandOutput, CommandRunner, SystemRunner};
pub use registry::SourceRegistry;
pub use source::{Source, SourceKind};
