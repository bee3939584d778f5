//! Downloading and extraction of release archives.
//!
//! This module provides the two leaf collaborators of an archive source:
//! fetching a URL into a local file, and decoding that file into a
//! destination directory or a single file.

mod archive;
mod file;

pub use archive::{ArchiveExtractor, ArchiveType};
pub use file::{Download, HttpDownloader};
