//! File downloader for HTTP/HTTPS release artifacts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::BackendError;

const USER_AGENT: &str = concat!("lspinstall/", env!("CARGO_PKG_VERSION"));

/// Fetches a URL into a local file.
pub trait Download: Send + Sync {
    /// Stream `url` into `dest`, returning the number of bytes written.
    ///
    /// Any non-success HTTP status is an error.
    fn download(&self, url: &str, dest: &Path) -> Result<u64, BackendError>;
}

/// Blocking HTTP downloader backed by reqwest
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Create a new downloader
    ///
    /// Requests never time out; a slow download blocks until it finishes.
    pub fn new() -> Result<Self, BackendError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| BackendError::Network {
                url: String::new(),
                source: e,
            })?;

        Ok(Self { client })
    }
}

impl Download for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<u64, BackendError> {
        let network_error = |e| BackendError::Network {
            url: url.to_string(),
            source: e,
        };

        let mut response = self.client.get(url).send().map_err(network_error)?;
        let status = response.status();
        log::info!("GET {} responded with status {}", url, status.as_u16());

        if !status.is_success() {
            return Err(BackendError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = BufWriter::new(File::create(dest)?);
        let written = response.copy_to(&mut file).map_err(network_error)?;
        file.flush()?;

        log::debug!("Wrote {} bytes to {}", written, dest.display());
        Ok(written)
    }
}
