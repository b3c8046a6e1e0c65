//! Per-episode download failures.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why one episode download failed. Every variant names its URL so a batch
/// report can be read line by line.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The URL has no final path segment to name the file after.
    #[error("failed downloading {url}: no filename in URL")]
    InvalidUrl { url: String },
    /// Connection, DNS, TLS or timeout failure reported by curl.
    #[error("failed downloading {url}: {source}")]
    Network { url: String, source: curl::Error },
    /// The server answered with a non-success status.
    #[error("failed downloading {url}: HTTP {status}")]
    Http { url: String, status: u32 },
    #[error("failed downloading {url}: create {}: {source}", .path.display())]
    Create {
        url: String,
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed downloading {url}: write {}: {source}", .path.display())]
    Write {
        url: String,
        path: PathBuf,
        source: io::Error,
    },
    /// Renaming the finished `.part` file into place failed.
    #[error("failed downloading {url}: rename to {}: {source}", .path.display())]
    Finalize {
        url: String,
        path: PathBuf,
        source: io::Error,
    },
}

impl DownloadError {
    pub fn url(&self) -> &str {
        match self {
            DownloadError::InvalidUrl { url }
            | DownloadError::Network { url, .. }
            | DownloadError::Http { url, .. }
            | DownloadError::Create { url, .. }
            | DownloadError::Write { url, .. }
            | DownloadError::Finalize { url, .. } => url.as_str(),
        }
    }
}
