//! Module fetcher port
//!
//! Copies the bytes behind a URI to a target file. Transport details (HTTP
//! client, retries, timeouts) stay in the adapter.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Unsupported URI: {0}")]
    UnsupportedUri(String),

    #[error("Transfer of {uri} failed: {reason}")]
    Transfer { uri: String, reason: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded { bytes: u64 },
    /// Target already present, nothing transferred
    Skipped,
}

#[async_trait]
pub trait ModuleFetcher: Send + Sync {
    async fn fetch(&self, uri: &str, target: &Path) -> Result<FetchOutcome, FetchError>;
}
