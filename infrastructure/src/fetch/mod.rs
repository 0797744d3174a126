//! Module download adapter
//!
//! [`ModuleDownloader`] implements [`ModuleFetcher`]:
//!
//! | URI form | Transport |
//! |----------|-----------|
//! | `https://...`, `http://...` | `reqwest` (feature `http`) |
//! | `file:///path`, `file:path` | file copy |
//! | `/plain/path`, `relative/path` | file copy |
//!
//! An existing target is kept and reported as [`FetchOutcome::Skipped`].
//! Bytes land in `<target>.part` first and are renamed into place, so an
//! interrupted transfer never leaves a truncated module behind.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use modbuild_application::{FetchError, FetchOutcome, ModuleFetcher};
use tracing::{debug, info};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct ModuleDownloader {
    #[cfg(feature = "http")]
    client: reqwest::Client,
}

impl ModuleDownloader {
    /// Create a downloader whose HTTP requests time out after `timeout`
    pub fn try_new(timeout: Duration) -> Result<Self, FetchError> {
        #[cfg(not(feature = "http"))]
        let _ = timeout;
        Ok(Self {
            #[cfg(feature = "http")]
            client: reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(concat!("modbuild/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| FetchError::Transfer {
                    uri: String::new(),
                    reason: format!("Cannot create HTTP client: {e}"),
                })?,
        })
    }

    async fn copy_file(&self, uri: &str, source: &Path, partial: &Path) -> Result<u64, FetchError> {
        if !source.is_file() {
            return Err(FetchError::Transfer {
                uri: uri.to_string(),
                reason: format!("{} is not a file", source.display()),
            });
        }
        tokio::fs::copy(source, partial).await.map_err(|source| FetchError::Io {
            path: partial.to_path_buf(),
            source,
        })
    }

    #[cfg(feature = "http")]
    async fn download(&self, uri: &str, partial: &Path) -> Result<u64, FetchError> {
        let transfer = |reason: String| FetchError::Transfer {
            uri: uri.to_string(),
            reason,
        };
        let response = self
            .client
            .get(uri)
            .send()
            .await
            .map_err(|e| transfer(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(transfer(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }
        let bytes = response.bytes().await.map_err(|e| transfer(e.to_string()))?;
        tokio::fs::write(partial, &bytes).await.map_err(|source| FetchError::Io {
            path: partial.to_path_buf(),
            source,
        })?;
        Ok(bytes.len() as u64)
    }

    #[cfg(not(feature = "http"))]
    async fn download(&self, uri: &str, _partial: &Path) -> Result<u64, FetchError> {
        Err(FetchError::UnsupportedUri(format!(
            "{uri} (built without the `http` feature)"
        )))
    }
}

/// Local path behind a `file:` URI or a scheme-less path
fn local_path(uri: &str) -> Option<PathBuf> {
    if let Some(rest) = uri.strip_prefix("file://") {
        return Some(PathBuf::from(rest));
    }
    if let Some(rest) = uri.strip_prefix("file:") {
        return Some(PathBuf::from(rest));
    }
    // `C:\...` has a one-letter "scheme"
    match uri.split_once(':') {
        Some((scheme, _)) if scheme.len() > 1 => None,
        _ => Some(PathBuf::from(uri)),
    }
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    target.with_file_name(name)
}

#[async_trait]
impl ModuleFetcher for ModuleDownloader {
    async fn fetch(&self, uri: &str, target: &Path) -> Result<FetchOutcome, FetchError> {
        if target.exists() {
            debug!(target = %target.display(), "Module already present");
            return Ok(FetchOutcome::Skipped);
        }
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|source| FetchError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let partial = partial_path(target);
        let transferred = if uri.starts_with("https://") || uri.starts_with("http://") {
            self.download(uri, &partial).await
        } else if let Some(source) = local_path(uri) {
            self.copy_file(uri, &source, &partial).await
        } else {
            Err(FetchError::UnsupportedUri(uri.to_string()))
        };

        let bytes = match transferred {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };
        tokio::fs::rename(&partial, target).await.map_err(|source| FetchError::Io {
            path: target.to_path_buf(),
            source,
        })?;
        info!(uri, target = %target.display(), bytes, "Fetched module");
        Ok(FetchOutcome::Downloaded { bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downloader() -> ModuleDownloader {
        ModuleDownloader::try_new(DEFAULT_TIMEOUT).unwrap()
    }

    #[test]
    fn test_local_path_forms() {
        assert_eq!(local_path("file:///tmp/a.jar"), Some(PathBuf::from("/tmp/a.jar")));
        assert_eq!(local_path("file:lib/a.jar"), Some(PathBuf::from("lib/a.jar")));
        assert_eq!(local_path("/tmp/a.jar"), Some(PathBuf::from("/tmp/a.jar")));
        assert_eq!(local_path("C:\\mods\\a.jar"), Some(PathBuf::from("C:\\mods\\a.jar")));
        assert_eq!(local_path("ftp://host/a.jar"), None);
    }

    #[tokio::test]
    async fn test_copies_file_uri() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.jar");
        std::fs::write(&source, b"PK-data").unwrap();
        let target = dir.path().join("mods/foo.jar");

        let uri = format!("file://{}", source.display());
        let outcome = downloader().fetch(&uri, &target).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Downloaded { bytes: 7 });
        assert_eq!(std::fs::read(&target).unwrap(), b"PK-data");
        assert!(!partial_path(&target).exists());
    }

    #[tokio::test]
    async fn test_existing_target_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("foo.jar");
        std::fs::write(&target, b"old").unwrap();
        let outcome = downloader().fetch("/nonexistent/foo.jar", &target).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Skipped);
        assert_eq!(std::fs::read(&target).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_missing_source_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("foo.jar");
        let error = downloader()
            .fetch("/nonexistent/modbuild/foo.jar", &target)
            .await
            .unwrap_err();
        assert!(matches!(error, FetchError::Transfer { .. }));
        assert!(!target.exists());
        assert!(!partial_path(&target).exists());
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let error = downloader()
            .fetch("ftp://example.org/foo.jar", &dir.path().join("foo.jar"))
            .await
            .unwrap_err();
        assert!(matches!(error, FetchError::UnsupportedUri(_)));
    }
}
