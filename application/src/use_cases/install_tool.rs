//! Install tool use case
//!
//! Fetches a Java application archive into the external-tools directory,
//! where the program finder picks it up:
//!
//! | Identifier | Folder |
//! |------------|--------|
//! | `format@1.22` | `<external-tools>/format@1.22/` |
//! | `acme/format@1.22` | `<external-tools>/acme/format@1.22/` |
//!
//! The archive keeps the file name of the URI when it names a `.jar`,
//! otherwise it is called `<name>.jar`. Installing over an existing archive
//! is a no-op.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use modbuild_domain::ToolIdentifier;
use thiserror::Error;
use tracing::info;

use crate::ports::module_fetcher::{FetchError, FetchOutcome, ModuleFetcher};

/// Namespace of tools installed without one
pub const DEFAULT_PROGRAM_NAMESPACE: &str = "program";

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("Namespace '{0}' must be a single directory name")]
    Namespace(String),

    #[error("Installing {identifier} failed: {source}")]
    Fetch {
        identifier: String,
        #[source]
        source: FetchError,
    },
}

/// Where an installed tool landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledTool {
    /// Identifier the program finder reports for the tool
    pub identifier: ToolIdentifier,
    pub directory: PathBuf,
    pub archive: PathBuf,
    pub outcome: FetchOutcome,
}

pub struct InstallToolUseCase {
    fetcher: Arc<dyn ModuleFetcher>,
}

impl InstallToolUseCase {
    pub fn new(fetcher: Arc<dyn ModuleFetcher>) -> Self {
        Self { fetcher }
    }

    /// Folder for `identifier` below `tools`
    pub fn directory(identifier: &ToolIdentifier, tools: &Path) -> Result<PathBuf, InstallError> {
        let mut name = identifier.name().to_string();
        if let Some(version) = identifier.version() {
            name = format!("{name}@{version}");
        }
        match identifier.namespace() {
            None => Ok(tools.join(name)),
            Some(namespace)
                if namespace.contains(['/', '\\']) || namespace == "." || namespace == ".." =>
            {
                Err(InstallError::Namespace(namespace.to_string()))
            }
            Some(namespace) => Ok(tools.join(namespace).join(name)),
        }
    }

    pub async fn execute(
        &self,
        identifier: &ToolIdentifier,
        uri: &str,
        tools: &Path,
    ) -> Result<InstalledTool, InstallError> {
        let directory = Self::directory(identifier, tools)?;
        let archive = directory.join(archive_name(identifier, uri));
        let outcome = self
            .fetcher
            .fetch(uri, &archive)
            .await
            .map_err(|source| InstallError::Fetch {
                identifier: identifier.to_string(),
                source,
            })?;

        let identifier = match identifier.namespace() {
            Some(_) => identifier.clone(),
            None => identifier.clone().with_namespace(DEFAULT_PROGRAM_NAMESPACE),
        };
        info!(tool = %identifier, archive = %archive.display(), "Installed tool");
        Ok(InstalledTool {
            identifier,
            directory,
            archive,
            outcome,
        })
    }
}

/// Last path segment of `uri` if it names a jar, else `<name>.jar`
fn archive_name(identifier: &ToolIdentifier, uri: &str) -> String {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    match path.rsplit(['/', '\\']).next() {
        Some(file) if file.len() > ".jar".len() && file.ends_with(".jar") => file.to_string(),
        _ => format!("{}.jar", identifier.name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{FakeFetcher, FakeScanner};
    use modbuild_domain::DeclaredModule;

    fn use_case() -> (InstallToolUseCase, Arc<FakeFetcher>) {
        let fetcher = Arc::new(
            FakeFetcher::new(Arc::new(FakeScanner::new()))
                .with("mem:format.jar", DeclaredModule::new("format", "format.jar")),
        );
        (InstallToolUseCase::new(Arc::clone(&fetcher) as Arc<dyn ModuleFetcher>), fetcher)
    }

    #[test]
    fn test_directory_layout() {
        let tools = Path::new("/t");
        let plain = ToolIdentifier::parse("format@1.22").unwrap();
        assert_eq!(
            InstallToolUseCase::directory(&plain, tools).unwrap(),
            PathBuf::from("/t/format@1.22")
        );
        let namespaced = ToolIdentifier::parse("acme/format").unwrap();
        assert_eq!(
            InstallToolUseCase::directory(&namespaced, tools).unwrap(),
            PathBuf::from("/t/acme/format")
        );
        let nested = ToolIdentifier::parse("a/b/format").unwrap();
        assert!(matches!(
            InstallToolUseCase::directory(&nested, tools),
            Err(InstallError::Namespace(ns)) if ns == "a/b"
        ));
    }

    #[test]
    fn test_archive_name() {
        let id = ToolIdentifier::parse("format@1.22").unwrap();
        assert_eq!(
            archive_name(&id, "https://repo/g/format/1.22/format-1.22-all.jar?download=1"),
            "format-1.22-all.jar"
        );
        assert_eq!(archive_name(&id, "https://host/download/latest"), "format.jar");
    }

    #[tokio::test]
    async fn test_install_fetches_into_tool_folder() {
        let (use_case, fetcher) = use_case();
        let identifier = ToolIdentifier::parse("format@1.22").unwrap();
        let installed = use_case
            .execute(&identifier, "mem:format.jar", Path::new("/t"))
            .await
            .unwrap();

        assert_eq!(installed.identifier.to_string(), "program/format@1.22");
        assert_eq!(installed.archive, PathBuf::from("/t/format@1.22/format.jar"));
        assert_eq!(installed.outcome, FetchOutcome::Downloaded { bytes: 1 });
        assert_eq!(fetcher.fetched.lock().unwrap().clone(), vec!["mem:format.jar"]);
    }

    #[tokio::test]
    async fn test_install_reports_fetch_failure() {
        let (use_case, _) = use_case();
        let identifier = ToolIdentifier::parse("acme/broken").unwrap();
        let error = use_case
            .execute(&identifier, "broken:format.jar", Path::new("/t"))
            .await
            .unwrap_err();
        assert!(error.to_string().contains("acme/broken"), "{error}");
    }
}
