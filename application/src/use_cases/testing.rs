//! In-memory port doubles shared by use case tests

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use modbuild_domain::{DeclaredModule, DeclaredModules};

use crate::ports::module_fetcher::{FetchError, FetchOutcome, ModuleFetcher};
use crate::ports::module_scanner::{ModuleScanner, ScanError};

/// Scanner answering from fixed per-pattern modules plus a mutable external set
#[derive(Default)]
pub struct FakeScanner {
    sources: BTreeMap<String, Vec<DeclaredModule>>,
    external: Mutex<DeclaredModules>,
}

impl FakeScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, pattern: &str, module: DeclaredModule) -> Self {
        self.sources.entry(pattern.to_string()).or_default().push(module);
        self
    }

    pub fn add_external(&self, module: DeclaredModule) {
        self.external.lock().unwrap().insert(module);
    }
}

impl ModuleScanner for FakeScanner {
    fn scan(&self, _base: &Path, patterns: &[String]) -> Result<DeclaredModules, ScanError> {
        Ok(patterns
            .iter()
            .flat_map(|p| self.sources.get(p).cloned().unwrap_or_default())
            .collect())
    }

    fn scan_external(&self, _directory: &Path) -> Result<DeclaredModules, ScanError> {
        Ok(self.external.lock().unwrap().clone())
    }
}

/// Fetcher that "downloads" by registering a module with a [`FakeScanner`]
pub struct FakeFetcher {
    scanner: std::sync::Arc<FakeScanner>,
    /// uri → module that appears once the uri is fetched
    provides: BTreeMap<String, DeclaredModule>,
    pub fetched: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new(scanner: std::sync::Arc<FakeScanner>) -> Self {
        Self {
            scanner,
            provides: BTreeMap::new(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, uri: &str, module: DeclaredModule) -> Self {
        self.provides.insert(uri.to_string(), module);
        self
    }
}

#[async_trait]
impl ModuleFetcher for FakeFetcher {
    async fn fetch(&self, uri: &str, _target: &Path) -> Result<FetchOutcome, FetchError> {
        self.fetched.lock().unwrap().push(uri.to_string());
        match self.provides.get(uri) {
            Some(module) => {
                self.scanner.add_external(module.clone());
                Ok(FetchOutcome::Downloaded { bytes: 1 })
            }
            None if uri.starts_with("broken:") => Err(FetchError::Transfer {
                uri: uri.to_string(),
                reason: "connection reset".to_string(),
            }),
            None => Ok(FetchOutcome::Downloaded { bytes: 0 }),
        }
    }
}
