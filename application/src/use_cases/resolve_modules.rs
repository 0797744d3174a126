//! Resolve modules use case
//!
//! Brings the external modules directory to a fixed point:
//!
//! ```text
//! ┌────────────────────┐   missing = ∅   ┌──────┐
//! │ scan externals dir │────────────────▶│ done │
//! │ compute missing    │                 └──────┘
//! └─────────┬──────────┘
//!           │ missing ≠ ∅
//!           ▼
//! ┌────────────────────┐  same name missing twice in a row  ┌───────────┐
//! │ locate via lookups │───────────────────────────────────▶│ NoProgress│
//! │ fetch concurrently │                                    └───────────┘
//! └─────────┬──────────┘
//!           └──── join, then repeat (bounded by max_iterations)
//! ```
//!
//! Fetched modules may require further externals; each round picks those up.

use std::collections::BTreeSet;
use std::sync::Arc;

use modbuild_domain::{
    DeclaredModules, ExternalModuleLocation, ModuleLookupTable, Platform, SystemCatalogue,
    UnlocatableModule, Workspace, compute_missing_external_modules,
};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::ports::module_fetcher::{FetchError, FetchOutcome, ModuleFetcher};
use crate::ports::module_scanner::{ModuleScanner, ScanError};
use crate::ports::progress::{BuildProgressNotifier, NoProgress};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Unlocatable(#[from] UnlocatableModule),

    #[error("Resolution made no progress, still missing: {}", modules.join(", "))]
    NoProgress { modules: Vec<String> },

    #[error("Gave up after {limit} resolution round(s), still missing: {}", remaining.join(", "))]
    IterationLimit { limit: usize, remaining: Vec<String> },

    #[error("Fetching module '{module}' failed: {source}")]
    Fetch {
        module: String,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Download task aborted: {0}")]
    Aborted(String),
}

/// Input for the ResolveModules use case
#[derive(Debug, Clone)]
pub struct ResolveModulesInput {
    /// Declared modules of every scanned space
    pub declared: Vec<DeclaredModules>,
    pub extra_requires: BTreeSet<String>,
    pub system: SystemCatalogue,
    pub lookups: ModuleLookupTable,
    pub platform: Platform,
    pub workspace: Workspace,
    pub max_iterations: usize,
}

impl ResolveModulesInput {
    pub fn new(workspace: Workspace, lookups: ModuleLookupTable) -> Self {
        Self {
            declared: Vec::new(),
            extra_requires: BTreeSet::new(),
            system: SystemCatalogue::jdk(),
            lookups,
            platform: Platform::current(),
            workspace,
            max_iterations: 32,
        }
    }

    pub fn with_declared(mut self, modules: DeclaredModules) -> Self {
        self.declared.push(modules);
        self
    }

    pub fn with_extra_requires<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_requires.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_system(mut self, system: SystemCatalogue) -> Self {
        self.system = system;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }
}

/// Result of a fixed-point resolution
#[derive(Debug, Clone, Default)]
pub struct ResolveModulesOutput {
    pub fetched: Vec<ExternalModuleLocation>,
    /// Rounds that found something missing
    pub iterations: usize,
}

pub struct ResolveModulesUseCase {
    scanner: Arc<dyn ModuleScanner>,
    fetcher: Arc<dyn ModuleFetcher>,
}

impl ResolveModulesUseCase {
    pub fn new(scanner: Arc<dyn ModuleScanner>, fetcher: Arc<dyn ModuleFetcher>) -> Self {
        Self { scanner, fetcher }
    }

    /// Missing external modules given the current content of the externals directory
    pub fn compute_missing(&self, input: &ResolveModulesInput) -> Result<Vec<String>, ResolveError> {
        let external = self
            .scanner
            .scan_external(input.workspace.external_modules())?;
        let sets = input.declared.iter().chain(std::iter::once(&external));
        Ok(compute_missing_external_modules(
            sets,
            &input.extra_requires,
            &input.system,
        ))
    }

    /// Locate and fetch the given modules concurrently
    pub async fn resolve(
        &self,
        modules: &[String],
        input: &ResolveModulesInput,
        progress: &dyn BuildProgressNotifier,
    ) -> Result<Vec<ExternalModuleLocation>, ResolveError> {
        let locations = modules
            .iter()
            .map(|module| input.lookups.locate(module, &input.platform))
            .collect::<Result<Vec<_>, _>>()?;

        let mut join_set = JoinSet::new();
        for location in locations {
            let fetcher = Arc::clone(&self.fetcher);
            let target = input.workspace.external_module_file(&location.module);
            join_set.spawn(async move {
                let result = fetcher.fetch(&location.uri, &target).await;
                (location, result)
            });
        }

        let mut fetched = Vec::new();
        let mut first_error = None;
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((location, Ok(outcome))) => {
                    match outcome {
                        FetchOutcome::Downloaded { bytes } => {
                            info!(module = %location.module, bytes, "Fetched {}", location.uri)
                        }
                        FetchOutcome::Skipped => {
                            debug!(module = %location.module, "Already present")
                        }
                    }
                    progress.on_module_fetched(&location);
                    fetched.push(location);
                }
                Ok((location, Err(source))) => {
                    warn!(module = %location.module, "Fetch failed: {}", source);
                    first_error.get_or_insert(ResolveError::Fetch {
                        module: location.module,
                        source,
                    });
                }
                Err(e) => {
                    warn!("Download task join error: {}", e);
                    first_error.get_or_insert(ResolveError::Aborted(e.to_string()));
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => {
                fetched.sort_by(|a, b| a.module.cmp(&b.module));
                Ok(fetched)
            }
        }
    }

    pub async fn resolve_missing(
        &self,
        input: &ResolveModulesInput,
    ) -> Result<ResolveModulesOutput, ResolveError> {
        self.resolve_missing_with_progress(input, &NoProgress).await
    }

    /// Fetch missing modules until nothing is missing.
    ///
    /// A name missing on two consecutive rounds means a fetch did not provide
    /// the module it was located for; that is fatal.
    pub async fn resolve_missing_with_progress(
        &self,
        input: &ResolveModulesInput,
        progress: &dyn BuildProgressNotifier,
    ) -> Result<ResolveModulesOutput, ResolveError> {
        let mut output = ResolveModulesOutput::default();
        let mut previous: BTreeSet<String> = BTreeSet::new();

        for iteration in 1..=input.max_iterations {
            let missing = self.compute_missing(input)?;
            if missing.is_empty() {
                debug!(iterations = output.iterations, "All external modules present");
                return Ok(output);
            }

            let stuck: Vec<String> = missing
                .iter()
                .filter(|name| previous.contains(*name))
                .cloned()
                .collect();
            if !stuck.is_empty() {
                return Err(ResolveError::NoProgress { modules: stuck });
            }

            info!(iteration, "Missing external modules: {}", missing.join(", "));
            progress.on_modules_missing(iteration, &missing);
            output.fetched.extend(self.resolve(&missing, input, progress).await?);
            output.iterations = iteration;
            previous = missing.into_iter().collect();
        }

        let remaining = self.compute_missing(input)?;
        if remaining.is_empty() {
            return Ok(output);
        }
        Err(ResolveError::IterationLimit {
            limit: input.max_iterations,
            remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{FakeFetcher, FakeScanner};
    use modbuild_domain::{DeclaredModule, MappedModuleLookup};

    fn module(name: &str, requires: &[&str]) -> DeclaredModule {
        DeclaredModule::new(name, format!("{name}/module-info.java"))
            .with_requires(requires.iter().copied())
    }

    fn lookups() -> ModuleLookupTable {
        ModuleLookupTable::new().with(
            MappedModuleLookup::new("test map")
                .with("a", "mem:a")
                .with("b", "mem:b")
                .with("c", "mem:c")
                .with("lost", "mem:lost")
                .with("flaky", "broken:flaky"),
        )
    }

    fn input(main: DeclaredModules) -> ResolveModulesInput {
        ResolveModulesInput::new(Workspace::new("/p"), lookups())
            .with_declared(main)
            .with_platform(Platform::ANY)
    }

    #[tokio::test]
    async fn test_transitive_fixed_point() {
        let scanner = Arc::new(FakeScanner::new());
        let fetcher = Arc::new(
            FakeFetcher::new(Arc::clone(&scanner))
                .with("mem:a", module("a", &["b"]))
                .with("mem:b", module("b", &["c", "java.base"]))
                .with("mem:c", module("c", &[])),
        );
        let use_case = ResolveModulesUseCase::new(scanner, fetcher.clone());
        let main: DeclaredModules = [module("app", &["a"])].into_iter().collect();

        let output = use_case.resolve_missing(&input(main)).await.unwrap();
        let fetched: Vec<_> = output.fetched.iter().map(|l| l.module.as_str()).collect();
        assert_eq!(fetched, vec!["a", "b", "c"]);
        assert_eq!(output.iterations, 3);
        assert_eq!(*fetcher.fetched.lock().unwrap(), vec!["mem:a", "mem:b", "mem:c"]);
    }

    #[tokio::test]
    async fn test_extra_requires_are_fetched() {
        let scanner = Arc::new(FakeScanner::new());
        let fetcher =
            Arc::new(FakeFetcher::new(Arc::clone(&scanner)).with("mem:c", module("c", &[])));
        let use_case = ResolveModulesUseCase::new(scanner, fetcher);
        let output = use_case
            .resolve_missing(&input(DeclaredModules::new()).with_extra_requires(["c"]))
            .await
            .unwrap();
        assert_eq!(output.fetched.len(), 1);
        assert_eq!(output.fetched[0].uri, "mem:c");
    }

    #[tokio::test]
    async fn test_no_progress_is_fatal() {
        let scanner = Arc::new(FakeScanner::new());
        // Fetching "mem:lost" succeeds but never provides module "lost".
        let fetcher = Arc::new(FakeFetcher::new(Arc::clone(&scanner)));
        let use_case = ResolveModulesUseCase::new(scanner, fetcher.clone());
        let main: DeclaredModules = [module("app", &["lost"])].into_iter().collect();

        let error = use_case.resolve_missing(&input(main)).await.unwrap_err();
        match error {
            ResolveError::NoProgress { modules } => assert_eq!(modules, vec!["lost"]),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fetcher.fetched.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unlocatable_module() {
        let scanner = Arc::new(FakeScanner::new());
        let fetcher = Arc::new(FakeFetcher::new(Arc::clone(&scanner)));
        let use_case = ResolveModulesUseCase::new(scanner, fetcher);
        let main: DeclaredModules = [module("app", &["nowhere"])].into_iter().collect();

        let error = use_case.resolve_missing(&input(main)).await.unwrap_err();
        assert!(matches!(error, ResolveError::Unlocatable(ref e) if e.module == "nowhere"));
    }

    #[tokio::test]
    async fn test_fetch_failure_reports_module() {
        let scanner = Arc::new(FakeScanner::new());
        let fetcher = Arc::new(FakeFetcher::new(Arc::clone(&scanner)));
        let use_case = ResolveModulesUseCase::new(scanner, fetcher);
        let main: DeclaredModules = [module("app", &["flaky"])].into_iter().collect();

        let error = use_case.resolve_missing(&input(main)).await.unwrap_err();
        assert!(matches!(error, ResolveError::Fetch { ref module, .. } if module == "flaky"));
    }

    #[tokio::test]
    async fn test_iteration_limit() {
        let scanner = Arc::new(FakeScanner::new());
        let fetcher = Arc::new(
            FakeFetcher::new(Arc::clone(&scanner))
                .with("mem:a", module("a", &["b"]))
                .with("mem:b", module("b", &[])),
        );
        let use_case = ResolveModulesUseCase::new(scanner, fetcher);
        let main: DeclaredModules = [module("app", &["a"])].into_iter().collect();

        let error = use_case
            .resolve_missing(&input(main).with_max_iterations(1))
            .await
            .unwrap_err();
        match error {
            ResolveError::IterationLimit { limit, remaining } => {
                assert_eq!(limit, 1);
                assert_eq!(remaining, vec!["b"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_compute_missing_counts_external_dir() {
        let scanner = Arc::new(FakeScanner::new());
        scanner.add_external(module("a", &["b"]));
        let fetcher = Arc::new(FakeFetcher::new(Arc::clone(&scanner)));
        let use_case = ResolveModulesUseCase::new(scanner, fetcher);
        let main: DeclaredModules = [module("app", &["a", "java.sql"])].into_iter().collect();
        assert_eq!(use_case.compute_missing(&input(main)).unwrap(), vec!["b"]);
    }
}
