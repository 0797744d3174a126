//! Dependency wiring for one invocation
//!
//! ```text
//! FileConfig ─┬─▶ Workspace, Project, BuildOptions, TweakChain
//!             └─▶ ToolSetup ─▶ CompositeToolFinder ─▶ ToolRunner (+ Logbook)
//!                                   │
//!                                   └─▶ jar ─▶ FileModuleScanner
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use modbuild_application::{
    BuildInput, BuildOptions, BuildUseCase, ModuleFetcher, ModuleScanner, ResolveModulesInput,
    ToolRunner,
};
use modbuild_domain::{
    CompositeToolFinder, Logbook, Project, SystemCatalogue, ToolFinder, WorkflowStep, Workspace,
};
use modbuild_infrastructure::fetch::DEFAULT_TIMEOUT;
use modbuild_infrastructure::{
    ConfigError, FileConfig, FileModuleScanner, LogbookWriter, ModuleDownloader, ToolSetup,
    detect_java_home, jar_describer, list_system_modules,
};
use tracing::{debug, info, warn};

pub struct App {
    pub workspace: Workspace,
    pub project: Project,
    pub options: BuildOptions,
    pub finder: Arc<CompositeToolFinder>,
    pub runner: Arc<ToolRunner>,
    pub scanner: Arc<dyn ModuleScanner>,
    pub fetcher: Arc<dyn ModuleFetcher>,
}

impl App {
    /// Wire every adapter; `detect_system` asks `java` for the platform modules
    pub fn new(root: PathBuf, config: &FileConfig, detect_system: bool) -> Result<Self> {
        let workspace = config.to_workspace(&root)?;

        let java_home = detect_java_home(config.tools.java_home.as_deref());
        match &java_home {
            Some(home) => info!(java_home = %home.display(), "Using JDK"),
            None => warn!("No JDK found; set tools.java_home or JAVA_HOME"),
        }
        let setup = ToolSetup::new(workspace.external_tools())
            .with_java_home(java_home)
            .with_directories(config.tools.directories.iter().map(|d| root.join(d)).collect())
            .with_timeout(config.tools.timeout_seconds.map(Duration::from_secs));
        let finder = Arc::new(setup.finder());

        let system = if detect_system {
            list_system_modules(finder.as_ref()).unwrap_or_else(|| {
                debug!("Falling back to the built-in platform module list");
                SystemCatalogue::jdk()
            })
        } else {
            SystemCatalogue::jdk()
        };
        let project = config.to_project(&root, system)?;
        let options = config.to_build_options();

        let logbook = Arc::new(Logbook::new());
        let runner = Arc::new(
            ToolRunner::new(Arc::clone(&finder) as Arc<dyn ToolFinder>, logbook)
                .with_tweaks(config.tweaks.to_tweak_chain()),
        );

        let mut scanner = FileModuleScanner::new();
        if let Some(describer) = jar_describer(finder.as_ref()) {
            scanner = scanner.with_jar_describer(describer);
        }
        let fetcher = ModuleDownloader::try_new(DEFAULT_TIMEOUT)?;

        Ok(Self {
            workspace,
            project,
            options,
            finder,
            runner,
            scanner: Arc::new(scanner),
            fetcher: Arc::new(fetcher),
        })
    }

    pub fn build_use_case(&self) -> BuildUseCase {
        BuildUseCase::new(
            Arc::clone(&self.scanner),
            Arc::clone(&self.fetcher),
            Arc::clone(&self.runner),
        )
    }

    pub fn build_input(&self, until: WorkflowStep) -> BuildInput {
        BuildInput::new(self.project.clone(), self.workspace.clone())
            .with_options(self.options.clone())
            .until(until)
    }

    /// Resolution of `modules` alone, ignoring the project's declarations
    pub fn resolve_input(&self, modules: &[String]) -> ResolveModulesInput {
        ResolveModulesInput::new(
            self.workspace.clone(),
            self.project.externals.lookups.clone(),
        )
        .with_extra_requires(modules.iter().cloned())
        .with_system(self.project.system.clone())
        .with_platform(self.options.platform.clone())
        .with_max_iterations(self.options.max_resolve_iterations)
    }

    /// Write `logbook.md` and `logbook.jsonl`; no-op when nothing was logged
    pub fn write_logbook(&self) -> Result<()> {
        let logbook = self.runner.logbook();
        if logbook.is_empty() {
            return Ok(());
        }
        let writer = LogbookWriter::new(self.workspace.logbook_file());
        writer
            .write(logbook, &self.project.name)
            .with_context(|| format!("Cannot write {}", writer.markdown_path().display()))?;
        info!(path = %writer.markdown_path().display(), "Logbook written");
        Ok(())
    }
}

/// Validated configuration, failing with every problem at once
pub fn validated(config: FileConfig) -> Result<FileConfig, ConfigError> {
    let issues = config.validate();
    if issues.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::Invalid(issues))
    }
}
