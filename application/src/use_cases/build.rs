//! Build use case
//!
//! Runs the workflow steps in order, stopping at the requested last step:
//!
//! | Step | Work | Skipped when |
//! |------|------|--------------|
//! | cache | fetch missing external modules | nothing is missing |
//! | compile-classes | `javac` per space; parent spaces are archived right away | every space is empty |
//! | compile-modules | `jar` per module of the remaining spaces, parallel | every space is empty |
//! | test | JUnit console per test module | no test modules / no launcher module |
//! | launch | `java --module` | no space declares a launcher |
//!
//! A child space compiles against its parents' modules, so a parent space is
//! archived directly after its classes, before the next space's `javac`.
//!
//! The first failing step aborts the rest; outputs already written stay on disk.

use std::sync::Arc;

use modbuild_domain::{
    DomainError, ExternalModuleLocation, Logbook, ModuleSpaces, NoteLevel, Project, ToolRun,
    Workflow, WorkflowState, WorkflowStep, Workspace,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::BuildOptions;
use crate::ports::module_fetcher::ModuleFetcher;
use crate::ports::module_scanner::{ModuleScanner, ScanError};
use crate::ports::progress::{BuildProgressNotifier, NoProgress};

use super::compile::{CompileError, CompileUseCase};
use super::launch::{LaunchError, LaunchUseCase};
use super::resolve_modules::{ResolveError, ResolveModulesInput, ResolveModulesUseCase};
use super::run_tests::{RunTestsUseCase, TestError, TestOutcome};
use super::run_tool::ToolRunner;
use super::scan_project::ScanProjectUseCase;

/// Failure of a single workflow step
#[derive(Error, Debug)]
pub enum StepError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Test(#[from] TestError),

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Scanning sources failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Step '{step}' failed: {source}")]
    Step {
        step: WorkflowStep,
        #[source]
        source: StepError,
    },

    #[error(transparent)]
    Workflow(#[from] DomainError),
}

impl BuildError {
    /// The step that failed, if the failure happened inside one
    pub fn step(&self) -> Option<WorkflowStep> {
        match self {
            BuildError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Input for the Build use case
#[derive(Debug, Clone)]
pub struct BuildInput {
    pub project: Project,
    pub workspace: Workspace,
    pub options: BuildOptions,
    /// Last step to run
    pub until: WorkflowStep,
}

impl BuildInput {
    pub fn new(project: Project, workspace: Workspace) -> Self {
        Self {
            project,
            workspace,
            options: BuildOptions::default(),
            until: WorkflowStep::Test,
        }
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn until(mut self, step: WorkflowStep) -> Self {
        self.until = step;
        self
    }
}

/// Result of a build
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub state: WorkflowState,
    pub spaces: ModuleSpaces,
    pub fetched: Vec<ExternalModuleLocation>,
    pub runs: Vec<ToolRun>,
    pub skipped: Vec<(WorkflowStep, String)>,
}

enum StepOutcome {
    Done(Vec<ToolRun>),
    Skipped(String),
}

pub struct BuildUseCase {
    scan: ScanProjectUseCase,
    resolve: ResolveModulesUseCase,
    compile: CompileUseCase,
    test: RunTestsUseCase,
    launch: LaunchUseCase,
    logbook: Arc<Logbook>,
}

impl BuildUseCase {
    pub fn new(
        scanner: Arc<dyn ModuleScanner>,
        fetcher: Arc<dyn ModuleFetcher>,
        runner: Arc<ToolRunner>,
    ) -> Self {
        Self {
            scan: ScanProjectUseCase::new(Arc::clone(&scanner)),
            resolve: ResolveModulesUseCase::new(scanner, fetcher),
            compile: CompileUseCase::new(Arc::clone(&runner)),
            test: RunTestsUseCase::new(Arc::clone(&runner)),
            launch: LaunchUseCase::new(Arc::clone(&runner)),
            logbook: Arc::clone(runner.logbook()),
        }
    }

    /// Scan the project's spaces
    pub fn scan(&self, input: &BuildInput) -> Result<ModuleSpaces, ScanError> {
        self.scan
            .execute(input.workspace.root(), &input.project.spaces)
    }

    /// Resolution input for the scanned spaces, including the test launcher
    /// module when the test space has modules
    pub fn resolve_input(&self, input: &BuildInput, spaces: &ModuleSpaces) -> ResolveModulesInput {
        let mut resolve = ResolveModulesInput::new(
            input.workspace.clone(),
            input.project.externals.lookups.clone(),
        )
        .with_extra_requires(input.project.externals.requires.iter().cloned())
        .with_system(input.project.system.clone())
        .with_platform(input.options.platform.clone())
        .with_max_iterations(input.options.max_resolve_iterations);
        for space in spaces.iter() {
            resolve = resolve.with_declared(space.modules.clone());
        }
        let has_tests = spaces
            .get(&input.options.test_space)
            .is_ok_and(|space| !space.is_empty());
        if has_tests && input.until >= WorkflowStep::Test {
            resolve = resolve.with_extra_requires([input.options.junit_module.clone()]);
        }
        resolve
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: BuildInput) -> Result<BuildOutput, BuildError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: BuildInput,
        progress: &dyn BuildProgressNotifier,
    ) -> Result<BuildOutput, BuildError> {
        info!(project = %input.project.name, until = %input.until, "Starting build");
        let spaces = self.scan(&input)?;

        let mut workflow = Workflow::new();
        let mut output = BuildOutput {
            state: workflow.state(),
            spaces: spaces.clone(),
            fetched: Vec::new(),
            runs: Vec::new(),
            skipped: Vec::new(),
        };

        for step in WorkflowStep::through(input.until) {
            progress.on_step_start(step);
            self.logbook.caption(step.as_str());

            let outcome = self
                .run_step(step, &input, &spaces, &mut output, progress)
                .await
                .map_err(|source| {
                    self.logbook.message(NoteLevel::Error, source.to_string());
                    BuildError::Step { step, source }
                })?;

            match outcome {
                StepOutcome::Done(runs) => {
                    for run in &runs {
                        progress.on_tool_run(run);
                    }
                    output.runs.extend(runs);
                    progress.on_step_complete(step);
                }
                StepOutcome::Skipped(reason) => {
                    info!(step = %step, "Skipped: {}", reason);
                    self.logbook.message(NoteLevel::Info, format!("Skipped {step}: {reason}"));
                    progress.on_step_skipped(step, &reason);
                    output.skipped.push((step, reason));
                }
            }
            output.state = workflow.advance(step)?;
        }

        info!(state = %output.state, runs = output.runs.len(), "Build finished");
        Ok(output)
    }

    async fn run_step(
        &self,
        step: WorkflowStep,
        input: &BuildInput,
        spaces: &ModuleSpaces,
        output: &mut BuildOutput,
        progress: &dyn BuildProgressNotifier,
    ) -> Result<StepOutcome, StepError> {
        let workspace = &input.workspace;
        let options = &input.options;
        let all_empty = spaces.iter().all(|s| s.is_empty());

        match step {
            WorkflowStep::Cache => {
                let resolve = self.resolve_input(input, spaces);
                let resolved = self
                    .resolve
                    .resolve_missing_with_progress(&resolve, progress)
                    .await?;
                if resolved.fetched.is_empty() {
                    return Ok(StepOutcome::Skipped("no missing external modules".to_string()));
                }
                output.fetched = resolved.fetched;
                Ok(StepOutcome::Done(Vec::new()))
            }
            WorkflowStep::CompileClasses => {
                if all_empty {
                    return Ok(StepOutcome::Skipped("no modules declared".to_string()));
                }
                let mut runs = Vec::new();
                for space in spaces.iter() {
                    runs.extend(self.compile.compile_classes(space, spaces, workspace, options)?);
                    if spaces.is_parent(&space.name) {
                        runs.extend(
                            self.compile
                                .compile_modules(space, spaces, workspace, options)
                                .await?,
                        );
                    }
                }
                Ok(StepOutcome::Done(runs))
            }
            WorkflowStep::CompileModules => {
                if all_empty {
                    return Ok(StepOutcome::Skipped("no modules declared".to_string()));
                }
                let mut runs = Vec::new();
                for space in spaces.iter().filter(|s| !spaces.is_parent(&s.name)) {
                    runs.extend(
                        self.compile
                            .compile_modules(space, spaces, workspace, options)
                            .await?,
                    );
                }
                Ok(StepOutcome::Done(runs))
            }
            WorkflowStep::Test => match self.test.execute(spaces, workspace, options)? {
                TestOutcome::Executed(runs) => Ok(StepOutcome::Done(runs)),
                TestOutcome::Skipped(reason) => {
                    if spaces.get(&options.test_space).is_ok_and(|s| !s.is_empty()) {
                        warn!("Tests not run: {}", reason);
                    }
                    Ok(StepOutcome::Skipped(reason))
                }
            },
            WorkflowStep::Launch => match self.launch.execute(spaces, workspace, options)? {
                Some(run) => Ok(StepOutcome::Done(vec![run])),
                None => Ok(StepOutcome::Skipped("no launcher configured".to_string())),
            },
        }
    }
}
