//! Application layer for modbuild
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{BuildOptions, JUNIT_CONSOLE_MODULE};
pub use ports::{
    module_fetcher::{FetchError, FetchOutcome, ModuleFetcher},
    module_scanner::{ModuleScanner, ScanError},
    progress::{BuildProgressNotifier, NoProgress},
};
pub use use_cases::build::{BuildError, BuildInput, BuildOutput, BuildUseCase, StepError};
pub use use_cases::compile::{CompileError, CompileUseCase};
pub use use_cases::install_tool::{InstallError, InstallToolUseCase, InstalledTool};
pub use use_cases::launch::{LaunchError, LaunchUseCase};
pub use use_cases::resolve_modules::{
    ResolveError, ResolveModulesInput, ResolveModulesOutput, ResolveModulesUseCase,
};
pub use use_cases::run_tests::{RunTestsUseCase, TestError, TestOutcome};
pub use use_cases::run_tool::ToolRunner;
pub use use_cases::scan_project::ScanProjectUseCase;
