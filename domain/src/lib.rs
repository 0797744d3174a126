//! Domain layer for modbuild
//!
//! This crate contains the build tool's core rules: how tool invocations are
//! described and rewritten, how module declarations are read and classified,
//! and how missing external modules are computed and located. It performs no
//! process spawning and no network access.
//!
//! # Core Concepts
//!
//! ## Tool calls
//!
//! - **ToolCall**: immutable `name + arguments`, built fluently
//! - **Tweak**: pure `ToolCall -> ToolCall` rewriting applied before dispatch
//! - **ToolFinder**: composable `name -> Tool` lookup
//! - **ToolRun / Logbook**: recorded outcome of every invocation
//!
//! ## Modules
//!
//! - **DeclaredModule**: a parsed `module-info.java` plus its source root
//! - **ModuleSpace**: a named group of modules (`main`, `test`)
//! - **Missing externals**: `(required ∪ extra) \ (system ∪ declared)`
//! - **ModuleLookupTable**: first-answer-wins chain mapping names to URIs

pub mod core;
pub mod module;
pub mod project;
pub mod tool;
pub mod workflow;
pub mod workspace;

// Re-export commonly used types
pub use core::error::DomainError;
pub use module::{
    CuratedIndexLookup, DeclarationError, DeclaredModule, DeclaredModules,
    ExternalModuleLocation, Launcher, MAVEN_CENTRAL, MappedModuleLookup, MavenCoordinates,
    MavenModuleLookup, ModuleCategory, ModuleClassifier, ModuleDeclaration, ModuleLookup,
    ModuleLookupTable, ModuleSpace, ModuleSpaces, Platform, PrefixModuleLookup, Requirement,
    RequiresModifier, SystemCatalogue, UnlocatableModule, compute_missing_external_modules,
    is_valid_module_name,
};
pub use project::{Externals, Project};
pub use tool::{
    AppendArguments, CompositeToolFinder, InsertBefore, Logbook, LogbookEntry, NoteLevel,
    RunError, Tool, ToolCall, ToolFinder, ToolIdentifier, ToolList, ToolNotFound, ToolOutput,
    ToolProvider, ToolRun, Tweak, TweakChain,
};
pub use workflow::{Workflow, WorkflowState, WorkflowStep};
pub use workspace::{Workspace, WorkspaceLayout, expand_template};
