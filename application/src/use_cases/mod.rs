//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod build;
pub mod compile;
pub mod install_tool;
pub mod launch;
pub mod resolve_modules;
pub mod run_tool;
pub mod scan_project;

#[cfg(test)]
pub(crate) mod testing;
