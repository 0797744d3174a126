//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod module_fetcher;
pub mod module_scanner;
pub mod progress;
