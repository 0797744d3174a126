//! Presentation layer for modbuild
//!
//! This crate contains CLI definitions, report formatters and
//! build progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{JsonFormatter, OutputFormatter};
pub use output::report::{ProjectReport, ToolsReport};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
