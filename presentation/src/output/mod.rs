//! Terminal output: reports and their formatters

pub mod console;
pub mod formatter;
pub mod report;

pub use console::ConsoleFormatter;
pub use formatter::{JsonFormatter, OutputFormatter};
pub use report::{FinderReport, ModuleReport, ProjectReport, SpaceReport, ToolEntry, ToolsReport};
