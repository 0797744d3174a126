//! Output formatter trait

use super::report::{ProjectReport, ToolsReport};

/// Renders reports for the terminal
pub trait OutputFormatter {
    /// Format the `info` report
    fn project(&self, report: &ProjectReport) -> String;

    /// Format the `tools` report
    fn tools(&self, report: &ToolsReport) -> String;
}

/// Pretty printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn project(&self, report: &ProjectReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn tools(&self, report: &ToolsReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }
}
