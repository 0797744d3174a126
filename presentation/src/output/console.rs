//! Console output formatter for build results and reports

use crate::output::formatter::OutputFormatter;
use crate::output::report::{ProjectReport, ToolsReport};
use colored::Colorize;
use modbuild_application::{BuildOutput, FetchOutcome, InstalledTool};
use modbuild_domain::{ExternalModuleLocation, ToolRun};
use std::path::PathBuf;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the `info` report
    pub fn format_project(report: &ProjectReport) -> String {
        let mut output = String::new();

        let title = match &report.version {
            Some(version) => format!("{} {}", report.name, version),
            None => report.name.clone(),
        };
        output.push_str(&Self::header(&title));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Root:".cyan().bold(), report.root.display()));
        output.push_str(&format!("{} {}\n", "Output:".cyan().bold(), report.out.display()));
        output.push_str(&format!(
            "{} {}\n",
            "External modules:".cyan().bold(),
            report.external_modules.display()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "System modules:".cyan().bold(),
            report.system_modules
        ));

        for space in &report.spaces {
            output.push_str(&Self::section_header(&format!("Space '{}'", space.name)));
            output.push_str(&format!("  patterns: {}\n", space.patterns.join(", ")));
            if let Some(release) = space.release {
                output.push_str(&format!("  release:  {release}\n"));
            }
            if !space.parents.is_empty() {
                output.push_str(&format!("  parents:  {}\n", space.parents.join(", ")));
            }
            if let Some(launcher) = &space.launcher {
                output.push_str(&format!("  launcher: {launcher}\n"));
            }
            if !space.externals.is_empty() {
                output.push_str(&format!("  external: {}\n", space.externals.join(", ")));
            }
            if space.modules.is_empty() {
                output.push_str(&format!("  {}\n", "(no modules)".dimmed()));
            }
            for module in &space.modules {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    module.name.yellow().bold(),
                    format!("({})", module.content_root.display()).dimmed()
                ));
                if let Some(main) = &module.main_class {
                    output.push_str(&format!("    main-class {main}\n"));
                }
                for required in &module.requires {
                    output.push_str(&format!("    requires {required}\n"));
                }
            }
        }

        output.push_str(&Self::section_header("External modules"));
        if !report.requires.is_empty() {
            output.push_str(&format!("  requested: {}\n", report.requires.join(", ")));
        }
        if report.missing.is_empty() {
            output.push_str(&format!("  {}\n", "All external modules present".green()));
        } else {
            output.push_str(&format!("  {}\n", "Missing:".yellow().bold()));
            for module in &report.missing {
                output.push_str(&format!("    * {module}\n"));
            }
        }
        if !report.lookups.is_empty() {
            output.push_str(&format!("  {}\n", "Lookups:".cyan()));
            for (index, lookup) in report.lookups.iter().enumerate() {
                output.push_str(&format!("    {}. {}\n", index + 1, lookup));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format the `tools` report
    pub fn format_tools(report: &ToolsReport) -> String {
        let mut output = String::new();
        for finder in &report.finders {
            output.push_str(&format!("{}\n", finder.description.cyan().bold()));
            if finder.tools.is_empty() {
                output.push_str(&format!("  {}\n", "(none)".dimmed()));
            }
            for tool in &finder.tools {
                if tool.shadowed {
                    output.push_str(&format!(
                        "  {} {}\n",
                        tool.identifier.dimmed(),
                        "(shadowed)".dimmed()
                    ));
                } else {
                    output.push_str(&format!("  {}\n", tool.identifier));
                }
            }
        }
        output.push_str(&format!(
            "\n{} tool(s) in {} finder(s)\n",
            report.tool_count(),
            report.finders.len()
        ));
        output
    }

    /// Summary printed after a build
    pub fn format_build(result: &BuildOutput) -> String {
        let mut output = String::new();

        for location in &result.fetched {
            output.push_str(&Self::format_fetched(location));
        }
        for (step, reason) in &result.skipped {
            output.push_str(&format!(
                "{} {} {}\n",
                "-".dimmed(),
                step.to_string().bold(),
                format!("skipped: {reason}").dimmed()
            ));
        }

        let failed = result.runs.iter().filter(|run| !run.is_successful()).count();
        let modules: usize = result.spaces.iter().map(|space| space.modules.len()).sum();
        let summary = format!(
            "Build {} with {} module(s), {} tool run(s)",
            result.state,
            modules,
            result.runs.len()
        );
        if failed == 0 {
            output.push_str(&format!("{} {}\n", "v".green(), summary.green().bold()));
        } else {
            output.push_str(&format!(
                "{} {} ({} failed)\n",
                "x".red(),
                summary.red().bold(),
                failed
            ));
        }
        output
    }

    pub fn format_fetched(location: &ExternalModuleLocation) -> String {
        format!(
            "{} {} {}\n",
            "+".green(),
            location.module.bold(),
            format!("<- {}", location.uri).dimmed()
        )
    }

    /// Where `modbuild install` put a tool
    pub fn format_installed(installed: &InstalledTool) -> String {
        let status = match installed.outcome {
            FetchOutcome::Downloaded { .. } => "+".green(),
            FetchOutcome::Skipped => "=".dimmed(),
        };
        format!(
            "{} {} {}\n",
            status,
            installed.identifier.to_string().bold(),
            format!("-> {}", installed.archive.display()).dimmed()
        )
    }

    /// Output of a single `modbuild run`
    pub fn format_run(run: &ToolRun) -> String {
        let mut output = String::new();
        if !run.out.is_empty() {
            output.push_str(&run.out);
            if !run.out.ends_with('\n') {
                output.push('\n');
            }
        }
        if !run.err.is_empty() {
            output.push_str(&Self::indent(run.err.trim_end(), "! ").red().to_string());
            output.push('\n');
        }
        if !run.is_successful() {
            output.push_str(&format!(
                "{}\n",
                format!("{} exited with code {}", run.tool_name, run.code).red().bold()
            ));
        }
        output
    }

    /// Configuration sources, marking the ones that exist
    pub fn format_config_sources(sources: &[(String, PathBuf, bool)]) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", "Configuration sources (lowest priority first):".cyan().bold()));
        for (label, path, exists) in sources {
            let status = if *exists { "found".green() } else { "missing".dimmed() };
            output.push_str(&format!("  {:<8} {} [{}]\n", label, path.display(), status));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn project(&self, report: &ProjectReport) -> String {
        Self::format_project(report)
    }

    fn tools(&self, report: &ToolsReport) -> String {
        Self::format_tools(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::{FinderReport, ToolEntry};
    use std::time::Duration;

    fn run(code: i32, out: &str, err: &str) -> ToolRun {
        ToolRun {
            tool_name: "javac".to_string(),
            arguments: Vec::new(),
            thread: "main".to_string(),
            duration: Duration::from_millis(5),
            code,
            out: out.to_string(),
            err: err.to_string(),
        }
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }

    #[test]
    fn test_run_output() {
        let text = ConsoleFormatter::format_run(&run(0, "hello", ""));
        assert_eq!(text, "hello\n");
        let text = ConsoleFormatter::format_run(&run(3, "", "boom"));
        assert!(text.contains("! boom"));
        assert!(text.contains("javac exited with code 3"));
    }

    #[test]
    fn test_installed_output() {
        let installed = InstalledTool {
            identifier: modbuild_domain::ToolIdentifier::parse("acme/lint@2.0").unwrap(),
            directory: PathBuf::from("/t/acme/lint@2.0"),
            archive: PathBuf::from("/t/acme/lint@2.0/lint.jar"),
            outcome: FetchOutcome::Skipped,
        };
        let text = ConsoleFormatter::format_installed(&installed);
        assert!(text.contains("acme/lint@2.0"));
        assert!(text.contains("-> /t/acme/lint@2.0/lint.jar"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_tools_output_counts() {
        let report = ToolsReport {
            finders: vec![FinderReport {
                description: "modbuild tools".to_string(),
                tools: vec![ToolEntry {
                    identifier: "modbuild/tree".to_string(),
                    name: "tree".to_string(),
                    shadowed: false,
                }],
            }],
        };
        let text = ConsoleFormatter.tools(&report);
        assert!(text.contains("modbuild/tree"));
        assert!(text.contains("1 tool(s) in 1 finder(s)"));
    }
}
