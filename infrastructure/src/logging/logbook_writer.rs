//! Logbook report writer.
//!
//! The Markdown report replays captions, messages and runs in recording
//! order and ends with a summary table. The JSONL file carries one entry per
//! line with a `timestamp`, for tooling.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use modbuild_domain::{Logbook, LogbookEntry, NoteLevel, ToolRun};
use tracing::debug;

/// `Tool 'javac' run with 7 arguments took 1.234s and finished with exit code 0`
pub fn describe_run(run: &ToolRun) -> String {
    let count = run.arguments.len();
    format!(
        "Tool '{}' run with {} argument{} took {:.3}s and finished with exit code {}",
        run.tool_name,
        count,
        if count == 1 { "" } else { "s" },
        run.duration.as_secs_f64(),
        run.code
    )
}

fn level_label(level: NoteLevel) -> &'static str {
    match level {
        NoteLevel::Debug => "debug",
        NoteLevel::Info => "info",
        NoteLevel::Warning => "warning",
        NoteLevel::Error => "error",
    }
}

fn fenced(out: &mut String, label: &str, text: &str) {
    let text = text.trim_end();
    if text.is_empty() {
        return;
    }
    out.push_str(&format!("{label}:\n\n```text\n{text}\n```\n\n"));
}

/// Render the whole logbook as Markdown
pub fn render_markdown(logbook: &Logbook, title: &str, timestamp: &str) -> String {
    let entries = logbook.entries();
    let mut out = format!("# Logbook of {title}\n\nGenerated {timestamp}\n\n");

    for entry in &entries {
        match entry {
            LogbookEntry::Caption { text } => out.push_str(&format!("## {text}\n\n")),
            LogbookEntry::Message { level, text } => {
                out.push_str(&format!("- **{}** {}\n\n", level_label(*level), text));
            }
            LogbookEntry::Run(run) => {
                out.push_str(&format!("### `{}`\n\n{}\n\n", run.tool_name, describe_run(run)));
                out.push_str(&format!(
                    "```text\n{} {}\n```\n\n",
                    run.tool_name,
                    run.arguments.join(" ")
                ));
                fenced(&mut out, "Output", &run.out);
                fenced(&mut out, "Errors", &run.err);
            }
        }
    }

    let runs = logbook.runs();
    out.push_str(&format!("## Summary\n\n{} run(s), {} failed\n\n", runs.len(), logbook.failures().len()));
    if !runs.is_empty() {
        out.push_str("| # | Thread | Duration | Tool | Exit |\n|--:|--------|---------:|------|-----:|\n");
        for (index, run) in runs.iter().enumerate() {
            out.push_str(&format!(
                "| {} | {} | {:.3}s | {} | {} |\n",
                index + 1,
                run.thread,
                run.duration.as_secs_f64(),
                run.tool_name,
                run.code
            ));
        }
    }
    out
}

/// Writes logbook reports next to each other: `<name>.md` and `<name>.jsonl`
pub struct LogbookWriter {
    markdown: PathBuf,
}

impl LogbookWriter {
    pub fn new(markdown: impl Into<PathBuf>) -> Self {
        Self {
            markdown: markdown.into(),
        }
    }

    pub fn markdown_path(&self) -> &Path {
        &self.markdown
    }

    pub fn jsonl_path(&self) -> PathBuf {
        self.markdown.with_extension("jsonl")
    }

    /// Write both reports, creating the parent directory if needed
    pub fn write(&self, logbook: &Logbook, title: &str) -> io::Result<()> {
        if let Some(parent) = self.markdown.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        std::fs::write(&self.markdown, render_markdown(logbook, title, &timestamp))?;

        let mut writer = BufWriter::new(File::create(self.jsonl_path())?);
        for entry in logbook.entries() {
            let mut record = serde_json::to_value(&entry).map_err(io::Error::other)?;
            if let serde_json::Value::Object(map) = &mut record {
                map.insert(
                    "timestamp".to_string(),
                    serde_json::Value::String(timestamp.clone()),
                );
            }
            writeln!(writer, "{record}")?;
        }
        writer.flush()?;

        debug!(path = %self.markdown.display(), entries = logbook.len(), "Wrote logbook");
        Ok(())
    }
}
