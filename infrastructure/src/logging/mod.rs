//! Logging infrastructure: logbook reports.
//!
//! Provides [`LogbookWriter`], which renders a build's [`Logbook`](modbuild_domain::Logbook)
//! as a Markdown report and as a JSONL event stream in the output directory.

mod logbook_writer;

pub use logbook_writer::{LogbookWriter, describe_run, render_markdown};
