//! Append-only build logbook
//!
//! Every tool run and every caption/message emitted during a build ends up
//! here, in the order they were recorded. Appends are safe from any thread;
//! readers get snapshots.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use super::run::ToolRun;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// One logbook entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogbookEntry {
    Caption { text: String },
    Message { level: NoteLevel, text: String },
    Run(ToolRun),
}

#[derive(Debug, Default)]
pub struct Logbook {
    entries: Mutex<Vec<LogbookEntry>>,
}

impl Logbook {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogbookEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn caption(&self, text: impl Into<String>) {
        self.lock().push(LogbookEntry::Caption { text: text.into() });
    }

    pub fn message(&self, level: NoteLevel, text: impl Into<String>) {
        self.lock().push(LogbookEntry::Message {
            level,
            text: text.into(),
        });
    }

    pub fn record(&self, run: ToolRun) {
        self.lock().push(LogbookEntry::Run(run));
    }

    pub fn entries(&self) -> Vec<LogbookEntry> {
        self.lock().clone()
    }

    pub fn runs(&self) -> Vec<ToolRun> {
        self.lock()
            .iter()
            .filter_map(|entry| match entry {
                LogbookEntry::Run(run) => Some(run.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<ToolRun> {
        self.runs().into_iter().filter(|run| !run.is_successful()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn run(name: &str, code: i32) -> ToolRun {
        ToolRun {
            tool_name: name.to_string(),
            arguments: Vec::new(),
            thread: "test".to_string(),
            duration: Duration::ZERO,
            code,
            out: String::new(),
            err: String::new(),
        }
    }

    #[test]
    fn test_entries_keep_order() {
        let logbook = Logbook::new();
        logbook.caption("Compile");
        logbook.record(run("javac", 0));
        logbook.message(NoteLevel::Warning, "slow");
        let entries = logbook.entries();
        assert_eq!(entries.len(), 3);
        assert!(matches!(entries[0], LogbookEntry::Caption { .. }));
        assert!(matches!(entries[1], LogbookEntry::Run(_)));
        assert!(matches!(
            entries[2],
            LogbookEntry::Message {
                level: NoteLevel::Warning,
                ..
            }
        ));
    }

    #[test]
    fn test_failures_filter() {
        let logbook = Logbook::new();
        logbook.record(run("javac", 0));
        logbook.record(run("jar", 1));
        assert_eq!(logbook.runs().len(), 2);
        let failures = logbook.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].tool_name, "jar");
    }

    #[test]
    fn test_concurrent_appends() {
        let logbook = Arc::new(Logbook::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let logbook = Arc::clone(&logbook);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        logbook.record(run(&format!("tool{i}"), 0));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(logbook.len(), 200);
    }
}
