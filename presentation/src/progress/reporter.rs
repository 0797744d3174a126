//! Progress reporting for build execution

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use modbuild_application::BuildProgressNotifier;
use modbuild_domain::{ExternalModuleLocation, ToolRun, WorkflowStep};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with one spinner per workflow step
pub struct ProgressReporter {
    multi: MultiProgress,
    step_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            step_bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn step_display_name(step: WorkflowStep) -> &'static str {
        match step {
            WorkflowStep::Cache => "Resolving external modules",
            WorkflowStep::CompileClasses => "Compiling classes",
            WorkflowStep::CompileModules => "Packaging modules",
            WorkflowStep::Test => "Running tests",
            WorkflowStep::Launch => "Launching",
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(bar) = self.step_bar.lock()
            && let Some(bar) = bar.as_ref()
        {
            f(bar);
        }
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.step_bar.lock().ok().and_then(|mut bar| bar.take())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildProgressNotifier for ProgressReporter {
    fn on_step_start(&self, step: WorkflowStep) {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(Self::spinner_style());
        bar.set_prefix(Self::step_display_name(step));
        bar.set_message("...");
        bar.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.step_bar.lock()
            && let Some(previous) = slot.replace(bar)
        {
            previous.finish_and_clear();
        }
    }

    fn on_step_skipped(&self, step: WorkflowStep, reason: &str) {
        if let Some(bar) = self.take_bar() {
            bar.finish_with_message(format!("{} ({})", "skipped".dimmed(), reason));
        } else {
            let _ = self.multi.println(format!("{step} skipped: {reason}"));
        }
    }

    fn on_step_complete(&self, step: WorkflowStep) {
        if let Some(bar) = self.take_bar() {
            bar.finish_with_message(format!("{}", "done".green()));
        } else {
            let _ = self.multi.println(format!("{step} done"));
        }
    }

    fn on_tool_run(&self, run: &ToolRun) {
        if !run.is_successful() {
            let _ = self.multi.println(format!(
                "  {} {} exited with {}",
                "x".red(),
                run.tool_name,
                run.code
            ));
        }
    }

    fn on_modules_missing(&self, iteration: usize, modules: &[String]) {
        self.with_bar(|bar| {
            bar.set_message(format!("round {}: {} missing", iteration, modules.len()));
        });
    }

    fn on_module_fetched(&self, location: &ExternalModuleLocation) {
        self.with_bar(|bar| bar.set_message(location.module.clone()));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl BuildProgressNotifier for SimpleProgress {
    fn on_step_start(&self, step: WorkflowStep) {
        println!(
            "{} {}",
            "->".cyan(),
            ProgressReporter::step_display_name(step).bold()
        );
    }

    fn on_step_skipped(&self, _step: WorkflowStep, reason: &str) {
        println!("  {} {}", "-".dimmed(), reason.dimmed());
    }

    fn on_step_complete(&self, _step: WorkflowStep) {}

    fn on_tool_run(&self, run: &ToolRun) {
        if run.is_successful() {
            println!("  {} {} ({:.2}s)", "v".green(), run.tool_name, run.duration.as_secs_f64());
        } else {
            println!("  {} {} (exit code {})", "x".red(), run.tool_name, run.code);
        }
    }

    fn on_module_fetched(&self, location: &ExternalModuleLocation) {
        println!("  {} {}", "+".green(), location.module);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_tolerates_out_of_order_callbacks() {
        let reporter = ProgressReporter::new();
        reporter.on_step_complete(WorkflowStep::Cache);
        reporter.on_modules_missing(1, &["foo".to_string()]);
        reporter.on_step_start(WorkflowStep::Cache);
        reporter.on_step_start(WorkflowStep::CompileClasses);
        reporter.on_step_skipped(WorkflowStep::CompileClasses, "no modules declared");
        assert!(reporter.take_bar().is_none());
    }

    #[test]
    fn test_every_step_has_a_display_name() {
        for step in WorkflowStep::ALL {
            assert!(!ProgressReporter::step_display_name(step).is_empty());
        }
    }
}
