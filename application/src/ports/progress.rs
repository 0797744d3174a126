//! Progress notification port
//!
//! Defines the interface for reporting progress during a build.

use modbuild_domain::{ExternalModuleLocation, ToolRun, WorkflowStep};

/// Callback for progress updates during a build
///
/// Implementations live in the presentation layer.
pub trait BuildProgressNotifier: Send + Sync {
    /// Called when a workflow step starts
    fn on_step_start(&self, step: WorkflowStep);

    /// Called when a step's precondition is not met and it does no work
    fn on_step_skipped(&self, step: WorkflowStep, reason: &str);

    /// Called when a step completes
    fn on_step_complete(&self, step: WorkflowStep);

    // ==================== Detail Callbacks ====================

    /// Called after every tool run issued by a step
    fn on_tool_run(&self, _run: &ToolRun) {}

    /// Called at the start of each resolution round with the missing names
    fn on_modules_missing(&self, _iteration: usize, _modules: &[String]) {}

    /// Called when an external module has been stored
    fn on_module_fetched(&self, _location: &ExternalModuleLocation) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl BuildProgressNotifier for NoProgress {
    fn on_step_start(&self, _step: WorkflowStep) {}
    fn on_step_skipped(&self, _step: WorkflowStep, _reason: &str) {}
    fn on_step_complete(&self, _step: WorkflowStep) {}
}
