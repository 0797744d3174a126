//! Tool execution engine
//!
//! [`ToolRunner`] turns a [`ToolCall`] into a recorded [`ToolRun`]:
//!
//! 1. apply the tweak chain
//! 2. resolve the tool name against the finder (no retries)
//! 3. invoke the provider, measuring wall-clock time
//! 4. append the run to the logbook
//!
//! A non-zero exit code is not an error here; [`ToolRunner::run_successfully`]
//! adds the explicit success check used by the build steps.

use std::sync::Arc;
use std::time::Instant;

use modbuild_domain::{
    Logbook, RunError, Tool, ToolCall, ToolFinder, ToolNotFound, ToolRun, TweakChain,
};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub struct ToolRunner {
    finder: Arc<dyn ToolFinder>,
    tweaks: TweakChain,
    logbook: Arc<Logbook>,
}

impl ToolRunner {
    pub fn new(finder: Arc<dyn ToolFinder>, logbook: Arc<Logbook>) -> Self {
        Self {
            finder,
            tweaks: TweakChain::new(),
            logbook,
        }
    }

    pub fn with_tweaks(mut self, tweaks: TweakChain) -> Self {
        self.tweaks = tweaks;
        self
    }

    pub fn logbook(&self) -> &Arc<Logbook> {
        &self.logbook
    }

    pub fn finder(&self) -> &Arc<dyn ToolFinder> {
        &self.finder
    }

    pub fn find(&self, name: &str) -> Result<Tool, ToolNotFound> {
        self.finder.find_first(name).ok_or_else(|| ToolNotFound {
            name: name.to_string(),
            finders: self.finder.chain(),
        })
    }

    /// Run a call and record it, whatever its exit code
    pub fn run(&self, call: &ToolCall) -> Result<ToolRun, ToolNotFound> {
        let call = self.tweaks.apply(call.clone());
        let tool = self.find(call.name())?;

        debug!(tool = %tool.identifier(), "Running {}", call);
        let start = Instant::now();
        let output = tool.run(call.arguments());
        let duration = start.elapsed();

        let current = std::thread::current();
        let thread = current
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:?}", current.id()));

        let run = ToolRun {
            tool_name: call.name().to_string(),
            arguments: call.arguments().to_vec(),
            thread,
            duration,
            code: output.code,
            out: output.out,
            err: output.err,
        };

        if run.is_successful() {
            info!(
                tool = %run.tool_name,
                duration_ms = run.duration.as_millis() as u64,
                "Tool finished"
            );
        } else {
            warn!(tool = %run.tool_name, code = run.code, "Tool exited with non-zero code");
        }
        self.logbook.record(run.clone());
        Ok(run)
    }

    /// Run a call and require exit code zero
    pub fn run_successfully(&self, call: &ToolCall) -> Result<ToolRun, RunError> {
        Ok(self.run(call)?.into_successful()?)
    }

    /// Run independent calls on the blocking pool.
    ///
    /// Waits for every call to finish before reporting; the first failure in
    /// input order is returned.
    pub async fn run_all_parallel(
        self: &Arc<Self>,
        calls: Vec<ToolCall>,
    ) -> Result<Vec<ToolRun>, RunError> {
        let mut join_set = JoinSet::new();
        for (index, call) in calls.into_iter().enumerate() {
            let runner = Arc::clone(self);
            join_set.spawn_blocking(move || (index, runner.run_successfully(&call)));
        }

        let mut results = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Tool task join error: {}", e);
                    results.push((
                        usize::MAX,
                        Err(RunError::Failed {
                            tool: "<parallel task>".to_string(),
                            code: -1,
                            stderr: e.to_string(),
                        }),
                    ));
                }
            }
        }
        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }
}
