//! Build workflow state machine
//!
//! ```text
//! Idle ──cache──▶ Cached ──compile-classes──▶ Cached ──compile-modules──▶ Compiled
//!                                                                             │
//!                          Launched ◀──launch── Tested ◀──────test────────────┘
//! ```
//!
//! Steps run strictly in order. A step whose precondition is not met (no test
//! modules, no launcher) is still *advanced through*; it just does no work.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowStep {
    Cache,
    CompileClasses,
    CompileModules,
    Test,
    Launch,
}

impl WorkflowStep {
    pub const ALL: [WorkflowStep; 5] = [
        WorkflowStep::Cache,
        WorkflowStep::CompileClasses,
        WorkflowStep::CompileModules,
        WorkflowStep::Test,
        WorkflowStep::Launch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStep::Cache => "cache",
            WorkflowStep::CompileClasses => "compile-classes",
            WorkflowStep::CompileModules => "compile-modules",
            WorkflowStep::Test => "test",
            WorkflowStep::Launch => "launch",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or_default()
    }

    /// All steps from the first up to and including `last`
    pub fn through(last: WorkflowStep) -> Vec<WorkflowStep> {
        Self::ALL[..=last.index()].to_vec()
    }

    /// State reached once this step completes
    pub fn completes(&self) -> WorkflowState {
        match self {
            WorkflowStep::Cache | WorkflowStep::CompileClasses => WorkflowState::Cached,
            WorkflowStep::CompileModules => WorkflowState::Compiled,
            WorkflowStep::Test => WorkflowState::Tested,
            WorkflowStep::Launch => WorkflowState::Launched,
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowState {
    Idle,
    Cached,
    Compiled,
    Tested,
    Launched,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Cached => "cached",
            WorkflowState::Compiled => "compiled",
            WorkflowState::Tested => "tested",
            WorkflowState::Launched => "launched",
        };
        f.write_str(name)
    }
}

/// Tracks progress through [`WorkflowStep::ALL`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workflow {
    completed: usize,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WorkflowState {
        match self.completed {
            0 => WorkflowState::Idle,
            n => WorkflowStep::ALL[n - 1].completes(),
        }
    }

    pub fn next_step(&self) -> Option<WorkflowStep> {
        WorkflowStep::ALL.get(self.completed).copied()
    }

    /// Record completion of `step`, which must be the next one in order
    pub fn advance(&mut self, step: WorkflowStep) -> Result<WorkflowState, DomainError> {
        match self.next_step() {
            Some(next) if next == step => {
                self.completed += 1;
                Ok(self.state())
            }
            Some(next) => Err(DomainError::InvalidTransition(format!(
                "cannot run {step} while {} (next step is {next})",
                self.state()
            ))),
            None => Err(DomainError::InvalidTransition(format!(
                "cannot run {step}, workflow already {}",
                self.state()
            ))),
        }
    }
}
