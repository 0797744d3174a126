//! Tool run records and execution errors

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// No finder in the chain knows the requested tool
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Tool '{name}' not found in [{}]", finders.join(", "))]
pub struct ToolNotFound {
    pub name: String,
    pub finders: Vec<String>,
}

/// Errors raised when running a tool
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunError {
    #[error(transparent)]
    NotFound(#[from] ToolNotFound),

    #[error("Tool '{tool}' failed with exit code {code}: {stderr}")]
    Failed {
        tool: String,
        code: i32,
        stderr: String,
    },
}

/// Immutable record of one finished tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolRun {
    pub tool_name: String,
    pub arguments: Vec<String>,
    pub thread: String,
    pub duration: Duration,
    pub code: i32,
    pub out: String,
    pub err: String,
}

impl ToolRun {
    pub fn is_successful(&self) -> bool {
        self.code == 0
    }

    /// Raise on a non-zero exit code, embedding the captured error stream
    pub fn require_successful(&self) -> Result<&Self, RunError> {
        if self.is_successful() {
            return Ok(self);
        }
        Err(RunError::Failed {
            tool: self.tool_name.clone(),
            code: self.code,
            stderr: self.err.trim_end().to_string(),
        })
    }

    pub fn into_successful(self) -> Result<Self, RunError> {
        self.require_successful()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(code: i32, err: &str) -> ToolRun {
        ToolRun {
            tool_name: "javac".to_string(),
            arguments: vec!["-d".to_string(), "out".to_string()],
            thread: "main".to_string(),
            duration: Duration::from_millis(12),
            code,
            out: String::new(),
            err: err.to_string(),
        }
    }

    #[test]
    fn test_success_check_passes_on_zero() {
        let ok = run(0, "");
        assert!(ok.is_successful());
        assert!(ok.require_successful().is_ok());
    }

    #[test]
    fn test_success_check_reports_name_code_and_stderr() {
        let failed = run(-1, "error: module not found: bar\n");
        let error = failed.require_successful().unwrap_err();
        let message = error.to_string();
        assert!(message.contains("javac"), "{message}");
        assert!(message.contains("-1"), "{message}");
        assert!(message.contains("error: module not found: bar"), "{message}");
        assert!(matches!(error, RunError::Failed { code: -1, .. }));
    }

    #[test]
    fn test_not_found_lists_finders() {
        let error = RunError::from(ToolNotFound {
            name: "jlink".to_string(),
            finders: vec!["registry".to_string(), "PATH".to_string()],
        });
        assert_eq!(error.to_string(), "Tool 'jlink' not found in [registry, PATH]");
        assert!(matches!(error, RunError::NotFound(_)));
    }
}
