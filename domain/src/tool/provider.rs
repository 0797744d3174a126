//! Tool provider abstraction
//!
//! A [`ToolProvider`] is the runnable half of a [`Tool`](super::entities::Tool):
//! given arguments it produces an exit code plus captured output streams.
//!
//! ```text
//! ┌───────────────────┐       ┌───────────────────┐
//! │ NativeProgram     │       │ in-process tools  │
//! │ (javac, jar, ...) │       │ (banner, checksum)│
//! └─────────┬─────────┘       └─────────┬─────────┘
//!           └──────────┬────────────────┘
//!                      ▼
//!          run(args) -> ToolOutput { code, out, err }
//! ```
//!
//! Closures `Fn(&[String]) -> ToolOutput` are providers too, which keeps test
//! doubles one-liners.

use serde::{Deserialize, Serialize};

/// Captured result of one provider invocation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolOutput {
    pub code: i32,
    pub out: String,
    pub err: String,
}

impl ToolOutput {
    pub fn success(out: impl Into<String>) -> Self {
        Self {
            code: 0,
            out: out.into(),
            err: String::new(),
        }
    }

    pub fn failure(code: i32, err: impl Into<String>) -> Self {
        Self {
            code,
            out: String::new(),
            err: err.into(),
        }
    }
}

/// Runnable tool implementation
pub trait ToolProvider: Send + Sync {
    fn run(&self, arguments: &[String]) -> ToolOutput;
}

impl<F> ToolProvider for F
where
    F: Fn(&[String]) -> ToolOutput + Send + Sync,
{
    fn run(&self, arguments: &[String]) -> ToolOutput {
        self(arguments)
    }
}
