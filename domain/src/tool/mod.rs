//! Tool domain module
//!
//! Everything needed to describe *what to run* and to record *what ran*:
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ ToolCall     │──▶│ TweakChain   │──▶│ ToolFinder   │──▶│ ToolRun      │
//! │ (immutable)  │   │ (rewriting)  │   │ (name→Tool)  │   │ (→ Logbook)  │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolCall`]: tool name plus ordered arguments, built fluently
//! - [`Tweak`] / [`TweakChain`]: pure call rewriting applied before dispatch
//! - [`ToolIdentifier`]: `namespace/name@version`
//! - [`Tool`]: identifier plus [`ToolProvider`]
//! - [`ToolFinder`]: lookup capability, composable via [`CompositeToolFinder`]
//! - [`ToolRun`]: immutable execution record; collected in a [`Logbook`]
//!
//! Execution itself (timing, thread bookkeeping, logbook appends) lives in the
//! application layer's `ToolRunner`; process spawning lives in infrastructure.

pub mod call;
pub mod entities;
pub mod finder;
pub mod logbook;
pub mod provider;
pub mod run;
pub mod tweak;

pub use call::ToolCall;
pub use entities::{Tool, ToolIdentifier};
pub use finder::{CompositeToolFinder, ToolFinder, ToolList};
pub use logbook::{Logbook, LogbookEntry, NoteLevel};
pub use provider::{ToolOutput, ToolProvider};
pub use run::{RunError, ToolNotFound, ToolRun};
pub use tweak::{AppendArguments, InsertBefore, Tweak, TweakChain};
