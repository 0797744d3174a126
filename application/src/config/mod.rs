//! Application-level configuration.
//!
//! - [`BuildOptions`]: compiler, resolver and test/launch settings

pub mod build_options;

pub use build_options::{BuildOptions, JUNIT_CONSOLE_MODULE};
