//! Infrastructure layer for modbuild
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the module source scanner, the module downloader,
//! tool finders backed by processes and in-process builtins, configuration
//! file loading and the logbook report writer.

pub mod config;
pub mod fetch;
pub mod logging;
pub mod modules;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, ConfigValidationError, FileConfig};
pub use fetch::ModuleDownloader;
pub use logging::LogbookWriter;
pub use modules::FileModuleScanner;
pub use tools::{
    NativeProgram, NativeToolFinder, ProgramDirectoryFinder, ToolRegistry, ToolSetup,
    builtin_tools, detect_java_home, jar_describer, list_system_modules,
};
