//! File-system module scanning

pub mod external;
pub mod scanner;

pub use external::{ModuleDescription, scan_external_directory};
pub use scanner::{FileModuleScanner, MODULE_INFO};
