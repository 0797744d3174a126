//! Module scanner port
//!
//! Finds module declarations on disk. Implementations must be idempotent:
//! scanning the same tree twice yields the same [`DeclaredModules`].

use std::path::{Path, PathBuf};

use modbuild_domain::{DeclarationError, DeclaredModules};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    /// Source root with zero or several declaration files, bad pattern, ...
    #[error("Configuration error at {}: {reason}", path.display())]
    Configuration { path: PathBuf, reason: String },

    #[error("Malformed module declaration {}: {source}", path.display())]
    Declaration {
        path: PathBuf,
        #[source]
        source: DeclarationError,
    },

    #[error("Module '{name}' declared twice: {} and {}", first.display(), second.display())]
    Duplicate {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Path the error refers to
    pub fn path(&self) -> &Path {
        match self {
            ScanError::Configuration { path, .. }
            | ScanError::Declaration { path, .. }
            | ScanError::Io { path, .. } => path,
            ScanError::Duplicate { second, .. } => second,
        }
    }
}

pub trait ModuleScanner: Send + Sync {
    /// Scan `base` for source roots matching any of `patterns`
    fn scan(&self, base: &Path, patterns: &[String]) -> Result<DeclaredModules, ScanError>;

    /// Scan the directory of downloaded external modules
    fn scan_external(&self, directory: &Path) -> Result<DeclaredModules, ScanError>;
}
