use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Raw `[tools]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// JDK to use; falls back to `JAVA_HOME`, then `javac` on the `PATH`
    pub java_home: Option<PathBuf>,
    /// Extra directories searched for native programs, before the `PATH`
    pub directories: Vec<PathBuf>,
    /// Kill native programs running longer than this
    pub timeout_seconds: Option<u64>,
}
