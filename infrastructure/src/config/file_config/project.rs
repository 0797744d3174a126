use serde::{Deserialize, Serialize};

/// Raw `[project]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProjectConfig {
    /// Defaults to the name of the project directory
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Raw `[[spaces]]` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSpaceConfig {
    pub name: String,
    /// Source root globs relative to the project root
    pub patterns: Vec<String>,
    pub release: Option<u32>,
    /// `module[/main.Class]`
    pub launcher: Option<String>,
    pub parents: Vec<String>,
}

impl FileSpaceConfig {
    pub fn new(name: &str, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            patterns: vec![pattern.to_string()],
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parents.push(parent.to_string());
        self
    }
}

/// `main` from `*/main/java`, `test` from `*/test/java` reading `main`
pub fn default_spaces() -> Vec<FileSpaceConfig> {
    vec![
        FileSpaceConfig::new("main", "*/main/java"),
        FileSpaceConfig::new("test", "*/test/java").with_parent("main"),
    ]
}
