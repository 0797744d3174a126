use std::collections::BTreeMap;
use std::path::PathBuf;

use modbuild_domain::MAVEN_CENTRAL;
use serde::{Deserialize, Serialize};

/// Raw `[externals]` section
///
/// ```toml
/// [externals]
/// requires = ["org.junit.platform.console"]
/// indexes = [".modbuild/modules.properties"]
///
/// [externals.modules]
/// "org.example.lib" = "https://example.org/lib-1.0.jar"
///
/// [[externals.maven]]
/// modules = { "org.slf4j" = "org.slf4j:slf4j-api:2.0.13" }
///
/// [[externals.prefixes]]
/// prefix = "org.junit.jupiter"
/// coordinates = "org.junit.jupiter:junit-jupiter{suffix}:5.10.2"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExternalsConfig {
    /// Modules fetched even if no declaration requires them
    pub requires: Vec<String>,
    /// Direct `module[|os[-arch]] = uri` map
    pub modules: BTreeMap<String, String>,
    pub maven: Vec<FileMavenConfig>,
    pub prefixes: Vec<FilePrefixConfig>,
    /// Curated index files, relative to the project root
    pub indexes: Vec<PathBuf>,
    /// Default repository for Maven-style lookups
    pub repository: String,
}

impl Default for FileExternalsConfig {
    fn default() -> Self {
        Self {
            requires: Vec::new(),
            modules: BTreeMap::new(),
            maven: Vec::new(),
            prefixes: Vec::new(),
            indexes: Vec::new(),
            repository: MAVEN_CENTRAL.to_string(),
        }
    }
}

/// Raw `[[externals.maven]]` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMavenConfig {
    /// Overrides `externals.repository`
    pub repository: Option<String>,
    /// `module = "group:artifact:version[:classifier]"`
    pub modules: BTreeMap<String, String>,
}

/// Raw `[[externals.prefixes]]` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePrefixConfig {
    pub repository: Option<String>,
    pub prefix: String,
    /// Coordinates template with `{module}` and `{suffix}` placeholders
    pub coordinates: String,
}
