use std::path::PathBuf;

use modbuild_application::{BuildOptions, JUNIT_CONSOLE_MODULE};
use modbuild_domain::WorkspaceLayout;
use serde::{Deserialize, Serialize};

/// Raw `[build]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBuildConfig {
    /// Output directory, relative to the project root
    pub out: Option<PathBuf>,
    pub external_modules: Option<PathBuf>,
    pub external_tools: Option<PathBuf>,
    /// Default `--release` for spaces without their own
    pub release: Option<u32>,
    pub max_resolve_iterations: usize,
    pub test_space: String,
    pub junit_module: String,
    pub test_arguments: Vec<String>,
    pub launch_arguments: Vec<String>,
    pub layout: WorkspaceLayout,
}

impl Default for FileBuildConfig {
    fn default() -> Self {
        let options = BuildOptions::default();
        Self {
            out: None,
            external_modules: None,
            external_tools: None,
            release: None,
            max_resolve_iterations: options.max_resolve_iterations,
            test_space: options.test_space,
            junit_module: JUNIT_CONSOLE_MODULE.to_string(),
            test_arguments: Vec::new(),
            launch_arguments: Vec::new(),
            layout: WorkspaceLayout::default(),
        }
    }
}
