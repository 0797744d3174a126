//! Build options controlling use case behavior
//!
//! [`BuildOptions`] groups the parameters that steer the build use cases:
//! compiler settings, resolver bounds and test/launch settings. They come from
//! the `[build]` and `[tweaks]` configuration sections.

use serde::{Deserialize, Serialize};

use modbuild_domain::Platform;

/// Default module providing the JUnit Platform console launcher
pub const JUNIT_CONSOLE_MODULE: &str = "org.junit.platform.console";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOptions {
    /// `--release` for javac when a space does not set its own
    pub release: Option<u32>,
    /// Source encoding injected in front of javac's `-d`
    pub encoding: Option<String>,
    /// `--module-version` for compiled modules and archives
    pub module_version: Option<String>,
    /// Upper bound on "find missing, fetch, rescan" rounds
    pub max_resolve_iterations: usize,
    /// Space whose modules are run through the test launcher
    pub test_space: String,
    /// Module holding the console launcher; added to the externals when tests exist
    pub junit_module: String,
    pub test_arguments: Vec<String>,
    pub launch_arguments: Vec<String>,
    /// Platform used to pick native artifacts
    #[serde(skip, default = "Platform::current")]
    pub platform: Platform,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            release: None,
            encoding: Some("UTF-8".to_string()),
            module_version: None,
            max_resolve_iterations: 32,
            test_space: "test".to_string(),
            junit_module: JUNIT_CONSOLE_MODULE.to_string(),
            test_arguments: Vec::new(),
            launch_arguments: Vec::new(),
            platform: Platform::current(),
        }
    }
}

impl BuildOptions {
    // ==================== Builder Methods ====================

    pub fn with_release(mut self, release: u32) -> Self {
        self.release = Some(release);
        self
    }

    pub fn with_encoding(mut self, encoding: Option<String>) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_module_version(mut self, version: impl Into<String>) -> Self {
        self.module_version = Some(version.into());
        self
    }

    pub fn with_max_resolve_iterations(mut self, max: usize) -> Self {
        self.max_resolve_iterations = max;
        self
    }

    pub fn with_test_space(mut self, space: impl Into<String>) -> Self {
        self.test_space = space.into();
        self
    }

    pub fn with_junit_module(mut self, module: impl Into<String>) -> Self {
        self.junit_module = module.into();
        self
    }

    pub fn with_launch_arguments(mut self, arguments: Vec<String>) -> Self {
        self.launch_arguments = arguments;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BuildOptions::default();
        assert_eq!(options.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(options.max_resolve_iterations, 32);
        assert_eq!(options.junit_module, JUNIT_CONSOLE_MODULE);
        assert_eq!(options.test_space, "test");
    }

    #[test]
    fn test_builder_chain() {
        let options = BuildOptions::default()
            .with_release(21)
            .with_encoding(None)
            .with_max_resolve_iterations(3)
            .with_platform(Platform::ANY);
        assert_eq!(options.release, Some(21));
        assert!(options.encoding.is_none());
        assert_eq!(options.max_resolve_iterations, 3);
        assert_eq!(options.platform, Platform::ANY);
    }
}
