//! Native tool discovery
//!
//! [`NativeToolFinder`] exposes executables as tools, either from one
//! directory (typically `$JAVA_HOME/bin`) or from the `PATH` via `which`.
//!
//! | Finder | Description | Namespace |
//! |--------|-------------|-----------|
//! | [`NativeToolFinder::java_home`] | `JDK tools in <home>` | `jdk` |
//! | [`NativeToolFinder::path`] | `native programs on PATH` | none |
//!
//! `find_all` only reports the names the finder was created with, while
//! `find_first` accepts any name that resolves to an executable file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use modbuild_domain::{SystemCatalogue, Tool, ToolFinder, ToolIdentifier};
use tracing::{debug, trace};

use super::command::NativeProgram;

/// Tools shipped in a JDK's `bin` directory
pub const JDK_TOOLS: &[&str] = &[
    "jar", "jarsigner", "java", "javac", "javadoc", "javap", "jcmd", "jdeps", "jlink", "jmod",
    "jpackage", "jshell",
];

#[derive(Debug, Clone)]
pub struct NativeToolFinder {
    description: String,
    directory: Option<PathBuf>,
    names: Vec<String>,
    namespace: Option<String>,
    timeout: Option<Duration>,
}

impl NativeToolFinder {
    /// Executables in `directory`
    pub fn directory<I, S>(directory: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let directory = directory.into();
        Self {
            description: format!("native programs in {}", directory.display()),
            directory: Some(directory),
            names: names.into_iter().map(Into::into).collect(),
            namespace: None,
            timeout: None,
        }
    }

    /// JDK tools in `home/bin`, namespaced `jdk`
    pub fn java_home(home: impl AsRef<Path>) -> Self {
        let home = home.as_ref();
        Self {
            description: format!("JDK tools in {}", home.display()),
            ..Self::directory(home.join("bin"), JDK_TOOLS.iter().copied())
        }
        .with_namespace("jdk")
    }

    /// Executables found on the `PATH`
    pub fn path<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            description: "native programs on PATH".to_string(),
            directory: None,
            names: names.into_iter().map(Into::into).collect(),
            namespace: None,
            timeout: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Kill programs that run longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        match &self.directory {
            Some(directory) => [directory.join(name), directory.join(format!("{name}.exe"))]
                .into_iter()
                .find(|candidate| candidate.is_file()),
            None => which::which(name).ok(),
        }
    }

    fn tool(&self, name: &str) -> Option<Tool> {
        let executable = self.locate(name)?;
        let identifier = match ToolIdentifier::new(name) {
            Ok(identifier) => identifier,
            Err(e) => {
                debug!(name, error = %e, "Skipping native program with invalid name");
                return None;
            }
        };
        let identifier = match &self.namespace {
            Some(namespace) => identifier.with_namespace(namespace.clone()),
            None => identifier,
        };
        trace!(tool = %identifier, executable = %executable.display(), "Located native program");
        let program = NativeProgram::new(executable);
        let program = match self.timeout {
            Some(timeout) => program.with_timeout(timeout),
            None => program,
        };
        Some(Tool::new(identifier, Arc::new(program)))
    }
}

impl ToolFinder for NativeToolFinder {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn find_all(&self) -> Vec<Tool> {
        self.names.iter().filter_map(|name| self.tool(name)).collect()
    }

    fn find_first(&self, name: &str) -> Option<Tool> {
        let query = ToolIdentifier::parse(name).ok()?;
        self.tool(query.name()).filter(|tool| tool.matches(name))
    }
}

/// Locate a JDK: explicit setting, then `JAVA_HOME`, then the `javac` on `PATH`
pub fn detect_java_home(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(home) = configured {
        return Some(home.to_path_buf());
    }
    if let Some(home) = std::env::var_os("JAVA_HOME").filter(|h| !h.is_empty()) {
        return Some(PathBuf::from(home));
    }
    let javac = which::which("javac").ok()?;
    let javac = std::fs::canonicalize(&javac).unwrap_or(javac);
    let home = javac.parent()?.parent()?.to_path_buf();
    debug!(home = %home.display(), "Derived JAVA_HOME from javac on PATH");
    Some(home)
}

/// Platform modules reported by `java --list-modules`, if `java` can be run
pub fn list_system_modules(finder: &dyn ToolFinder) -> Option<SystemCatalogue> {
    let java = finder.find_first("java")?;
    let output = java.run(&["--list-modules".to_string()]);
    if output.code != 0 {
        debug!(code = output.code, "java --list-modules failed");
        return None;
    }
    let catalogue = SystemCatalogue::from_list_modules(&output.out);
    (!catalogue.is_empty()).then_some(catalogue)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn fake_jdk() -> tempfile::TempDir {
        let home = tempfile::tempdir().unwrap();
        let bin = home.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        for name in ["javac", "jar"] {
            let path = bin.join(name);
            std::fs::write(&path, "#!/bin/sh\necho \"$0 $@\"\n").unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        home
    }

    #[test]
    fn test_java_home_lists_present_tools() {
        let home = fake_jdk();
        let finder = NativeToolFinder::java_home(home.path());
        let names: Vec<String> = finder
            .find_all()
            .iter()
            .map(|t| t.identifier().to_string())
            .collect();
        assert_eq!(names, vec!["jdk/jar", "jdk/javac"]);
        assert!(finder.description().starts_with("JDK tools in "));
    }

    #[test]
    fn test_find_first_honours_namespace() {
        let home = fake_jdk();
        let finder = NativeToolFinder::java_home(home.path());
        assert!(finder.find_first("javac").is_some());
        assert!(finder.find_first("jdk/javac").is_some());
        assert!(finder.find_first("other/javac").is_none());
        assert!(finder.find_first("jlink").is_none());
    }

    #[test]
    fn test_runs_located_program() {
        let home = fake_jdk();
        let finder = NativeToolFinder::java_home(home.path());
        let tool = finder.find_first("jar").unwrap();
        let output = tool.run(&["--version".to_string()]);
        assert_eq!(output.code, 0);
        assert!(output.out.trim().ends_with("jar --version"));
    }

    #[test]
    fn test_path_finder_uses_which() {
        let finder = NativeToolFinder::path(["sh"]);
        assert_eq!(finder.find_all().len(), 1);
        assert!(finder.find_first("modbuild-definitely-missing").is_none());
    }

    #[test]
    fn test_list_system_modules() {
        let home = tempfile::tempdir().unwrap();
        let bin = home.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let java = bin.join("java");
        std::fs::write(&java, "#!/bin/sh\necho java.base@21\necho jdk.jfr@21\n").unwrap();
        std::fs::set_permissions(&java, std::fs::Permissions::from_mode(0o755)).unwrap();

        let finder = NativeToolFinder::java_home(home.path());
        let catalogue = list_system_modules(&finder).unwrap();
        assert!(catalogue.contains("java.base"));
        assert!(catalogue.contains("jdk.jfr"));
        std::fs::write(&java, "#!/bin/sh\nexit 1\n").unwrap();
        assert!(list_system_modules(&finder).is_none());
    }

    #[test]
    fn test_detect_java_home_prefers_configured() {
        let configured = PathBuf::from("/opt/jdk");
        assert_eq!(detect_java_home(Some(&configured)), Some(configured));
    }
}
