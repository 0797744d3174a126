//! Java programs in the external-tools directory
//!
//! Each subdirectory of the external-tools directory is one tool, named
//! after the directory (`name` or `name@version`) in the `program`
//! namespace. A subdirectory holding neither archives nor `java.args` is a
//! namespace of its own, with one tool per nested directory:
//!
//! ```text
//! .modbuild/external-tools/
//! ├── google-java-format@1.22.0/
//! │   └── google-java-format-1.22.0-all-deps.jar   → program/google-java-format@1.22.0
//! ├── checker/
//! │   ├── java.args                                → program/checker (java @java.args)
//! │   └── ...
//! └── acme/
//!     └── lint@2.0/
//!         └── lint.jar                             → acme/lint@2.0
//! ```
//!
//! A `java.args` file wins over archives. Directories with several archives
//! and no `java.args` are skipped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use modbuild_domain::{Tool, ToolFinder, ToolIdentifier};
use tracing::debug;

use super::command::NativeProgram;

pub const JAVA_ARGS_FILE: &str = "java.args";

const DEFAULT_NAMESPACE: &str = "program";

#[derive(Debug, Clone)]
pub struct ProgramDirectoryFinder {
    directory: PathBuf,
    java: PathBuf,
}

impl ProgramDirectoryFinder {
    /// `java` is the launcher executable used for every program
    pub fn new(directory: impl Into<PathBuf>, java: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            java: java.into(),
        }
    }

    fn program(&self, home: &Path, namespace: &str) -> Option<Tool> {
        let name = home.file_name()?.to_str()?;
        let identifier = match ToolIdentifier::parse(name) {
            Ok(identifier) => identifier.with_namespace(namespace),
            Err(e) => {
                debug!(directory = %home.display(), error = %e, "Skipping program directory");
                return None;
            }
        };

        let arguments = home.join(JAVA_ARGS_FILE);
        let program = if arguments.is_file() {
            NativeProgram::new(&self.java)
                .with_prefix([format!("@{}", arguments.display())])
                .with_working_dir(home)
        } else {
            let jar = single_jar(home)?;
            NativeProgram::new(&self.java).with_prefix(["-jar".to_string(), jar.display().to_string()])
        };
        Some(Tool::new(identifier, Arc::new(program)))
    }
}

fn jars(home: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(home) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "jar"))
        .collect()
}

fn subdirectories(directory: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(directory) else {
        return Vec::new();
    };
    let mut homes: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    homes.sort();
    homes
}

fn is_namespace(directory: &Path) -> bool {
    !directory.join(JAVA_ARGS_FILE).is_file() && jars(directory).is_empty()
}

fn single_jar(home: &Path) -> Option<PathBuf> {
    let mut jars = jars(home);
    if jars.len() != 1 {
        debug!(
            directory = %home.display(),
            count = jars.len(),
            "Program directory needs exactly one jar or a java.args file"
        );
        return None;
    }
    jars.pop()
}

impl ToolFinder for ProgramDirectoryFinder {
    fn description(&self) -> String {
        format!("java programs in {}", self.directory.display())
    }

    fn find_all(&self) -> Vec<Tool> {
        if !self.directory.is_dir() {
            debug!(directory = %self.directory.display(), "No external tools directory");
            return Vec::new();
        }
        let mut tools = Vec::new();
        for home in subdirectories(&self.directory) {
            if !is_namespace(&home) {
                tools.extend(self.program(&home, DEFAULT_NAMESPACE));
                continue;
            }
            let Some(namespace) = home.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            tools.extend(
                subdirectories(&home)
                    .iter()
                    .filter_map(|nested| self.program(nested, namespace)),
            );
        }
        tools
    }
}
