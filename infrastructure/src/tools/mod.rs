//! Tool adapters
//!
//! Concrete [`ToolFinder`]s and [`ToolProvider`]s for the build:
//!
//! - `builtin`: in-process tools under the `modbuild` namespace
//! - `programs`: java programs installed in the external tools directory
//! - `native`: JDK binaries and other executables
//! - `command`: the process runner behind every native tool
//!
//! [`ToolSetup`] assembles them into the lookup order used by every command:
//!
//! ```text
//! modbuild/* → program/* (external tools) → jdk/* (JAVA_HOME/bin)
//!            → extra directories → PATH
//! ```

pub mod builtin;
pub mod command;
pub mod native;
pub mod programs;
pub mod registry;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use modbuild_domain::{CompositeToolFinder, ToolFinder, ToolOutput, ToolProvider};
use tracing::debug;

pub use builtin::{BUILTIN_NAMESPACE, CHECKSUM_MISMATCH_CODE, builtin_tools};
pub use command::{NativeProgram, SPAWN_FAILURE_CODE};
pub use native::{JDK_TOOLS, NativeToolFinder, detect_java_home, list_system_modules};
pub use programs::{JAVA_ARGS_FILE, ProgramDirectoryFinder};
pub use registry::ToolRegistry;

/// Inputs for the standard tool finder chain
#[derive(Debug, Clone)]
pub struct ToolSetup {
    external_tools: PathBuf,
    java_home: Option<PathBuf>,
    directories: Vec<PathBuf>,
    timeout: Option<Duration>,
}

impl ToolSetup {
    pub fn new(external_tools: impl Into<PathBuf>) -> Self {
        Self {
            external_tools: external_tools.into(),
            java_home: None,
            directories: Vec::new(),
            timeout: None,
        }
    }

    pub fn with_java_home(mut self, home: Option<PathBuf>) -> Self {
        self.java_home = home;
        self
    }

    pub fn with_directories(mut self, directories: Vec<PathBuf>) -> Self {
        self.directories = directories;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn java_home(&self) -> Option<&Path> {
        self.java_home.as_deref()
    }

    /// `java` launcher used for external programs
    pub fn java_executable(&self) -> PathBuf {
        match &self.java_home {
            Some(home) => {
                let java = home.join("bin").join("java");
                if cfg!(windows) { java.with_extension("exe") } else { java }
            }
            None => PathBuf::from("java"),
        }
    }

    fn native(&self, finder: NativeToolFinder) -> NativeToolFinder {
        match self.timeout {
            Some(timeout) => finder.with_timeout(timeout),
            None => finder,
        }
    }

    /// Finder chain; earlier finders shadow later ones
    pub fn finder(&self) -> CompositeToolFinder {
        let mut finder = CompositeToolFinder::new()
            .with(builtin_tools())
            .with(ProgramDirectoryFinder::new(&self.external_tools, self.java_executable()));
        if let Some(home) = &self.java_home {
            finder = finder.with(self.native(NativeToolFinder::java_home(home)));
        }
        for directory in &self.directories {
            finder = finder.with(self.native(NativeToolFinder::directory(directory, Vec::<String>::new())));
        }
        let path_tools = if self.java_home.is_none() { JDK_TOOLS } else { &[] };
        finder = finder.with(self.native(NativeToolFinder::path(path_tools.iter().copied())));
        debug!(chain = ?finder.chain(), "Assembled tool finders");
        finder
    }
}

/// Provider running the `jar` tool, used to describe archived modules
pub fn jar_describer(finder: &dyn ToolFinder) -> Option<Arc<dyn ToolProvider>> {
    let jar = finder.find_first("jar")?;
    Some(Arc::new(move |arguments: &[String]| -> ToolOutput { jar.run(arguments) }))
}
