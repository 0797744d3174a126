//! Raw TOML configuration data types
//!
//! These structs mirror `modbuild.toml` exactly. They are deserialized as-is,
//! checked by [`FileConfig::validate`], and only then turned into the domain
//! [`Project`], [`Workspace`] and application [`BuildOptions`].

mod build;
mod externals;
mod project;
mod tools;
mod tweaks;

pub use build::FileBuildConfig;
pub use externals::{FileExternalsConfig, FileMavenConfig, FilePrefixConfig};
pub use project::{FileProjectConfig, FileSpaceConfig, default_spaces};
pub use tools::FileToolsConfig;
pub use tweaks::FileTweaksConfig;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use modbuild_application::BuildOptions;
use modbuild_domain::{
    CuratedIndexLookup, DomainError, Externals, MappedModuleLookup, MavenCoordinates,
    MavenModuleLookup, ModuleLookupTable, ModuleSpace, ModuleSpaces, PrefixModuleLookup, Project,
    SystemCatalogue, Workspace, is_valid_module_name,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single problem found by [`FileConfig::validate`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("spaces: a space has an empty name")]
    EmptySpaceName,

    #[error("spaces: '{0}' is defined more than once")]
    DuplicateSpace(String),

    #[error("spaces.{space}: unknown parent space '{parent}'")]
    UnknownParent { space: String, parent: String },

    #[error("spaces.{0}: no source patterns")]
    NoPatterns(String),

    #[error("spaces.{space}: invalid launcher '{launcher}', expected module[/main.Class]")]
    InvalidLauncher { space: String, launcher: String },

    #[error("{field}: invalid module name '{name}'")]
    InvalidModuleName { field: String, name: String },

    #[error("externals.maven: invalid coordinates '{coordinates}' for module '{module}'")]
    InvalidCoordinates { module: String, coordinates: String },

    #[error("externals.prefixes: prefix must not be empty")]
    EmptyPrefix,

    #[error("build.max_resolve_iterations cannot be 0")]
    ZeroIterations,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Invalid(Vec<ConfigValidationError>),

    #[error("Cannot read module index {}: {source}", path.display())]
    Index {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub project: FileProjectConfig,
    pub spaces: Vec<FileSpaceConfig>,
    pub externals: FileExternalsConfig,
    pub tools: FileToolsConfig,
    pub tweaks: FileTweaksConfig,
    pub build: FileBuildConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            project: FileProjectConfig::default(),
            spaces: default_spaces(),
            externals: FileExternalsConfig::default(),
            tools: FileToolsConfig::default(),
            tweaks: FileTweaksConfig::default(),
            build: FileBuildConfig::default(),
        }
    }
}

fn valid_launcher(launcher: &str) -> bool {
    match launcher.split_once('/') {
        Some((module, class)) => is_valid_module_name(module) && is_valid_module_name(class),
        None => is_valid_module_name(launcher),
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        let names: BTreeSet<&str> = self.spaces.iter().map(|s| s.name.as_str()).collect();
        let mut seen = BTreeSet::new();
        for space in &self.spaces {
            if space.name.trim().is_empty() {
                issues.push(ConfigValidationError::EmptySpaceName);
                continue;
            }
            if !seen.insert(space.name.as_str()) {
                issues.push(ConfigValidationError::DuplicateSpace(space.name.clone()));
            }
            if space.patterns.is_empty() {
                issues.push(ConfigValidationError::NoPatterns(space.name.clone()));
            }
            for parent in &space.parents {
                if !names.contains(parent.as_str()) {
                    issues.push(ConfigValidationError::UnknownParent {
                        space: space.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
            if let Some(launcher) = &space.launcher
                && !valid_launcher(launcher)
            {
                issues.push(ConfigValidationError::InvalidLauncher {
                    space: space.name.clone(),
                    launcher: launcher.clone(),
                });
            }
        }

        for name in &self.externals.requires {
            if !is_valid_module_name(name) {
                issues.push(ConfigValidationError::InvalidModuleName {
                    field: "externals.requires".to_string(),
                    name: name.clone(),
                });
            }
        }
        for maven in &self.externals.maven {
            for (module, coordinates) in &maven.modules {
                if MavenCoordinates::parse(coordinates).is_none() {
                    issues.push(ConfigValidationError::InvalidCoordinates {
                        module: module.clone(),
                        coordinates: coordinates.clone(),
                    });
                }
            }
        }
        if self
            .externals
            .prefixes
            .iter()
            .any(|p| p.prefix.trim_end_matches('*').trim().is_empty())
        {
            issues.push(ConfigValidationError::EmptyPrefix);
        }

        if !is_valid_module_name(&self.build.junit_module) {
            issues.push(ConfigValidationError::InvalidModuleName {
                field: "build.junit_module".to_string(),
                name: self.build.junit_module.clone(),
            });
        }
        if self.build.max_resolve_iterations == 0 {
            issues.push(ConfigValidationError::ZeroIterations);
        }

        issues
    }

    /// Configured name, or the root directory's name
    pub fn project_name(&self, root: &Path) -> String {
        self.project
            .name
            .clone()
            .or_else(|| {
                root.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "unnamed".to_string())
    }

    /// Spaces in declaration order, without modules
    pub fn to_spaces(&self) -> ModuleSpaces {
        ModuleSpaces::new(
            self.spaces
                .iter()
                .map(|file| ModuleSpace {
                    name: file.name.clone(),
                    release: file.release,
                    modules: Default::default(),
                    launcher: file.launcher.clone(),
                    parents: file.parents.clone(),
                    patterns: file.patterns.clone(),
                })
                .collect(),
        )
    }

    /// Lookup chain: direct map, Maven entries, prefixes, then curated indexes
    pub fn to_lookup_table(&self, root: &Path) -> Result<ModuleLookupTable, ConfigError> {
        let externals = &self.externals;
        let mut table = ModuleLookupTable::new();

        if !externals.modules.is_empty() {
            let direct = externals
                .modules
                .iter()
                .fold(MappedModuleLookup::new("configured modules"), |map, (key, uri)| {
                    map.with(key.clone(), uri.clone())
                });
            table = table.with(direct);
        }

        for maven in &externals.maven {
            let repository = maven.repository.as_deref().unwrap_or(&externals.repository);
            let lookup = maven
                .modules
                .iter()
                .fold(MavenModuleLookup::new(repository), |lookup, (key, coordinates)| {
                    lookup.with(key.clone(), coordinates.clone())
                });
            table = table.with(lookup);
        }

        for prefix in &externals.prefixes {
            let repository = prefix.repository.as_deref().unwrap_or(&externals.repository);
            table = table.with(
                PrefixModuleLookup::new(repository)
                    .with(prefix.prefix.clone(), prefix.coordinates.clone()),
            );
        }

        for index in &externals.indexes {
            let path = root.join(index);
            let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Index {
                path: path.clone(),
                source,
            })?;
            table = table.with(CuratedIndexLookup::parse(&path.display().to_string(), &text));
        }

        Ok(table)
    }

    pub fn to_project(&self, root: &Path, system: SystemCatalogue) -> Result<Project, ConfigError> {
        let mut project = Project::new(self.project_name(root))
            .with_spaces(self.to_spaces())
            .with_externals(Externals {
                requires: self.externals.requires.iter().cloned().collect(),
                lookups: self.to_lookup_table(root)?,
            })
            .with_system(system);
        if let Some(version) = &self.project.version {
            project = project.with_version(version.clone());
        }
        Ok(project)
    }

    pub fn to_workspace(&self, root: &Path) -> Result<Workspace, ConfigError> {
        let mut workspace = Workspace::new(root);
        if let Some(out) = &self.build.out {
            workspace = workspace.with_out(out);
        }
        if let Some(dir) = &self.build.external_modules {
            workspace = workspace.with_external_modules(dir);
        }
        if let Some(dir) = &self.build.external_tools {
            workspace = workspace.with_external_tools(dir);
        }
        Ok(workspace.with_layout(self.build.layout.clone())?)
    }

    pub fn to_build_options(&self) -> BuildOptions {
        let build = &self.build;
        let mut options = BuildOptions::default()
            .with_encoding(self.tweaks.encoding())
            .with_max_resolve_iterations(build.max_resolve_iterations)
            .with_test_space(build.test_space.clone())
            .with_junit_module(build.junit_module.clone())
            .with_launch_arguments(build.launch_arguments.clone());
        options.test_arguments = build.test_arguments.clone();
        if let Some(release) = build.release {
            options = options.with_release(release);
        }
        if let Some(version) = &self.project.version {
            options = options.with_module_version(version.clone());
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modbuild_domain::Platform;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[project]
name = "demo"
version = "1.2"

[[spaces]]
name = "main"
patterns = ["src/*/main/java"]
release = 21
launcher = "com.example.app/com.example.app.Main"

[[spaces]]
name = "test"
patterns = ["src/*/test/java"]
parents = ["main"]

[externals]
requires = ["org.junit.platform.console"]

[externals.modules]
"org.example.lib" = "https://example.org/lib-1.0.jar"

[[externals.maven]]
modules = { "org.slf4j" = "org.slf4j:slf4j-api:2.0.13" }

[tweaks]
javac = ["-Xlint"]

[build]
out = "target"
max_resolve_iterations = 5
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_empty(), "{:?}", config.validate());
        assert_eq!(config.project.name.as_deref(), Some("demo"));
        assert_eq!(config.spaces.len(), 2);
        assert_eq!(config.spaces[0].release, Some(21));
        assert_eq!(config.tweaks.encoding, "UTF-8");
        assert_eq!(config.build.max_resolve_iterations, 5);

        let options = config.to_build_options();
        assert_eq!(options.module_version.as_deref(), Some("1.2"));
        assert_eq!(options.max_resolve_iterations, 5);

        let workspace = config.to_workspace(Path::new("/p")).unwrap();
        assert_eq!(workspace.out(), Path::new("/p/target"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: FileConfig = toml::from_str("[project]\nname = \"x\"\n").unwrap();
        assert_eq!(config.spaces, default_spaces());
        assert_eq!(config.build.junit_module, "org.junit.platform.console");
        assert_eq!(config.to_build_options().encoding.as_deref(), Some("UTF-8"));
    }

    #[test]
    fn test_validate_reports_all_issues() {
        let toml_str = r#"
[[spaces]]
name = "main"
patterns = []
launcher = "not a module"

[[spaces]]
name = "main"
patterns = ["*"]
parents = ["ghost"]

[externals]
requires = ["bad-name"]

[[externals.maven]]
modules = { "x" = "only:two" }

[build]
max_resolve_iterations = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert!(issues.contains(&ConfigValidationError::NoPatterns("main".to_string())));
        assert!(issues.contains(&ConfigValidationError::DuplicateSpace("main".to_string())));
        assert!(issues.contains(&ConfigValidationError::UnknownParent {
            space: "main".to_string(),
            parent: "ghost".to_string(),
        }));
        assert!(issues.iter().any(|i| matches!(i, ConfigValidationError::InvalidLauncher { .. })));
        assert!(issues.iter().any(|i| matches!(i, ConfigValidationError::InvalidModuleName { .. })));
        assert!(issues.iter().any(|i| matches!(i, ConfigValidationError::InvalidCoordinates { .. })));
        assert!(issues.contains(&ConfigValidationError::ZeroIterations));
    }

    #[test]
    fn test_project_conversion_and_lookup_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("modules.properties"),
            "@description=curated\nbaz=https://example.org/baz.jar\nfoo=https://example.org/other.jar\n",
        )
        .unwrap();
        let config: FileConfig = toml::from_str(
            r#"
[externals]
indexes = ["modules.properties"]
[externals.modules]
foo = "file:///mods/foo.jar"
[[externals.prefixes]]
prefix = "org.junit.jupiter*"
coordinates = "org.junit.jupiter:junit-jupiter{suffix}:5.10.2"
"#,
        )
        .unwrap();

        let project = config.to_project(dir.path(), SystemCatalogue::jdk()).unwrap();
        let lookups = &project.externals.lookups;
        assert_eq!(lookups.len(), 3);
        assert_eq!(lookups.lookup("foo", &Platform::ANY).unwrap().uri, "file:///mods/foo.jar");
        assert_eq!(lookups.lookup("baz", &Platform::ANY).unwrap().lookup, "curated");
        assert!(
            lookups
                .lookup("org.junit.jupiter.api", &Platform::ANY)
                .unwrap()
                .uri
                .ends_with("junit-jupiter-api-5.10.2.jar")
        );
        assert_eq!(project.spaces.len(), 2);
        assert_eq!(project.spaces.get("test").unwrap().parents, vec!["main"]);
    }

    #[test]
    fn test_missing_index_file() {
        let config: FileConfig =
            toml::from_str("[externals]\nindexes = [\"missing.properties\"]\n").unwrap();
        let error = config.to_lookup_table(Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(error, ConfigError::Index { .. }));
    }

    #[test]
    fn test_project_name_falls_back_to_directory() {
        let config = FileConfig::default();
        assert_eq!(config.project_name(Path::new("/work/hello")), "hello");
    }
}
