//! Configuration file loader with multi-source merging

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use super::file_config::FileConfig;

/// Project configuration file names, first match wins
pub const PROJECT_CONFIG_FILES: &[&str] = &["modbuild.toml", ".modbuild.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `MODBUILD_`-prefixed environment variables (`MODBUILD_BUILD__OUT=target`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `modbuild.toml` or `.modbuild.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/modbuild/config.toml`
    /// 5. Default values
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            tracing::debug!(path = %global_path.display(), "Merging global configuration");
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path(root) {
            tracing::debug!(path = %path.display(), "Merging project configuration");
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("MODBUILD_").split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `$XDG_CONFIG_HOME/modbuild/config.toml`, or the platform equivalent
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("modbuild").join("config.toml"))
    }

    /// The project-level config file under `root`, if one exists
    pub fn project_config_path(root: &Path) -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.exists())
    }

    /// Config file locations in priority order, with whether each exists
    pub fn sources(root: &Path) -> Vec<(String, PathBuf, bool)> {
        let mut sources = Vec::new();
        match Self::project_config_path(root) {
            Some(path) => sources.push(("Project".to_string(), path, true)),
            None => sources.push(("Project".to_string(), root.join(PROJECT_CONFIG_FILES[0]), false)),
        }
        if let Some(path) = Self::global_config_path() {
            let exists = path.exists();
            sources.push(("Global".to_string(), path, exists));
        }
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.spaces.len(), 2);
        assert_eq!(config.build.max_resolve_iterations, 32);
    }

    #[test]
    fn test_global_config_path_names_modbuild() {
        if let Some(path) = ConfigLoader::global_config_path() {
            assert!(path.ends_with("modbuild/config.toml"));
        }
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
            jail.create_file(
                "modbuild.toml",
                r#"
                [project]
                name = "jailed"

                [build]
                max_resolve_iterations = 4
                "#,
            )?;
            let config = ConfigLoader::load(jail.directory(), None).map_err(|e| *e)?;
            assert_eq!(config.project.name.as_deref(), Some("jailed"));
            assert_eq!(config.build.max_resolve_iterations, 4);
            assert_eq!(config.spaces.len(), 2);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_and_env_take_precedence() {
        Jail::expect_with(|jail| {
            jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
            jail.create_file("modbuild.toml", "[project]\nname = \"project\"\nversion = \"1\"\n")?;
            jail.create_file("override.toml", "[project]\nname = \"explicit\"\n")?;
            jail.set_env("MODBUILD_BUILD__TEST_SPACE", "checks");

            let explicit = jail.directory().join("override.toml");
            let config = ConfigLoader::load(jail.directory(), Some(&explicit)).map_err(|e| *e)?;
            assert_eq!(config.project.name.as_deref(), Some("explicit"));
            assert_eq!(config.project.version.as_deref(), Some("1"));
            assert_eq!(config.build.test_space, "checks");
            Ok(())
        });
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_global_file_is_lowest_file_priority() {
        Jail::expect_with(|jail| {
            let xdg = jail.directory().join("xdg");
            jail.set_env("XDG_CONFIG_HOME", xdg.display());
            jail.create_dir("xdg/modbuild")?;
            jail.create_file(
                "xdg/modbuild/config.toml",
                "[tools]\njava_home = \"/opt/jdk\"\n[project]\nname = \"global\"\n",
            )?;
            jail.create_file(".modbuild.toml", "[project]\nname = \"local\"\n")?;

            let config = ConfigLoader::load(jail.directory(), None).map_err(|e| *e)?;
            assert_eq!(config.project.name.as_deref(), Some("local"));
            assert_eq!(config.tools.java_home, Some(PathBuf::from("/opt/jdk")));
            Ok(())
        });
    }
}
