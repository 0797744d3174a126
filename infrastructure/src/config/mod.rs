//! Configuration file loading for modbuild
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MODBUILD_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `modbuild.toml` or `.modbuild.toml`
//! 4. Global: `$XDG_CONFIG_HOME/modbuild/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigError, ConfigValidationError, FileBuildConfig, FileConfig, FileExternalsConfig,
    FileMavenConfig, FilePrefixConfig, FileProjectConfig, FileSpaceConfig, FileToolsConfig,
    FileTweaksConfig, default_spaces,
};
pub use loader::{ConfigLoader, PROJECT_CONFIG_FILES};
