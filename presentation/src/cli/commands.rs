//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for reports (`info`, `tools`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for modbuild
#[derive(Parser, Debug)]
#[command(name = "modbuild")]
#[command(author, version, about = "Build tool for modular Java projects")]
#[command(long_about = r#"
modbuild scans a source tree for module-info.java declarations, fetches the
external modules they require, and drives the JDK tools to build them.

The build runs these steps in order, stopping at the requested one:
1. cache            fetch missing external modules
2. compile-classes  javac per module space (main, then test)
3. compile-modules  jar per module, in parallel
4. test             JUnit console launcher per test module
5. launch           run the configured launcher of the main space

Configuration files are loaded from (in priority order):
1. MODBUILD_* environment variables (MODBUILD_BUILD__OUT=target)
2. --config <path>     Explicit config file
3. ./modbuild.toml     Project-level config
4. ~/.config/modbuild/config.toml   Global config

Example:
  modbuild build
  modbuild -v build --launch
  modbuild resolve org.junit.jupiter
  modbuild run modbuild/tree src 'module-info\.java$'
  modbuild install acme/lint@2.0 https://example.org/lint-2.0-all.jar
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Project root directory
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".", global = true)]
    pub directory: PathBuf,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format for reports
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch externals, compile and test
    Build {
        /// Also run the launcher of the main space
        #[arg(long)]
        launch: bool,
    },

    /// Fetch missing external modules
    Cache,

    /// Fetch externals and compile all spaces
    Compile,

    /// Fetch externals, compile and run the tests
    Test,

    /// Run the launcher of the main space from already built modules
    Launch,

    /// Fetch the named external modules and everything they require
    Resolve {
        #[arg(required = true, value_name = "MODULE")]
        modules: Vec<String>,
    },

    /// Show the project, its spaces and the missing external modules
    Info,

    /// List tool finders and the tools they provide
    Tools,

    /// Run a single tool
    Run {
        /// Tool name, optionally `namespace/name`
        tool: String,

        /// Arguments passed to the tool
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Install a Java program into the external-tools directory
    Install {
        /// Tool identifier, `[namespace/]name[@version]`
        tool: String,

        /// Location of the program's jar file
        uri: String,
    },

    /// Show configuration file locations
    Config,
}
