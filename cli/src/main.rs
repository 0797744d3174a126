//! CLI entrypoint for modbuild
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod app;

use anyhow::{Context, Result};
use app::{App, validated};
use clap::Parser;
use modbuild_application::{
    BuildProgressNotifier, InstallToolUseCase, LaunchUseCase, NoProgress, ResolveModulesUseCase,
    ScanProjectUseCase,
};
use modbuild_domain::{ToolCall, ToolIdentifier, WorkflowStep};
use modbuild_infrastructure::{ConfigError, ConfigLoader, FileConfig};
use modbuild_presentation::{
    Cli, Command, ConsoleFormatter, JsonFormatter, OutputFormat, OutputFormatter, ProgressReporter,
    ProjectReport, ToolsReport,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let root = std::fs::canonicalize(&cli.directory)
        .with_context(|| format!("Project directory {} not found", cli.directory.display()))?;

    if cli.command == Command::Config {
        return Ok(show_config(&root));
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(&root, cli.config.as_deref()).map_err(ConfigError::Load)?
    };
    let config = validated(config)?;

    let log_file = writes_outputs(&cli.command)
        .then(|| config.to_workspace(&root))
        .transpose()?
        .map(|workspace| workspace.out().join(workspace.log_file_name()));
    let _guard = init_logging(cli.verbose, log_file.as_deref())?;

    info!(root = %root.display(), "Starting modbuild");

    let detect_system = !matches!(
        cli.command,
        Command::Tools | Command::Run { .. } | Command::Install { .. }
    );
    let app = App::new(root, &config, detect_system)?;

    execute(&cli, &app).await
}

/// Run the command, then write the logbook. A logbook problem is only
/// reported; it never replaces the command's own outcome.
async fn execute(cli: &Cli, app: &App) -> Result<ExitCode> {
    let result = dispatch(cli, app).await;
    if writes_outputs(&cli.command)
        && let Err(e) = app.write_logbook()
    {
        warn!("Logbook not written: {:#}", e);
    }
    result
}

/// Commands that run tools or fetch modules keep a log and a logbook
fn writes_outputs(command: &Command) -> bool {
    !matches!(command, Command::Info | Command::Tools | Command::Config)
}

/// Console logging at the requested verbosity; with `log_file`, also a debug log
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    let Some((dir, name)) = log_file.and_then(|file| Some((file.parent()?, file.file_name()?)))
    else {
        tracing_subscriber::registry().with(console).init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create output directory {}", dir.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
    let file = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(EnvFilter::new("debug"));
    tracing_subscriber::registry().with(console).with(file).init();
    Ok(Some(guard))
}

fn progress(quiet: bool) -> Box<dyn BuildProgressNotifier> {
    if quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    }
}

fn formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Process status for a tool's exit code; out-of-range failures become 1
fn exit_status(code: i32) -> u8 {
    match code {
        0 => 0,
        code => u8::try_from(code).unwrap_or(1).max(1),
    }
}

fn show_config(root: &Path) -> ExitCode {
    print!("{}", ConsoleFormatter::format_config_sources(&ConfigLoader::sources(root)));
    ExitCode::SUCCESS
}

async fn dispatch(cli: &Cli, app: &App) -> Result<ExitCode> {
    match &cli.command {
        Command::Build { launch: true } => build(cli, app, WorkflowStep::Launch).await,
        Command::Build { launch: false } | Command::Test => build(cli, app, WorkflowStep::Test).await,
        Command::Cache => build(cli, app, WorkflowStep::Cache).await,
        Command::Compile => build(cli, app, WorkflowStep::CompileModules).await,
        Command::Launch => {
            let spaces = ScanProjectUseCase::new(Arc::clone(&app.scanner))
                .execute(app.workspace.root(), &app.project.spaces)?;
            let launched = LaunchUseCase::new(Arc::clone(&app.runner)).execute(
                &spaces,
                &app.workspace,
                &app.options,
            )?;
            match launched {
                Some(run) => print!("{}", ConsoleFormatter::format_run(&run)),
                None => println!("No launcher configured in any space"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Resolve { modules } => {
            let use_case = ResolveModulesUseCase::new(Arc::clone(&app.scanner), Arc::clone(&app.fetcher));
            let progress = progress(cli.quiet);
            let resolved = use_case
                .resolve_missing_with_progress(&app.resolve_input(modules), progress.as_ref())
                .await?;
            for location in &resolved.fetched {
                print!("{}", ConsoleFormatter::format_fetched(location));
            }
            if resolved.fetched.is_empty() {
                println!("Nothing to fetch: {}", modules.join(", "));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Info => {
            let use_case = app.build_use_case();
            let input = app.build_input(WorkflowStep::Test);
            let spaces = use_case.scan(&input)?;
            let missing = ResolveModulesUseCase::new(Arc::clone(&app.scanner), Arc::clone(&app.fetcher))
                .compute_missing(&use_case.resolve_input(&input, &spaces))?;
            let project = app.project.clone().with_spaces(spaces);
            let report = ProjectReport::new(&project, &app.workspace, missing);
            println!("{}", formatter(cli.output).project(&report));
            Ok(ExitCode::SUCCESS)
        }
        Command::Tools => {
            let report = ToolsReport::new(app.finder.decompose().iter().map(|f| f.as_ref()));
            println!("{}", formatter(cli.output).tools(&report));
            Ok(ExitCode::SUCCESS)
        }
        Command::Run { tool, args } => {
            let call = ToolCall::try_new(tool.clone())?.with_all(args.iter().cloned());
            let run = app.runner.run(&call)?;
            print!("{}", ConsoleFormatter::format_run(&run));
            Ok(ExitCode::from(exit_status(run.code)))
        }
        Command::Install { tool, uri } => {
            let identifier = ToolIdentifier::parse(tool)?;
            let installed = InstallToolUseCase::new(Arc::clone(&app.fetcher))
                .execute(&identifier, uri, app.workspace.external_tools())
                .await?;
            print!("{}", ConsoleFormatter::format_installed(&installed));
            Ok(ExitCode::SUCCESS)
        }
        Command::Config => Ok(show_config(app.workspace.root())),
    }
}

async fn build(cli: &Cli, app: &App, step: WorkflowStep) -> Result<ExitCode> {
    let use_case = app.build_use_case();
    let progress = progress(cli.quiet);
    let output = use_case
        .execute_with_progress(app.build_input(step), progress.as_ref())
        .await?;
    print!("{}", ConsoleFormatter::format_build(&output));
    Ok(ExitCode::SUCCESS)
}
