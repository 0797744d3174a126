//! Launch use case
//!
//! Runs the launcher of the first space that declares one:
//! `java --module-path <modules>:<externals> --module <module>[/<class>] ARGS...`

use std::sync::Arc;

use modbuild_domain::{DomainError, Launcher, ModuleSpaces, RunError, ToolCall, ToolRun, Workspace};
use thiserror::Error;
use tracing::info;

use crate::config::BuildOptions;

use super::run_tool::ToolRunner;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub struct LaunchUseCase {
    runner: Arc<ToolRunner>,
}

impl LaunchUseCase {
    pub fn new(runner: Arc<ToolRunner>) -> Self {
        Self { runner }
    }

    /// The launch call, or `None` when no space declares a launcher
    pub fn launch_call(
        &self,
        spaces: &ModuleSpaces,
        workspace: &Workspace,
        options: &BuildOptions,
    ) -> Result<Option<ToolCall>, LaunchError> {
        let Some(space) = spaces.iter().find(|s| s.launcher.is_some()) else {
            return Ok(None);
        };
        let launcher = Launcher::parse(space.launcher.as_deref().unwrap_or_default());

        let mut module_path = vec![workspace.modules(&space.name)];
        module_path.extend(
            spaces
                .ancestors(&space.name)?
                .iter()
                .map(|parent| workspace.modules(&parent.name)),
        );
        module_path.push(workspace.external_modules().to_path_buf());

        Ok(Some(
            ToolCall::new("java")
                .with_paths("--module-path", module_path)
                .with_pair("--module", launcher.module_argument())
                .with_all(options.launch_arguments.iter().cloned()),
        ))
    }

    pub fn execute(
        &self,
        spaces: &ModuleSpaces,
        workspace: &Workspace,
        options: &BuildOptions,
    ) -> Result<Option<ToolRun>, LaunchError> {
        let Some(call) = self.launch_call(spaces, workspace, options)? else {
            return Ok(None);
        };
        info!("Launching {}", call);
        Ok(Some(self.runner.run_successfully(&call)?))
    }
}
