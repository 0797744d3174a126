//! Compile use case
//!
//! Two steps per module space:
//!
//! - **compile-classes**: one `javac` run in multi-module mode writing
//!   `classes/<module>/...`
//! - **compile-modules**: one `jar` run per module, all in parallel, joined
//!   before returning
//!
//! A test-space module that shares its name with a parent-space module is an
//! in-module test: it is compiled with `--patch-module` against the parent's
//! sources, and its archive also carries the parent's classes of that module.

use std::path::PathBuf;
use std::sync::Arc;

use modbuild_domain::{DomainError, ModuleSpace, ModuleSpaces, RunError, ToolCall, ToolRun, Workspace};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::BuildOptions;

use super::run_tool::ToolRunner;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Cannot create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct CompileUseCase {
    runner: Arc<ToolRunner>,
}

impl CompileUseCase {
    pub fn new(runner: Arc<ToolRunner>) -> Self {
        Self { runner }
    }

    /// `javac` call for `space`, or `None` when the space has no modules
    pub fn javac_call(
        &self,
        space: &ModuleSpace,
        spaces: &ModuleSpaces,
        workspace: &Workspace,
        options: &BuildOptions,
    ) -> Result<Option<ToolCall>, CompileError> {
        if space.is_empty() {
            return Ok(None);
        }
        let release = space.release.or(options.release);
        let ancestors = spaces.ancestors(&space.name)?;

        let mut module_path: Vec<PathBuf> = ancestors
            .iter()
            .map(|parent| workspace.modules(&parent.name))
            .collect();
        module_path.push(workspace.external_modules().to_path_buf());

        let mut call = ToolCall::new("javac")
            .when_some(release, |call, release| call.with_pair("--release", release))
            .with_pair("--module", space.modules.names().join(","))
            .when_some(options.module_version.as_ref(), |call, version| {
                call.with_pair("--module-version", version)
            });

        for module in space.modules.iter() {
            call = call.with_pair(
                "--module-source-path",
                format!("{}={}", module.name, module.content_root.display()),
            );
            let patched = ancestors
                .iter()
                .find_map(|parent| parent.modules.get(&module.name));
            if let Some(main) = patched {
                call = call.with_pair(
                    "--patch-module",
                    format!("{}={}", module.name, main.content_root.display()),
                );
            }
        }

        let call = call
            .with_paths("--module-path", module_path)
            .with("-d")
            .with_path(workspace.classes(&space.name, release));
        Ok(Some(call))
    }

    /// `jar` calls for every module of `space`
    pub fn jar_calls(
        &self,
        space: &ModuleSpace,
        spaces: &ModuleSpaces,
        workspace: &Workspace,
        options: &BuildOptions,
    ) -> Result<Vec<ToolCall>, CompileError> {
        let release = space.release.or(options.release);
        let classes = workspace.classes(&space.name, release);
        let ancestors = spaces.ancestors(&space.name)?;
        let calls = space
            .modules
            .iter()
            .map(|module| {
                let patched = ancestors.iter().find(|parent| parent.modules.contains(&module.name));
                ToolCall::new("jar")
                    .with("--create")
                    .with("--file")
                    .with_path(workspace.module_archive(&space.name, &module.name))
                    .when_some(options.module_version.as_ref(), |call, version| {
                        call.with_pair("--module-version", version)
                    })
                    .when_some(module.main_class.as_ref(), |call, class| {
                        call.with_pair("--main-class", class)
                    })
                    .with("-C")
                    .with_path(classes.join(&module.name))
                    .with(".")
                    .when_some(patched, |call, parent| {
                        let release = parent.release.or(options.release);
                        call.with("-C")
                            .with_path(workspace.classes(&parent.name, release).join(&module.name))
                            .with(".")
                    })
            })
            .collect();
        Ok(calls)
    }

    /// Compile the classes of one space; `None` when there is nothing to compile
    pub fn compile_classes(
        &self,
        space: &ModuleSpace,
        spaces: &ModuleSpaces,
        workspace: &Workspace,
        options: &BuildOptions,
    ) -> Result<Option<ToolRun>, CompileError> {
        let Some(call) = self.javac_call(space, spaces, workspace, options)? else {
            debug!(space = %space.name, "No modules to compile");
            return Ok(None);
        };
        info!(space = %space.name, "Compiling {} module(s)", space.modules.len());
        Ok(Some(self.runner.run_successfully(&call)?))
    }

    /// Archive all modules of one space in parallel
    pub async fn compile_modules(
        &self,
        space: &ModuleSpace,
        spaces: &ModuleSpaces,
        workspace: &Workspace,
        options: &BuildOptions,
    ) -> Result<Vec<ToolRun>, CompileError> {
        if space.is_empty() {
            return Ok(Vec::new());
        }
        let modules = workspace.modules(&space.name);
        std::fs::create_dir_all(&modules).map_err(|source| CompileError::Io {
            path: modules.clone(),
            source,
        })?;
        info!(space = %space.name, "Archiving {} module(s)", space.modules.len());
        let calls = self.jar_calls(space, spaces, workspace, options)?;
        Ok(self.runner.run_all_parallel(calls).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modbuild_domain::{DeclaredModule, DeclaredModules, Logbook, Tool, ToolList, ToolOutput};

    fn runner(logbook: Arc<Logbook>) -> Arc<ToolRunner> {
        let ok = |_: &[String]| ToolOutput::success("");
        let finder = ToolList::new("fake jdk")
            .with(Tool::of("javac", ok).unwrap())
            .with(Tool::of("jar", ok).unwrap());
        Arc::new(ToolRunner::new(Arc::new(finder), logbook))
    }

    fn spaces() -> ModuleSpaces {
        let main: DeclaredModules = [
            DeclaredModule::new("foo", "/p/foo/main/java/module-info.java")
                .with_main_class("foo.Main"),
            DeclaredModule::new("bar", "/p/bar/main/java/module-info.java"),
        ]
        .into_iter()
        .collect();
        let test: DeclaredModules = [DeclaredModule::new("foo", "/p/foo/test/java/module-info.java")]
            .into_iter()
            .collect();
        ModuleSpaces::new(vec![
            ModuleSpace::new("main").with_release(21).with_modules(main),
            ModuleSpace::new("test").with_parent("main").with_modules(test),
        ])
    }

    #[test]
    fn test_javac_call_shape() {
        let use_case = CompileUseCase::new(runner(Arc::new(Logbook::new())));
        let spaces = spaces();
        let workspace = Workspace::new("/p");
        let options = BuildOptions::default().with_module_version("1.0");
        let call = use_case
            .javac_call(spaces.get("main").unwrap(), &spaces, &workspace, &options)
            .unwrap()
            .unwrap();
        let args = call.arguments();
        assert_eq!(&args[..4], &["--release", "21", "--module", "bar,foo"]);
        assert!(call.to_string().contains("--module-version 1.0"));
        assert!(call.to_string().contains("--module-source-path foo=/p/foo/main/java"));
        assert!(!call.to_string().contains("--patch-module"));
        let d = call.position("-d").unwrap();
        assert_eq!(args[d + 1], "/p/.modbuild/out/main/classes/java-21");
    }

    #[test]
    fn test_in_module_test_is_patched() {
        let use_case = CompileUseCase::new(runner(Arc::new(Logbook::new())));
        let spaces = spaces();
        let workspace = Workspace::new("/p");
        let call = use_case
            .javac_call(spaces.get("test").unwrap(), &spaces, &workspace, &BuildOptions::default())
            .unwrap()
            .unwrap();
        let line = call.to_string();
        assert!(line.contains("--patch-module foo=/p/foo/main/java"), "{line}");
        assert!(!line.contains("--release"), "{line}");
        let mp = call.position("--module-path").unwrap();
        assert!(call.arguments()[mp + 1].starts_with("/p/.modbuild/out/main/modules"));
    }

    #[test]
    fn test_empty_space_is_skipped() {
        let logbook = Arc::new(Logbook::new());
        let use_case = CompileUseCase::new(runner(Arc::clone(&logbook)));
        let spaces = ModuleSpaces::new(vec![ModuleSpace::new("main")]);
        let run = use_case
            .compile_classes(
                spaces.get("main").unwrap(),
                &spaces,
                &Workspace::new("/p"),
                &BuildOptions::default(),
            )
            .unwrap();
        assert!(run.is_none());
        assert!(logbook.is_empty());
    }

    #[test]
    fn test_jar_calls_carry_main_class() {
        let use_case = CompileUseCase::new(runner(Arc::new(Logbook::new())));
        let spaces = spaces();
        let calls = use_case
            .jar_calls(
                spaces.get("main").unwrap(),
                &spaces,
                &Workspace::new("/p"),
                &BuildOptions::default(),
            )
            .unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0].to_string(),
            "jar --create --file /p/.modbuild/out/main/modules/bar.jar -C /p/.modbuild/out/main/classes/java-21/bar ."
        );
        assert!(calls[1].to_string().contains("--main-class foo.Main"));
    }

    #[test]
    fn test_in_module_test_archive_includes_main_classes() {
        let use_case = CompileUseCase::new(runner(Arc::new(Logbook::new())));
        let spaces = spaces();
        let calls = use_case
            .jar_calls(
                spaces.get("test").unwrap(),
                &spaces,
                &Workspace::new("/p"),
                &BuildOptions::default(),
            )
            .unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].to_string(),
            "jar --create --file /p/.modbuild/out/test/modules/foo.jar \
             -C /p/.modbuild/out/test/classes/java-current/foo . \
             -C /p/.modbuild/out/main/classes/java-21/foo ."
        );
    }

    #[tokio::test]
    async fn test_compile_modules_runs_every_archive() {
        let dir = tempfile::tempdir().unwrap();
        let logbook = Arc::new(Logbook::new());
        let use_case = CompileUseCase::new(runner(Arc::clone(&logbook)));
        let spaces = spaces();
        let workspace = Workspace::new(dir.path());
        let runs = use_case
            .compile_modules(
                spaces.get("main").unwrap(),
                &spaces,
                &workspace,
                &BuildOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(runs.len(), 2);
        assert!(workspace.modules("main").is_dir());
        assert!(logbook.runs().iter().all(|r| r.tool_name == "jar"));
    }
}
