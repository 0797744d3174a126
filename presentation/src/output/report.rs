//! Report data shown by `info` and `tools`
//!
//! Plain serializable snapshots, so the same data renders as text or JSON.

use std::path::{Path, PathBuf};

use modbuild_domain::{
    DeclaredModule, ModuleSpace, ModuleSpaces, Project, SystemCatalogue, Tool, ToolFinder,
    Workspace,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleReport {
    pub name: String,
    pub content_root: PathBuf,
    pub requires: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_class: Option<String>,
}

impl ModuleReport {
    fn new(module: &DeclaredModule, root: &Path) -> Self {
        Self {
            name: module.name.clone(),
            content_root: relative(&module.content_root, root),
            requires: module.requires.iter().cloned().collect(),
            main_class: module.main_class.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpaceReport {
    pub name: String,
    pub patterns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launcher: Option<String>,
    pub parents: Vec<String>,
    pub modules: Vec<ModuleReport>,
    /// Requires not declared here or in a parent, and not platform modules
    pub externals: Vec<String>,
}

impl SpaceReport {
    fn new(space: &ModuleSpace, spaces: &ModuleSpaces, system: &SystemCatalogue, root: &Path) -> Self {
        Self {
            name: space.name.clone(),
            patterns: space.patterns.clone(),
            release: space.release,
            launcher: space.launcher.clone(),
            parents: space.parents.clone(),
            modules: space.modules.iter().map(|m| ModuleReport::new(m, root)).collect(),
            externals: spaces
                .required_externals(&space.name, system)
                .unwrap_or_default(),
        }
    }
}

/// Everything `modbuild info` prints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub root: PathBuf,
    pub out: PathBuf,
    pub external_modules: PathBuf,
    pub spaces: Vec<SpaceReport>,
    /// Extra modules requested by configuration
    pub requires: Vec<String>,
    /// External modules not yet present
    pub missing: Vec<String>,
    /// Lookup strategies, in query order
    pub lookups: Vec<String>,
    pub system_modules: usize,
}

impl ProjectReport {
    /// `project.spaces` must already hold the scanned modules
    pub fn new(project: &Project, workspace: &Workspace, missing: Vec<String>) -> Self {
        let root = workspace.root();
        Self {
            name: project.name.clone(),
            version: project.version.clone(),
            root: root.to_path_buf(),
            out: relative(workspace.out(), root),
            external_modules: relative(workspace.external_modules(), root),
            spaces: project
                .spaces
                .iter()
                .map(|space| SpaceReport::new(space, &project.spaces, &project.system, root))
                .collect(),
            requires: project.externals.requires.iter().cloned().collect(),
            missing,
            lookups: project.externals.lookups.descriptions(),
            system_modules: project.system.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolEntry {
    pub identifier: String,
    pub name: String,
    /// Another tool with the same name is found first
    pub shadowed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinderReport {
    pub description: String,
    pub tools: Vec<ToolEntry>,
}

/// Everything `modbuild tools` prints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolsReport {
    pub finders: Vec<FinderReport>,
}

impl ToolsReport {
    /// One entry per finder, in query order
    pub fn new<'a>(finders: impl IntoIterator<Item = &'a dyn ToolFinder>) -> Self {
        let mut seen = std::collections::BTreeSet::new();
        let finders = finders
            .into_iter()
            .map(|finder| {
                let mut tools: Vec<Tool> = finder.find_all();
                tools.sort_by_key(|tool| tool.identifier().to_string());
                FinderReport {
                    description: finder.description(),
                    tools: tools
                        .iter()
                        .map(|tool| ToolEntry {
                            identifier: tool.identifier().to_string(),
                            name: tool.name().to_string(),
                            shadowed: !seen.insert(tool.name().to_string()),
                        })
                        .collect(),
                }
            })
            .collect();
        Self { finders }
    }

    pub fn tool_count(&self) -> usize {
        self.finders.iter().map(|f| f.tools.len()).sum()
    }
}

fn relative(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use modbuild_domain::{DeclaredModules, ModuleSpaces, ToolList, ToolOutput};

    fn tool(id: &str) -> Tool {
        Tool::of(id, |_: &[String]| ToolOutput::success("")).unwrap()
    }

    #[test]
    fn test_project_report_uses_relative_paths() {
        let workspace = Workspace::new("/work/demo");
        let module = DeclaredModule::new("foo", "/work/demo/foo/main/java/module-info.java")
            .with_requires(["bar"]);
        let space = ModuleSpace::new("main")
            .with_pattern("*/main/java")
            .with_modules(DeclaredModules::new().with(module));
        let project = Project::new("demo").with_spaces(ModuleSpaces::new(vec![space]));

        let report = ProjectReport::new(&project, &workspace, vec!["bar".to_string()]);
        assert_eq!(report.name, "demo");
        assert_eq!(report.out, PathBuf::from(".modbuild/out"));
        let foo = &report.spaces[0].modules[0];
        assert_eq!(foo.content_root, PathBuf::from("foo/main/java"));
        assert_eq!(foo.requires, vec!["bar"]);
        assert_eq!(report.missing, vec!["bar"]);
        assert_eq!(report.spaces[0].externals, vec!["bar"]);
    }

    #[test]
    fn test_space_externals_exclude_parent_modules() {
        let workspace = Workspace::new("/p");
        let main = DeclaredModules::new()
            .with(DeclaredModule::new("foo", "/p/foo/module-info.java").with_requires(["java.sql"]))
            .with(DeclaredModule::new("bar", "/p/bar/module-info.java").with_requires(["baz.two"]));
        let test = DeclaredModules::new().with(
            DeclaredModule::new("test", "/p/test/module-info.java")
                .with_requires(["foo", "bar", "org.junit.jupiter"]),
        );
        let project = Project::new("demo").with_spaces(ModuleSpaces::new(vec![
            ModuleSpace::new("main").with_modules(main),
            ModuleSpace::new("test").with_parent("main").with_modules(test),
        ]));

        let report = ProjectReport::new(&project, &workspace, Vec::new());
        assert_eq!(report.spaces[0].externals, vec!["baz.two"]);
        assert_eq!(report.spaces[1].externals, vec!["org.junit.jupiter"]);
    }

    #[test]
    fn test_tools_report_marks_shadowed_tools() {
        let first = ToolList::new("first").with(tool("modbuild/tree"));
        let second = ToolList::new("second").with(tool("tree")).with(tool("jar"));
        let report = ToolsReport::new([&first as &dyn ToolFinder, &second as &dyn ToolFinder]);

        assert_eq!(report.tool_count(), 3);
        assert!(!report.finders[0].tools[0].shadowed);
        let second_tools = &report.finders[1].tools;
        assert_eq!(second_tools[0].identifier, "jar");
        assert!(!second_tools[0].shadowed);
        assert_eq!(second_tools[1].identifier, "tree");
        assert!(second_tools[1].shadowed);
    }
}
