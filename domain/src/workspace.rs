//! Workspace layout and path templates
//!
//! All generated artifacts live under the workspace's output directory.
//! Where exactly is governed by [`WorkspaceLayout`] templates:
//!
//! | Artifact | Default template |
//! |----------|------------------|
//! | compiled classes | `{out}/{space}/classes/java-{release}` |
//! | module archives | `{out}/{space}/modules` |
//! | test reports | `{out}/{space}/reports/{module}` |
//!
//! Known placeholders: `{root}`, `{out}`, `{external-modules}`, `{space}`,
//! `{module}`, `{release}`. Templates are validated when the workspace is
//! built, so later expansion cannot fail.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;

const PLACEHOLDERS: &[&str] = &["root", "out", "external-modules", "space", "module", "release"];

/// Expand `{name}` placeholders. Unknown names are an error; `{{` and `}}`
/// produce literal braces.
pub fn expand_template(template: &str, values: &BTreeMap<&str, String>) -> Result<String, DomainError> {
    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find(['{', '}']) {
        expanded.push_str(&rest[..open]);
        let tail = &rest[open..];
        if tail.starts_with("{{") || tail.starts_with("}}") {
            expanded.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            expanded.push('}');
            rest = &tail[1..];
            continue;
        }
        let Some(close) = tail.find('}') else {
            expanded.push_str(tail);
            rest = "";
            break;
        };
        let name = &tail[1..close];
        match values.get(name) {
            Some(value) => expanded.push_str(value),
            None => {
                return Err(DomainError::UnknownPlaceholder {
                    template: template.to_string(),
                    placeholder: name.to_string(),
                });
            }
        }
        rest = &tail[close + 1..];
    }
    expanded.push_str(rest);
    Ok(expanded)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceLayout {
    pub classes: String,
    pub modules: String,
    pub reports: String,
}

impl Default for WorkspaceLayout {
    fn default() -> Self {
        Self {
            classes: "{out}/{space}/classes/java-{release}".to_string(),
            modules: "{out}/{space}/modules".to_string(),
            reports: "{out}/{space}/reports/{module}".to_string(),
        }
    }
}

/// Root and output directories plus artifact path templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
    out: PathBuf,
    external_modules: PathBuf,
    external_tools: PathBuf,
    layout: WorkspaceLayout,
}

impl Workspace {
    /// Workspace rooted at `root` with outputs in `root/.modbuild/out`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            out: root.join(".modbuild").join("out"),
            external_modules: root.join(".modbuild").join("external-modules"),
            external_tools: root.join(".modbuild").join("external-tools"),
            root,
            layout: WorkspaceLayout::default(),
        }
    }

    /// Relative paths are taken relative to the root
    pub fn with_out(mut self, out: impl AsRef<Path>) -> Self {
        self.out = self.root.join(out);
        self
    }

    pub fn with_external_modules(mut self, dir: impl AsRef<Path>) -> Self {
        self.external_modules = self.root.join(dir);
        self
    }

    pub fn with_external_tools(mut self, dir: impl AsRef<Path>) -> Self {
        self.external_tools = self.root.join(dir);
        self
    }

    pub fn with_layout(mut self, layout: WorkspaceLayout) -> Result<Self, DomainError> {
        let sample = Self::sample_values();
        for template in [&layout.classes, &layout.modules, &layout.reports] {
            expand_template(template, &sample)?;
        }
        self.layout = layout;
        Ok(self)
    }

    fn sample_values() -> BTreeMap<&'static str, String> {
        PLACEHOLDERS.iter().map(|p| (*p, String::new())).collect()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn out(&self) -> &Path {
        &self.out
    }

    pub fn external_modules(&self) -> &Path {
        &self.external_modules
    }

    pub fn external_module_file(&self, module: &str) -> PathBuf {
        self.external_modules.join(format!("{module}.jar"))
    }

    pub fn external_tools(&self) -> &Path {
        &self.external_tools
    }

    pub fn logbook_file(&self) -> PathBuf {
        self.out.join("logbook.md")
    }

    pub fn log_file_name(&self) -> &'static str {
        "modbuild.log"
    }

    fn values(&self, space: &str, module: &str, release: Option<u32>) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("root", self.root.display().to_string()),
            ("out", self.out.display().to_string()),
            ("external-modules", self.external_modules.display().to_string()),
            ("space", space.to_string()),
            ("module", module.to_string()),
            (
                "release",
                release.map_or_else(|| "current".to_string(), |r| r.to_string()),
            ),
        ])
    }

    fn render(&self, template: &str, space: &str, module: &str, release: Option<u32>) -> PathBuf {
        let values = self.values(space, module, release);
        // Layout templates were validated in `with_layout`.
        match expand_template(template, &values) {
            Ok(path) => PathBuf::from(path),
            Err(_) => self.out.join(space),
        }
    }

    pub fn classes(&self, space: &str, release: Option<u32>) -> PathBuf {
        self.render(&self.layout.classes, space, "", release)
    }

    pub fn modules(&self, space: &str) -> PathBuf {
        self.render(&self.layout.modules, space, "", None)
    }

    pub fn module_archive(&self, space: &str, module: &str) -> PathBuf {
        self.modules(space).join(format!("{module}.jar"))
    }

    pub fn reports(&self, space: &str, module: &str) -> PathBuf {
        self.render(&self.layout.reports, space, module, None)
    }
}
