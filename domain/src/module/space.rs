//! Module spaces
//!
//! A space groups the modules of one build stage, typically `main` and `test`.
//! Spaces may name parent spaces whose modules they can see: the `test` space
//! reads modules declared in `main`, so those never count as external there.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;

use super::catalogue::SystemCatalogue;
use super::entities::DeclaredModules;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpace {
    pub name: String,
    pub release: Option<u32>,
    pub modules: DeclaredModules,
    /// `module/main.Class` or just `module` to launch after the build
    pub launcher: Option<String>,
    pub parents: Vec<String>,
    /// Glob patterns of source roots, relative to the project root
    pub patterns: Vec<String>,
}

impl ModuleSpace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            release: None,
            modules: DeclaredModules::new(),
            launcher: None,
            parents: Vec::new(),
            patterns: Vec::new(),
        }
    }

    pub fn with_release(mut self, release: u32) -> Self {
        self.release = Some(release);
        self
    }

    pub fn with_launcher(mut self, launcher: impl Into<String>) -> Self {
        self.launcher = Some(launcher.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    pub fn with_modules(mut self, modules: DeclaredModules) -> Self {
        self.modules = modules;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Launch target, `module[/main.Class]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Launcher {
    pub module: String,
    pub main_class: Option<String>,
}

impl Launcher {
    pub fn parse(launcher: &str) -> Self {
        match launcher.split_once('/') {
            Some((module, class)) => Self {
                module: module.to_string(),
                main_class: Some(class.to_string()),
            },
            None => Self {
                module: launcher.to_string(),
                main_class: None,
            },
        }
    }

    /// Value for `java --module`
    pub fn module_argument(&self) -> String {
        match &self.main_class {
            Some(class) => format!("{}/{class}", self.module),
            None => self.module.clone(),
        }
    }
}

/// Ordered collection of spaces
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSpaces {
    spaces: Vec<ModuleSpace>,
}

impl ModuleSpaces {
    pub fn new(spaces: Vec<ModuleSpace>) -> Self {
        Self { spaces }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleSpace> {
        self.spaces.iter()
    }

    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    pub fn get(&self, name: &str) -> Result<&ModuleSpace, DomainError> {
        self.spaces
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| DomainError::UnknownSpace(name.to_string()))
    }

    /// Parents of `name`, transitively, nearest first. Cycles are cut.
    pub fn ancestors(&self, name: &str) -> Result<Vec<&ModuleSpace>, DomainError> {
        let mut seen = BTreeSet::from([name.to_string()]);
        let mut pending: Vec<String> = self.get(name)?.parents.clone();
        let mut ancestors = Vec::new();
        while !pending.is_empty() {
            let parent = pending.remove(0);
            if !seen.insert(parent.clone()) {
                continue;
            }
            let space = self.get(&parent)?;
            pending.extend(space.parents.iter().cloned());
            ancestors.push(space);
        }
        Ok(ancestors)
    }

    /// Whether some space names `name` as a parent
    pub fn is_parent(&self, name: &str) -> bool {
        self.spaces
            .iter()
            .any(|space| space.parents.iter().any(|parent| parent == name))
    }

    /// Modules of `name` together with the modules of its ancestors
    pub fn visible_modules(&self, name: &str) -> Result<Vec<&DeclaredModules>, DomainError> {
        let mut visible = vec![&self.get(name)?.modules];
        visible.extend(self.ancestors(name)?.into_iter().map(|s| &s.modules));
        Ok(visible)
    }

    /// Requires of the space, minus names declared in it or its parents,
    /// minus platform names. Sorted.
    pub fn required_externals(
        &self,
        name: &str,
        system: &SystemCatalogue,
    ) -> Result<Vec<String>, DomainError> {
        let space = self.get(name)?;
        let declared: BTreeSet<String> = self
            .visible_modules(name)?
            .into_iter()
            .flat_map(DeclaredModules::declared)
            .collect();
        Ok(space
            .modules
            .required()
            .into_iter()
            .filter(|r| !declared.contains(r) && !system.contains(r))
            .collect())
    }
}
