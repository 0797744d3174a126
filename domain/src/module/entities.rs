//! Module domain entities

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::declaration::ModuleDeclaration;

/// Modifier attached to a `requires` directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequiresModifier {
    Transitive,
    Static,
    Synthetic,
    Mandated,
}

impl RequiresModifier {
    /// A requirement needs resolution unless it is `static`, `synthetic`,
    /// or `mandated` without an explicit `transitive`.
    pub fn needs_resolution(modifiers: &BTreeSet<RequiresModifier>) -> bool {
        if modifiers.contains(&Self::Static) || modifiers.contains(&Self::Synthetic) {
            return false;
        }
        !(modifiers.contains(&Self::Mandated) && !modifiers.contains(&Self::Transitive))
    }
}

/// A module found by scanning a source tree or the external modules directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredModule {
    pub name: String,
    /// Directory holding the module's sources (parent of `module-info.java`)
    pub content_root: PathBuf,
    pub info_file: PathBuf,
    /// Required names that need resolution
    pub requires: BTreeSet<String>,
    /// Fully qualified main class, if one was detected
    pub main_class: Option<String>,
}

impl DeclaredModule {
    pub fn new(name: impl Into<String>, info_file: impl Into<PathBuf>) -> Self {
        let info_file = info_file.into();
        let content_root = info_file.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            name: name.into(),
            content_root,
            info_file,
            requires: BTreeSet::new(),
            main_class: None,
        }
    }

    pub fn from_declaration(declaration: &ModuleDeclaration, info_file: impl Into<PathBuf>) -> Self {
        let mut module = Self::new(declaration.name.clone(), info_file);
        module.requires = declaration.required_names().map(str::to_string).collect();
        module
    }

    pub fn with_requires<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_main_class(mut self, main_class: impl Into<String>) -> Self {
        self.main_class = Some(main_class.into());
        self
    }
}

/// Name-sorted set of declared modules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeclaredModules {
    modules: BTreeMap<String, DeclaredModule>,
}

impl DeclaredModules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a module, returning the previous one with the same name
    pub fn insert(&mut self, module: DeclaredModule) -> Option<DeclaredModule> {
        self.modules.insert(module.name.clone(), module)
    }

    pub fn with(mut self, module: DeclaredModule) -> Self {
        self.insert(module);
        self
    }

    pub fn get(&self, name: &str) -> Option<&DeclaredModule> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeclaredModule> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }

    pub fn declared(&self) -> BTreeSet<String> {
        self.modules.keys().cloned().collect()
    }

    /// Union of all modules' requires
    pub fn required(&self) -> BTreeSet<String> {
        self.modules
            .values()
            .flat_map(|m| m.requires.iter().cloned())
            .collect()
    }
}

impl FromIterator<DeclaredModule> for DeclaredModules {
    fn from_iter<T: IntoIterator<Item = DeclaredModule>>(iter: T) -> Self {
        let mut modules = Self::new();
        for module in iter {
            modules.insert(module);
        }
        modules
    }
}

impl<'a> IntoIterator for &'a DeclaredModules {
    type Item = &'a DeclaredModule;
    type IntoIter = std::collections::btree_map::Values<'a, String, DeclaredModule>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RequiresModifier::*;

    fn set(modifiers: &[RequiresModifier]) -> BTreeSet<RequiresModifier> {
        modifiers.iter().copied().collect()
    }

    #[test]
    fn test_resolution_filter() {
        assert!(RequiresModifier::needs_resolution(&set(&[])));
        assert!(RequiresModifier::needs_resolution(&set(&[Transitive])));
        assert!(!RequiresModifier::needs_resolution(&set(&[Static])));
        assert!(!RequiresModifier::needs_resolution(&set(&[Static, Transitive])));
        assert!(!RequiresModifier::needs_resolution(&set(&[Synthetic])));
        assert!(!RequiresModifier::needs_resolution(&set(&[Mandated])));
        assert!(RequiresModifier::needs_resolution(&set(&[Mandated, Transitive])));
    }

    #[test]
    fn test_declared_and_required_sets() {
        let modules: DeclaredModules = [
            DeclaredModule::new("foo", "src/foo/module-info.java").with_requires(["bar", "baz"]),
            DeclaredModule::new("bar", "src/bar/module-info.java").with_requires(["baz"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(modules.names(), vec!["bar", "foo"]);
        assert_eq!(
            modules.required().into_iter().collect::<Vec<_>>(),
            vec!["bar", "baz"]
        );
        assert!(modules.contains("foo"));
        assert_eq!(
            modules.get("foo").unwrap().content_root,
            PathBuf::from("src/foo")
        );
    }

    #[test]
    fn test_from_declaration_filters_static() {
        let declaration =
            ModuleDeclaration::parse("module foo { requires static a; requires b; }").unwrap();
        let module = DeclaredModule::from_declaration(&declaration, "foo/module-info.java");
        assert_eq!(module.requires.into_iter().collect::<Vec<_>>(), vec!["b"]);
    }
}
