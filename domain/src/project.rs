//! Project model: the input of one build invocation

use std::collections::BTreeSet;

use crate::module::{ModuleLookupTable, ModuleSpaces, SystemCatalogue};

/// External module settings
#[derive(Debug, Clone, Default)]
pub struct Externals {
    /// Modules to fetch even if no declaration requires them
    pub requires: BTreeSet<String>,
    pub lookups: ModuleLookupTable,
}

#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub version: Option<String>,
    pub spaces: ModuleSpaces,
    pub externals: Externals,
    pub system: SystemCatalogue,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            spaces: ModuleSpaces::default(),
            externals: Externals::default(),
            system: SystemCatalogue::jdk(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_spaces(mut self, spaces: ModuleSpaces) -> Self {
        self.spaces = spaces;
        self
    }

    pub fn with_externals(mut self, externals: Externals) -> Self {
        self.externals = externals;
        self
    }

    pub fn with_system(mut self, system: SystemCatalogue) -> Self {
        self.system = system;
        self
    }
}
