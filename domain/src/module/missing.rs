//! Requirement classification and missing-module computation
//!
//! Every required name falls into exactly one category:
//!
//! | Category | Rule | Resolved? |
//! |----------|------|-----------|
//! | System | listed in the [`SystemCatalogue`] | no |
//! | ProjectLocal | declared by any scanned space | no |
//! | External | everything else | yes |

use std::collections::BTreeSet;

use super::catalogue::SystemCatalogue;
use super::entities::DeclaredModules;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleCategory {
    System,
    ProjectLocal,
    External,
}

/// Classifies names against the platform catalogue and a set of declared names
#[derive(Debug, Clone)]
pub struct ModuleClassifier<'a> {
    system: &'a SystemCatalogue,
    declared: BTreeSet<String>,
}

impl<'a> ModuleClassifier<'a> {
    pub fn new<'m>(
        system: &'a SystemCatalogue,
        declared_sets: impl IntoIterator<Item = &'m DeclaredModules>,
    ) -> Self {
        Self {
            system,
            declared: declared_sets
                .into_iter()
                .flat_map(DeclaredModules::declared)
                .collect(),
        }
    }

    pub fn classify(&self, name: &str) -> ModuleCategory {
        if self.system.contains(name) {
            ModuleCategory::System
        } else if self.declared.contains(name) {
            ModuleCategory::ProjectLocal
        } else {
            ModuleCategory::External
        }
    }
}

/// `(∪ required(s) ∪ extra) \ (system ∪ ∪ declared(s))`, sorted.
///
/// Pure: the output depends on the arguments only.
pub fn compute_missing_external_modules<'m>(
    declared_sets: impl IntoIterator<Item = &'m DeclaredModules> + Clone,
    extra_requires: &BTreeSet<String>,
    system: &SystemCatalogue,
) -> Vec<String> {
    let classifier = ModuleClassifier::new(system, declared_sets.clone());
    let required: BTreeSet<String> = declared_sets
        .into_iter()
        .flat_map(DeclaredModules::required)
        .chain(extra_requires.iter().cloned())
        .collect();
    required
        .into_iter()
        .filter(|name| classifier.classify(name) == ModuleCategory::External)
        .collect()
}
