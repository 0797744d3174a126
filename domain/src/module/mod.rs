//! Module domain
//!
//! Pure rules for modular source trees:
//!
//! - [`declaration`] parses `module-info.java` into names and `requires`
//! - [`entities`] holds scanned [`DeclaredModule`]s and the resolution filter
//! - [`space`] groups modules into [`ModuleSpace`]s (`main`, `test`, ...)
//! - [`missing`] classifies requirements and computes missing externals
//! - [`lookup`] maps external module names to artifact locations
//!
//! Nothing here touches the file system; scanning and downloading are ports
//! implemented by the infrastructure layer.

pub mod catalogue;
pub mod declaration;
pub mod entities;
pub mod lookup;
pub mod missing;
pub mod space;

pub use catalogue::SystemCatalogue;
pub use declaration::{DeclarationError, ModuleDeclaration, Requirement, is_valid_module_name};
pub use entities::{DeclaredModule, DeclaredModules, RequiresModifier};
pub use lookup::{
    CuratedIndexLookup, ExternalModuleLocation, MAVEN_CENTRAL, MappedModuleLookup,
    MavenCoordinates, MavenModuleLookup, ModuleLookup, ModuleLookupTable, Platform,
    PrefixModuleLookup,
    UnlocatableModule,
};
pub use missing::{ModuleCategory, ModuleClassifier, compute_missing_external_modules};
pub use space::{Launcher, ModuleSpace, ModuleSpaces};
