//! External module lookup chain
//!
//! A [`ModuleLookup`] maps a module name to the location of an artifact that
//! provides it. Lookups are composed in a [`ModuleLookupTable`] and queried in
//! registration order; the first answer wins.
//!
//! Every strategy here is platform aware. For module `m` on `linux`/`x86_64`
//! the keys tried are, in order:
//!
//! ```text
//! m|linux-x86_64   →   m|linux   →   m
//! ```
//!
//! which lets a single index carry native variants (JavaFX, LWJGL) next to
//! plain cross-platform jars.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::workspace::expand_template;

/// Operating system and architecture used to pick native artifacts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    pub os: Option<String>,
    pub arch: Option<String>,
}

impl Platform {
    /// Matches only platform-independent keys
    pub const ANY: Platform = Platform {
        os: None,
        arch: None,
    };

    pub fn new(os: &str, arch: &str) -> Self {
        Self {
            os: Some(normalize_os(os)),
            arch: Some(normalize_arch(arch)),
        }
    }

    /// Platform of the running process
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Lookup keys for `module`, most specific first
    pub fn keys(&self, module: &str) -> Vec<String> {
        let mut keys = Vec::with_capacity(3);
        if let Some(os) = &self.os {
            if let Some(arch) = &self.arch {
                keys.push(format!("{module}|{os}-{arch}"));
            }
            keys.push(format!("{module}|{os}"));
        }
        keys.push(module.to_string());
        keys
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.os, &self.arch) {
            (Some(os), Some(arch)) => write!(f, "{os}-{arch}"),
            (Some(os), None) => write!(f, "{os}"),
            _ => write!(f, "any"),
        }
    }
}

fn normalize_os(os: &str) -> String {
    let os = os.to_ascii_lowercase();
    if os.starts_with("mac") || os.starts_with("darwin") || os.starts_with("osx") {
        "mac".to_string()
    } else if os.starts_with("win") {
        "windows".to_string()
    } else if os.starts_with("linux") {
        "linux".to_string()
    } else {
        os
    }
}

fn normalize_arch(arch: &str) -> String {
    match arch.to_ascii_lowercase().as_str() {
        "x86_64" | "amd64" | "x64" => "x86_64".to_string(),
        "aarch64" | "arm64" | "arm_64" => "arm_64".to_string(),
        "x86" | "i386" | "i486" | "i586" | "i686" | "x86_32" => "x86_32".to_string(),
        "arm" | "arm32" | "arm_32" => "arm_32".to_string(),
        other => other.to_string(),
    }
}

/// A strategy mapping module names to artifact locations
pub trait ModuleLookup: Send + Sync {
    fn description(&self) -> String;

    fn lookup(&self, module: &str, platform: &Platform) -> Option<String>;
}

/// Resolved location of an external module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalModuleLocation {
    pub module: String,
    pub uri: String,
    /// Description of the lookup that answered
    pub lookup: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Module '{module}' not locatable on {platform} via [{}]", lookups.join(", "))]
pub struct UnlocatableModule {
    pub module: String,
    pub platform: String,
    pub lookups: Vec<String>,
}

/// Direct `key → uri` map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedModuleLookup {
    description: String,
    entries: BTreeMap<String, String>,
}

impl MappedModuleLookup {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, uri: impl Into<String>) -> Self {
        self.entries.insert(key.into(), uri.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ModuleLookup for MappedModuleLookup {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn lookup(&self, module: &str, platform: &Platform) -> Option<String> {
        platform
            .keys(module)
            .iter()
            .find_map(|key| self.entries.get(key).cloned())
    }
}

/// Curated properties-style index
///
/// ```text
/// @description=JUnit 5.10.2
/// # comment
/// org.junit.jupiter=https://.../junit-jupiter-5.10.2.jar
/// org.lwjgl|linux=https://.../lwjgl-3.3.3-natives-linux.jar
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuratedIndexLookup {
    inner: MappedModuleLookup,
}

impl CuratedIndexLookup {
    pub fn parse(name: &str, text: &str) -> Self {
        let mut description = name.to_string();
        let mut inner = MappedModuleLookup::new(String::new());
        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                tracing::debug!(index = name, line, "Skipping index line without '='");
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            if key == "@description" {
                description = value.to_string();
            } else {
                inner = inner.with(key, value);
            }
        }
        inner.description = description;
        Self { inner }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl ModuleLookup for CuratedIndexLookup {
    fn description(&self) -> String {
        self.inner.description()
    }

    fn lookup(&self, module: &str, platform: &Platform) -> Option<String> {
        self.inner.lookup(module, platform)
    }
}

/// Maven coordinates `group:artifact:version[:classifier]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenCoordinates {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub classifier: Option<String>,
}

impl MavenCoordinates {
    pub fn parse(coordinates: &str) -> Option<Self> {
        let parts: Vec<&str> = coordinates.split(':').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        match parts.as_slice() {
            [group, artifact, version] => Some(Self {
                group: group.to_string(),
                artifact: artifact.to_string(),
                version: version.to_string(),
                classifier: None,
            }),
            [group, artifact, version, classifier] => Some(Self {
                group: group.to_string(),
                artifact: artifact.to_string(),
                version: version.to_string(),
                classifier: Some(classifier.to_string()),
            }),
            _ => None,
        }
    }

    /// `{repository}/{group/path}/{artifact}/{version}/{artifact}-{version}[-{classifier}].jar`
    pub fn uri(&self, repository: &str) -> String {
        let classifier = self
            .classifier
            .as_ref()
            .map(|c| format!("-{c}"))
            .unwrap_or_default();
        format!(
            "{}/{}/{}/{}/{}-{}{}.jar",
            repository.trim_end_matches('/'),
            self.group.replace('.', "/"),
            self.artifact,
            self.version,
            self.artifact,
            self.version,
            classifier
        )
    }
}

pub const MAVEN_CENTRAL: &str = "https://repo.maven.apache.org/maven2";

/// Templated repository: module key → Maven coordinates → jar URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenModuleLookup {
    repository: String,
    coordinates: BTreeMap<String, String>,
}

impl Default for MavenModuleLookup {
    fn default() -> Self {
        Self::new(MAVEN_CENTRAL)
    }
}

impl MavenModuleLookup {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            coordinates: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, coordinates: impl Into<String>) -> Self {
        self.coordinates.insert(key.into(), coordinates.into());
        self
    }
}

impl ModuleLookup for MavenModuleLookup {
    fn description(&self) -> String {
        format!("maven repository {}", self.repository)
    }

    fn lookup(&self, module: &str, platform: &Platform) -> Option<String> {
        let raw = platform
            .keys(module)
            .iter()
            .find_map(|key| self.coordinates.get(key))?;
        match MavenCoordinates::parse(raw) {
            Some(coordinates) => Some(coordinates.uri(&self.repository)),
            None => {
                tracing::warn!(module, coordinates = %raw, "Ignoring malformed Maven coordinates");
                None
            }
        }
    }
}

/// Module-name prefix → Maven coordinates template
///
/// `{suffix}` expands to the part of the module name after the prefix with
/// dots turned into dashes, so `org.junit.jupiter.api` under prefix
/// `org.junit.jupiter` and template `org.junit.jupiter:junit-jupiter{suffix}:5.10.2`
/// resolves to artifact `junit-jupiter-api`. The longest matching prefix wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixModuleLookup {
    repository: String,
    templates: BTreeMap<String, String>,
}

impl Default for PrefixModuleLookup {
    fn default() -> Self {
        Self::new(MAVEN_CENTRAL)
    }
}

impl PrefixModuleLookup {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            templates: BTreeMap::new(),
        }
    }

    /// A trailing `*` on the prefix is accepted and ignored
    pub fn with(mut self, prefix: impl Into<String>, template: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let prefix = prefix.trim_end_matches('*').trim_end_matches('.').to_string();
        self.templates.insert(prefix, template.into());
        self
    }

    fn suffix<'a>(prefix: &str, module: &'a str) -> Option<&'a str> {
        let rest = module.strip_prefix(prefix)?;
        (rest.is_empty() || rest.starts_with('.')).then_some(rest)
    }
}

impl ModuleLookup for PrefixModuleLookup {
    fn description(&self) -> String {
        format!("prefixed modules in {}", self.repository)
    }

    fn lookup(&self, module: &str, _platform: &Platform) -> Option<String> {
        let (suffix, template) = self
            .templates
            .iter()
            .filter_map(|(prefix, template)| {
                Self::suffix(prefix, module).map(|suffix| (prefix.len(), suffix, template))
            })
            .max_by_key(|(len, _, _)| *len)
            .map(|(_, suffix, template)| (suffix, template))?;
        let values = BTreeMap::from([
            ("module", module.to_string()),
            ("suffix", suffix.replace('.', "-")),
        ]);
        let raw = match expand_template(template, &values) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(module, %error, "Ignoring prefix template");
                return None;
            }
        };
        MavenCoordinates::parse(&raw).map(|coordinates| coordinates.uri(&self.repository))
    }
}

/// Ordered chain of lookups, first answer wins
#[derive(Clone, Default)]
pub struct ModuleLookupTable {
    lookups: Vec<Arc<dyn ModuleLookup>>,
}

impl ModuleLookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, lookup: impl ModuleLookup + 'static) -> Self {
        self.lookups.push(Arc::new(lookup));
        self
    }

    pub fn with_shared(mut self, lookup: Arc<dyn ModuleLookup>) -> Self {
        self.lookups.push(lookup);
        self
    }

    pub fn len(&self) -> usize {
        self.lookups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.lookups.iter().map(|l| l.description()).collect()
    }

    pub fn lookup(&self, module: &str, platform: &Platform) -> Option<ExternalModuleLocation> {
        self.lookups.iter().find_map(|lookup| {
            lookup.lookup(module, platform).map(|uri| ExternalModuleLocation {
                module: module.to_string(),
                uri,
                lookup: lookup.description(),
            })
        })
    }

    pub fn locate(
        &self,
        module: &str,
        platform: &Platform,
    ) -> Result<ExternalModuleLocation, UnlocatableModule> {
        self.lookup(module, platform).ok_or_else(|| UnlocatableModule {
            module: module.to_string(),
            platform: platform.to_string(),
            lookups: self.descriptions(),
        })
    }
}

impl fmt::Debug for ModuleLookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.descriptions()).finish()
    }
}
