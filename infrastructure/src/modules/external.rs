//! External modules directory scanner
//!
//! The directory holds fetched archives named `<module>.jar` and, less
//! commonly, exploded modules `<dir>/module-info.java`.
//!
//! Archives are described with `jar --describe-module --file <jar>` when a
//! describer is available, which yields the module's own `requires` and lets
//! the resolver discover transitive externals. Without a describer, or when
//! describing fails, an archive declares its file stem and requires nothing.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use modbuild_application::ScanError;
use modbuild_domain::{DeclaredModule, DeclaredModules, RequiresModifier, ToolProvider};
use tracing::{debug, warn};

use super::scanner::{MODULE_INFO, insert_unique, read_declaration};

/// Parsed output of `jar --describe-module`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescription {
    pub name: String,
    pub version: Option<String>,
    pub automatic: bool,
    /// Requirements that need resolution
    pub requires: BTreeSet<String>,
}

impl ModuleDescription {
    /// ```text
    /// com.example.api@1.0 jar:file:///.../api.jar!/module-info.class
    /// exports com.example.api
    /// requires java.base mandated
    /// requires org.slf4j transitive
    /// requires static lombok
    /// ```
    ///
    /// Automatic modules are announced by a leading
    /// `No module descriptor found. Derived automatic module.` line.
    pub fn parse(output: &str) -> Option<Self> {
        let mut lines = output.lines().map(str::trim).filter(|l| !l.is_empty());
        let mut automatic = false;
        let mut header = lines.next()?;
        if header.starts_with("No module descriptor found") {
            automatic = true;
            header = lines.next()?;
        }
        let coordinate = header.split_whitespace().next()?;
        let (name, version) = match coordinate.split_once('@') {
            Some((name, version)) => (name, Some(version.to_string())),
            None => (coordinate, None),
        };
        if name.is_empty() {
            return None;
        }

        let mut requires = BTreeSet::new();
        for line in lines {
            let mut words = line.split_whitespace();
            if words.next() != Some("requires") {
                continue;
            }
            let mut modifiers = BTreeSet::new();
            let mut required = None;
            for word in words {
                match word {
                    "transitive" => modifiers.insert(RequiresModifier::Transitive),
                    "static" => modifiers.insert(RequiresModifier::Static),
                    "synthetic" => modifiers.insert(RequiresModifier::Synthetic),
                    "mandated" => modifiers.insert(RequiresModifier::Mandated),
                    other => {
                        // `requires foo@1.2` carries the compiled version
                        let other = other.split('@').next().unwrap_or(other);
                        required = Some(other.to_string());
                        true
                    }
                };
            }
            if let Some(required) = required
                && RequiresModifier::needs_resolution(&modifiers)
            {
                requires.insert(required);
            }
        }

        Some(Self {
            name: name.to_string(),
            version,
            automatic,
            requires,
        })
    }
}

fn describe_archive(jar: &Path, describer: &dyn ToolProvider) -> Option<ModuleDescription> {
    let arguments = [
        "--describe-module".to_string(),
        "--file".to_string(),
        jar.display().to_string(),
    ];
    let output = describer.run(&arguments);
    if output.code != 0 {
        warn!(
            archive = %jar.display(),
            code = output.code,
            "Describing module archive failed: {}",
            output.err.trim()
        );
        return None;
    }
    ModuleDescription::parse(&output.out)
}

fn archived_module(jar: &Path, describer: Option<&dyn ToolProvider>) -> Option<DeclaredModule> {
    let stem = jar.file_stem()?.to_str()?.to_string();
    let module = match describer.and_then(|d| describe_archive(jar, d)) {
        Some(description) => {
            if description.name != stem {
                debug!(archive = %jar.display(), module = %description.name, "Archive name differs from module name");
            }
            DeclaredModule::new(description.name, jar).with_requires(description.requires)
        }
        None => DeclaredModule::new(stem, jar),
    };
    Some(module)
}

/// Scan `directory` for archived and exploded modules; a missing directory is empty
pub fn scan_external_directory(
    directory: &Path,
    describer: Option<&dyn ToolProvider>,
) -> Result<DeclaredModules, ScanError> {
    let mut modules = DeclaredModules::new();
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(directory = %directory.display(), "No external modules yet");
            return Ok(modules);
        }
        Err(source) => {
            return Err(ScanError::Io {
                path: directory.to_path_buf(),
                source,
            });
        }
    };

    let mut paths: Vec<PathBuf> = entries.filter_map(Result::ok).map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        let module = if path.is_file() && path.extension().is_some_and(|ext| ext == "jar") {
            archived_module(&path, describer)
        } else if path.join(MODULE_INFO).is_file() {
            Some(read_declaration(&path.join(MODULE_INFO))?)
        } else {
            None
        };
        if let Some(module) = module {
            insert_unique(&mut modules, module)?;
        }
    }
    debug!(directory = %directory.display(), count = modules.len(), "Scanned external modules");
    Ok(modules)
}
