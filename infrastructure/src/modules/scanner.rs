//! Source tree scanner
//!
//! Each pattern is a glob relative to the base directory naming source
//! roots. A pattern without `*` names a directory of per-module roots, so
//! `src` is read as `src/*`. Every matched directory must contain exactly
//! one `module-info.java` somewhere below it; the directory holding that
//! file is the module's content root.
//!
//! ```text
//! pattern "*/main/java"
//!   foo/main/java/module-info.java      → module foo, root foo/main/java
//!   bar/main/java/module-info.java      → module bar, root bar/main/java
//! ```
//!
//! Hidden directories are not matched. Results are name sorted, so two
//! scans of an unchanged tree are identical.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::{MatchOptions, Pattern, glob_with};
use modbuild_application::{ModuleScanner, ScanError};
use modbuild_domain::{DeclaredModule, DeclaredModules, ModuleDeclaration, ToolProvider};
use tracing::{debug, trace};

use super::external::scan_external_directory;

pub const MODULE_INFO: &str = "module-info.java";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

#[derive(Clone, Default)]
pub struct FileModuleScanner {
    jar_describer: Option<Arc<dyn ToolProvider>>,
}

impl FileModuleScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider of `jar --describe-module`, used to read archived modules
    pub fn with_jar_describer(mut self, describer: Arc<dyn ToolProvider>) -> Self {
        self.jar_describer = Some(describer);
        self
    }

    fn source_roots(base: &Path, pattern: &str) -> Result<Vec<PathBuf>, ScanError> {
        let pattern = if pattern.contains('*') {
            pattern.to_string()
        } else {
            format!("{}/*", pattern.trim_end_matches('/'))
        };
        let full = format!("{}/{}", Pattern::escape(&base.display().to_string()), pattern);
        let entries = glob_with(&full, MATCH_OPTIONS).map_err(|e| ScanError::Configuration {
            path: base.join(&pattern),
            reason: format!("Invalid source pattern: {e}"),
        })?;
        let mut roots: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|path| path.is_dir())
            .collect();
        roots.sort();
        trace!(pattern = %full, count = roots.len(), "Matched source roots");
        Ok(roots)
    }

    fn declaration_file(root: &Path) -> Result<PathBuf, ScanError> {
        let pattern = format!("{}/**/{}", Pattern::escape(&root.display().to_string()), MODULE_INFO);
        let mut files: Vec<PathBuf> = glob_with(&pattern, MATCH_OPTIONS)
            .map_err(|e| ScanError::Configuration {
                path: root.to_path_buf(),
                reason: e.to_string(),
            })?
            .filter_map(Result::ok)
            .filter(|path| path.is_file())
            .collect();
        match files.len() {
            1 => Ok(files.remove(0)),
            0 => Err(ScanError::Configuration {
                path: root.to_path_buf(),
                reason: format!("no {MODULE_INFO} found"),
            }),
            n => Err(ScanError::Configuration {
                path: root.to_path_buf(),
                reason: format!("expected one {MODULE_INFO}, found {n}"),
            }),
        }
    }

    /// `<root>/<module/path>/Main.java` → `<module>.Main`
    fn main_class(module: &DeclaredModule) -> Option<String> {
        let package = module.name.replace('.', "/");
        module
            .content_root
            .join(package)
            .join("Main.java")
            .is_file()
            .then(|| format!("{}.Main", module.name))
    }
}

/// Read and parse one declaration file
pub(crate) fn read_declaration(path: &Path) -> Result<DeclaredModule, ScanError> {
    let source = std::fs::read_to_string(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let declaration = ModuleDeclaration::parse(&source).map_err(|source| ScanError::Declaration {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(DeclaredModule::from_declaration(&declaration, path))
}

/// Insert `module`, rejecting a second module with the same name
pub(crate) fn insert_unique(modules: &mut DeclaredModules, module: DeclaredModule) -> Result<(), ScanError> {
    if let Some(first) = modules.get(&module.name) {
        return Err(ScanError::Duplicate {
            name: module.name.clone(),
            first: first.info_file.clone(),
            second: module.info_file.clone(),
        });
    }
    modules.insert(module);
    Ok(())
}

impl ModuleScanner for FileModuleScanner {
    fn scan(&self, base: &Path, patterns: &[String]) -> Result<DeclaredModules, ScanError> {
        let mut modules = DeclaredModules::new();
        for pattern in patterns {
            for root in Self::source_roots(base, pattern)? {
                let info = Self::declaration_file(&root)?;
                let mut module = read_declaration(&info)?;
                module.main_class = Self::main_class(&module);
                debug!(
                    module = %module.name,
                    root = %module.content_root.display(),
                    requires = module.requires.len(),
                    "Declared module"
                );
                insert_unique(&mut modules, module)?;
            }
        }
        Ok(modules)
    }

    fn scan_external(&self, directory: &Path) -> Result<DeclaredModules, ScanError> {
        scan_external_directory(directory, self.jar_describer.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(base: &Path, relative: &str, content: &str) {
        let path = base.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn patterns(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scan_classifies_requires() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "foo/main/java/module-info.java",
            "module foo { requires java.base; requires bar; requires baz.one; requires static qux; }",
        );
        write(dir.path(), "bar/main/java/module-info.java", "module bar {}");

        let modules = FileModuleScanner::new()
            .scan(dir.path(), &patterns(&["*/main/java"]))
            .unwrap();
        assert_eq!(modules.names(), vec!["bar", "foo"]);
        let foo = modules.get("foo").unwrap();
        assert_eq!(foo.content_root, dir.path().join("foo/main/java"));
        assert!(foo.requires.contains("baz.one"));
        assert!(!foo.requires.contains("qux"));
    }

    #[test]
    fn test_scan_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/main/java/module-info.java", "module a { requires b; }");
        write(dir.path(), "b/main/java/module-info.java", "module b {}");
        let scanner = FileModuleScanner::new();
        let p = patterns(&["*/main/java"]);
        assert_eq!(scanner.scan(dir.path(), &p).unwrap(), scanner.scan(dir.path(), &p).unwrap());
    }

    #[test]
    fn test_plain_pattern_means_children() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/com.example.app/module-info.java", "module com.example.app {}");
        write(dir.path(), "src/com.example.app/com/example/app/Main.java", "class Main {}");
        let modules = FileModuleScanner::new().scan(dir.path(), &patterns(&["src"])).unwrap();
        let app = modules.get("com.example.app").unwrap();
        assert_eq!(app.main_class.as_deref(), Some("com.example.app.Main"));
    }

    #[test]
    fn test_root_without_declaration_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "foo/main/java/Foo.java", "class Foo {}");
        let error = FileModuleScanner::new()
            .scan(dir.path(), &patterns(&["*/main/java"]))
            .unwrap_err();
        assert!(matches!(error, ScanError::Configuration { .. }));
        assert_eq!(error.path(), dir.path().join("foo/main/java"));
    }

    #[test]
    fn test_root_with_two_declarations_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "mods/a/module-info.java", "module a {}");
        write(dir.path(), "mods/b/module-info.java", "module b {}");
        let error = FileModuleScanner::new()
            .scan(dir.path(), &patterns(&["mod*"]))
            .unwrap_err();
        assert!(error.to_string().contains("found 2"), "{error}");
    }

    #[test]
    fn test_duplicate_module_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "one/main/java/module-info.java", "module same {}");
        write(dir.path(), "two/main/java/module-info.java", "module same {}");
        let error = FileModuleScanner::new()
            .scan(dir.path(), &patterns(&["*/main/java"]))
            .unwrap_err();
        assert!(matches!(error, ScanError::Duplicate { ref name, .. } if name == "same"));
    }

    #[test]
    fn test_malformed_declaration() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "foo/main/java/module-info.java", "class Nope {}");
        let error = FileModuleScanner::new()
            .scan(dir.path(), &patterns(&["*/main/java"]))
            .unwrap_err();
        assert!(matches!(error, ScanError::Declaration { .. }));
    }

    #[test]
    fn test_no_match_is_empty_and_hidden_dirs_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".modbuild/x/module-info.java", "module hidden {}");
        let scanner = FileModuleScanner::new();
        assert!(scanner.scan(dir.path(), &patterns(&["*/test/java"])).unwrap().is_empty());
        assert!(scanner.scan(dir.path(), &patterns(&["*"])).unwrap().is_empty());
    }
}
