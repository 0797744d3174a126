use std::path::Path;

use glob::{Pattern, glob};
use modbuild_domain::ToolOutput;
use regex::Regex;

/// List regular files below `DIR` (default `.`), optionally filtered by a
/// regular expression matched against the relative, `/`-separated path.
pub fn tree(arguments: &[String]) -> ToolOutput {
    let (root, filter) = match arguments {
        [] => (".", None),
        [root] => (root.as_str(), None),
        [root, filter] => (root.as_str(), Some(filter)),
        _ => return ToolOutput::failure(1, "Usage: tree [DIR [REGEX]]\n"),
    };

    let root = Path::new(root);
    if !root.is_dir() {
        return ToolOutput::failure(1, format!("Not a directory: {}\n", root.display()));
    }

    let regex = match filter.map(|f| Regex::new(f)).transpose() {
        Ok(regex) => regex,
        Err(e) => return ToolOutput::failure(1, format!("Invalid regex pattern: {e}\n")),
    };

    let pattern = format!("{}/**/*", Pattern::escape(&root.display().to_string()));
    let entries = match glob(&pattern) {
        Ok(entries) => entries,
        Err(e) => return ToolOutput::failure(1, format!("Invalid directory: {e}\n")),
    };

    let mut files: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let relative = path.strip_prefix(root).ok()?;
            let components: Vec<_> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            Some(components.join("/"))
        })
        .filter(|path| regex.as_ref().is_none_or(|regex| regex.is_match(path)))
        .collect();
    files.sort();

    let mut out = files.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    ToolOutput::success(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("foo/main/java")).unwrap();
        std::fs::write(dir.path().join("foo/main/java/module-info.java"), "module foo {}").unwrap();
        std::fs::write(dir.path().join("README.md"), "").unwrap();
        dir
    }

    fn arg(dir: &tempfile::TempDir) -> String {
        dir.path().display().to_string()
    }

    #[test]
    fn test_lists_files_sorted() {
        let dir = fixture();
        let output = tree(&[arg(&dir)]);
        assert_eq!(output.code, 0);
        assert_eq!(output.out, "README.md\nfoo/main/java/module-info.java\n");
    }

    #[test]
    fn test_regex_filter() {
        let dir = fixture();
        let output = tree(&[arg(&dir), r"module-info\.java$".to_string()]);
        assert_eq!(output.out, "foo/main/java/module-info.java\n");
    }

    #[test]
    fn test_invalid_regex_exits_one() {
        let dir = fixture();
        let output = tree(&[arg(&dir), "(unclosed".to_string()]);
        assert_eq!(output.code, 1);
        assert!(output.err.contains("Invalid regex"));
    }

    #[test]
    fn test_missing_directory() {
        let output = tree(&["/nonexistent/modbuild-tree".to_string()]);
        assert_eq!(output.code, 1);
    }
}
