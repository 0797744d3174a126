//! Immutable tool call
//!
//! A [`ToolCall`] names a tool and carries the ordered arguments to pass to it.
//! Every builder method consumes the call and returns a new value; clones share
//! their argument buffer until one of them appends, so handing a call to several
//! tweaks or threads never copies arguments eagerly.
//!
//! ```text
//! ToolCall::new("javac")
//!     .with_pair("--release", "21")
//!     .with_find_files("src", "**/*.java")
//!     .when(verbose, |call| call.with("-verbose"))
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::core::error::DomainError;

/// An invocation request: tool name plus ordered arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolCall {
    name: String,
    arguments: Arc<Vec<String>>,
}

impl ToolCall {
    /// Create a call without arguments.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or blank. Use [`ToolCall::try_new`] for names
    /// coming from user input.
    pub fn new(name: impl Into<String>) -> Self {
        match Self::try_new(name) {
            Ok(call) => call,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn try_new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidToolName(name));
        }
        Ok(Self {
            name,
            arguments: Arc::new(Vec::new()),
        })
    }

    /// Create a call from a command line, `["javac", "--version"]`.
    pub fn parse<I, S>(command: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut iter = command.into_iter();
        let name = iter.next().map(Into::into).unwrap_or_default();
        Ok(Self::try_new(name)?.with_all(iter))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Index of the first argument equal to `argument`
    pub fn position(&self, argument: &str) -> Option<usize> {
        self.arguments.iter().position(|a| a == argument)
    }

    pub fn with(mut self, argument: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.arguments).push(argument.into());
        self
    }

    /// Append an option and its value, `--release 21`
    pub fn with_pair(self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.with(key).with(value.to_string())
    }

    pub fn with_all<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::make_mut(&mut self.arguments).extend(arguments.into_iter().map(Into::into));
        self
    }

    pub fn with_path(self, path: impl AsRef<Path>) -> Self {
        self.with(path.as_ref().display().to_string())
    }

    /// Append an option followed by paths joined with the platform path separator
    pub fn with_paths<I, P>(self, key: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let separator = if cfg!(windows) { ";" } else { ":" };
        let joined = paths
            .into_iter()
            .map(|p| p.as_ref().display().to_string())
            .collect::<Vec<_>>()
            .join(separator);
        self.with(key).with(joined)
    }

    /// Append one argument per path under `root` matching the glob `pattern`.
    ///
    /// Matches are sorted. A missing root or a malformed pattern contributes
    /// nothing.
    pub fn with_find_files(self, root: impl AsRef<Path>, pattern: &str) -> Self {
        let root = root.as_ref();
        if !root.exists() {
            tracing::debug!(root = %root.display(), "Root for file search does not exist");
            return self;
        }
        let full = Path::new(&glob::Pattern::escape(&root.to_string_lossy())).join(pattern);
        let entries = match glob::glob(&full.to_string_lossy()) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(pattern, error = %e, "Ignoring malformed glob pattern");
                return self;
            }
        };
        let mut paths: Vec<_> = entries.filter_map(Result::ok).collect();
        paths.sort();
        self.with_all(paths.iter().map(|p| p.display().to_string()))
    }

    pub fn when(self, condition: bool, then: impl FnOnce(Self) -> Self) -> Self {
        if condition { then(self) } else { self }
    }

    pub fn when_some<T>(self, value: Option<T>, then: impl FnOnce(Self, T) -> Self) -> Self {
        match value {
            Some(value) => then(self, value),
            None => self,
        }
    }

    /// Insert arguments at `index`, clamped to the end of the argument list
    pub fn inserted<I, S>(mut self, index: usize, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = Arc::make_mut(&mut self.arguments);
        let index = index.min(list.len());
        list.splice(index..index, arguments.into_iter().map(Into::into));
        self
    }

    pub fn to_command_line(&self, separator: &str) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.arguments.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for ToolCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_command_line(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_sequential_appends_equal_bulk_append() {
        let one = ToolCall::new("javac").with("-d").with("out");
        let two = ToolCall::new("javac").with_all(["-d", "out"]);
        assert_eq!(one, two);
        assert_eq!(one.arguments(), &["-d".to_string(), "out".to_string()]);
    }

    #[test]
    fn test_appends_do_not_touch_clones() {
        let base = ToolCall::new("jar").with("--create");
        let extended = base.clone().with("--file").with("a.jar");
        assert_eq!(base.arguments().len(), 1);
        assert_eq!(extended.arguments().len(), 3);
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            ToolCall::try_new("  "),
            Err(DomainError::InvalidToolName(_))
        ));
        assert!(ToolCall::parse(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_parse_command_line() {
        let call = ToolCall::parse(["java", "--version"]).unwrap();
        assert_eq!(call.name(), "java");
        assert_eq!(call.arguments(), &["--version".to_string()]);
    }

    #[test]
    fn test_conditionals() {
        let call = ToolCall::new("javac")
            .when(true, |c| c.with("-g"))
            .when(false, |c| c.with("-nowarn"))
            .when_some(Some(21), |c, r| c.with_pair("--release", r))
            .when_some(None::<u32>, |c, v| c.with_pair("--module-version", v));
        assert_eq!(call.to_command_line(" "), "javac -g --release 21");
    }

    #[test]
    fn test_inserted_and_position() {
        let call = ToolCall::new("javac").with_all(["-d", "out", "A.java"]);
        let index = call.position("-d").unwrap();
        let call = call.inserted(index, ["-encoding", "UTF-8"]);
        assert_eq!(call.to_string(), "javac -encoding UTF-8 -d out A.java");
        assert_eq!(call.clone().inserted(99, ["x"]).arguments().last().unwrap(), "x");
    }

    #[test]
    fn test_with_find_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/Z.java"), "").unwrap();
        fs::write(dir.path().join("A.java"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let call = ToolCall::new("javac").with_find_files(dir.path(), "**/*.java");
        let expected: Vec<String> = vec![
            dir.path().join("A.java").display().to_string(),
            dir.path().join("b/Z.java").display().to_string(),
        ];
        assert_eq!(call.arguments(), expected.as_slice());
    }

    #[test]
    fn test_with_find_files_missing_root_is_empty() {
        let call = ToolCall::new("javac").with_find_files("/definitely/not/here", "**/*.java");
        assert!(call.is_empty());
    }

    #[test]
    fn test_with_find_files_bad_pattern_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let call = ToolCall::new("javac").with_find_files(dir.path(), "[");
        assert!(call.is_empty());
    }

    #[test]
    fn test_with_paths_joins() {
        let call = ToolCall::new("java").with_paths("--module-path", ["a", "b"]);
        let separator = if cfg!(windows) { ";" } else { ":" };
        assert_eq!(call.arguments()[1], format!("a{separator}b"));
    }
}
