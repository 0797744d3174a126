//! Tool finders
//!
//! A [`ToolFinder`] maps a tool name to a runnable [`Tool`]. Finders compose:
//! [`CompositeToolFinder`] asks its children in order and the first match wins,
//! which gives every build a deterministic precedence such as
//!
//! ```text
//! registry (in-process) → external programs → JDK binaries → PATH
//! ```

use std::fmt;
use std::sync::Arc;

use super::entities::Tool;

/// Lookup capability: name → tool
pub trait ToolFinder: Send + Sync {
    /// Human-readable label used in diagnostics, e.g. `native programs in /usr/bin`
    fn description(&self) -> String;

    fn find_all(&self) -> Vec<Tool>;

    fn find_first(&self, name: &str) -> Option<Tool> {
        self.find_all().into_iter().find(|tool| tool.matches(name))
    }

    /// Descriptions of the leaf finders consulted, in query order
    fn chain(&self) -> Vec<String> {
        vec![self.description()]
    }
}

/// Fixed list of tools, first match wins
#[derive(Clone, Default)]
pub struct ToolList {
    description: String,
    tools: Vec<Tool>,
}

impl ToolList {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            tools: Vec::new(),
        }
    }

    pub fn with(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl ToolFinder for ToolList {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn find_all(&self) -> Vec<Tool> {
        self.tools.clone()
    }
}

impl fmt::Debug for ToolList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolList")
            .field("description", &self.description)
            .field("tools", &self.tools)
            .finish()
    }
}

/// Ordered composition of finders
#[derive(Clone, Default)]
pub struct CompositeToolFinder {
    finders: Vec<Arc<dyn ToolFinder>>,
}

impl CompositeToolFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, finder: impl ToolFinder + 'static) -> Self {
        self.finders.push(Arc::new(finder));
        self
    }

    pub fn with_shared(mut self, finder: Arc<dyn ToolFinder>) -> Self {
        self.finders.push(finder);
        self
    }

    /// The child finders, in query order
    pub fn decompose(&self) -> &[Arc<dyn ToolFinder>] {
        &self.finders
    }
}

impl ToolFinder for CompositeToolFinder {
    fn description(&self) -> String {
        format!("composite of {} finder(s)", self.finders.len())
    }

    fn find_all(&self) -> Vec<Tool> {
        self.finders.iter().flat_map(|f| f.find_all()).collect()
    }

    fn find_first(&self, name: &str) -> Option<Tool> {
        self.finders.iter().find_map(|f| f.find_first(name))
    }

    fn chain(&self) -> Vec<String> {
        self.finders.iter().flat_map(|f| f.chain()).collect()
    }
}

impl fmt::Debug for CompositeToolFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.chain()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::provider::ToolOutput;

    fn tool(id: &str, out: &'static str) -> Tool {
        Tool::of(id, move |_: &[String]| ToolOutput::success(out)).unwrap()
    }

    #[test]
    fn test_tool_list_first_match_wins() {
        let list = ToolList::new("memory")
            .with(tool("a/x", "first"))
            .with(tool("b/x", "second"));
        let found = list.find_first("x").unwrap();
        assert_eq!(found.run(&[]).out, "first");
        assert_eq!(list.find_first("b/x").unwrap().run(&[]).out, "second");
        assert!(list.find_first("y").is_none());
    }

    #[test]
    fn test_composite_precedence() {
        let composite = CompositeToolFinder::new()
            .with(ToolList::new("one").with(tool("x", "one")))
            .with(ToolList::new("two").with(tool("x", "two")).with(tool("y", "two")));
        assert_eq!(composite.find_first("x").unwrap().run(&[]).out, "one");
        assert_eq!(composite.find_first("y").unwrap().run(&[]).out, "two");
        assert_eq!(composite.find_all().len(), 3);
    }

    #[test]
    fn test_composite_chain_flattens() {
        let inner = CompositeToolFinder::new()
            .with(ToolList::new("a"))
            .with(ToolList::new("b"));
        let outer = CompositeToolFinder::new().with(inner).with(ToolList::new("c"));
        assert_eq!(outer.chain(), vec!["a", "b", "c"]);
        assert_eq!(outer.decompose().len(), 2);
    }
}
