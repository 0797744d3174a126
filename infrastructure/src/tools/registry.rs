//! In-process tool registry
//!
//! The [`ToolRegistry`] holds tools implemented inside this process, all
//! under one namespace. It is usually queried first so that builtin tools
//! shadow native programs of the same name.
//!
//! # Usage
//!
//! ```ignore
//! use modbuild_infrastructure::tools::ToolRegistry;
//! use modbuild_domain::ToolOutput;
//!
//! let registry = ToolRegistry::new("modbuild")
//!     .register("hello", |_: &[String]| ToolOutput::success("hi"));
//!
//! assert!(registry.has_tool("modbuild/hello"));
//! ```
//!
//! Registering a name twice keeps the first registration.

use std::fmt;
use std::sync::Arc;

use modbuild_domain::{Tool, ToolFinder, ToolIdentifier, ToolProvider};

#[derive(Clone)]
pub struct ToolRegistry {
    namespace: String,
    tools: Vec<Tool>,
}

impl ToolRegistry {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            tools: Vec::new(),
        }
    }

    /// Register a tool; invalid or duplicate names are logged and skipped
    pub fn register<P: ToolProvider + 'static>(self, name: &str, provider: P) -> Self {
        self.register_arc(name, Arc::new(provider))
    }

    pub fn register_arc(mut self, name: &str, provider: Arc<dyn ToolProvider>) -> Self {
        let identifier = match ToolIdentifier::new(name) {
            Ok(identifier) => identifier.with_namespace(self.namespace.clone()),
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "Ignoring tool with invalid name");
                return self;
            }
        };
        if self.has_tool(name) {
            tracing::trace!(tool = %identifier, "Tool already registered");
            return self;
        }
        tracing::debug!(tool = %identifier, "Registered tool");
        self.tools.push(Tool::new(identifier, provider));
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn has_tool(&self, query: &str) -> bool {
        self.tools.iter().any(|tool| tool.matches(query))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl ToolFinder for ToolRegistry {
    fn description(&self) -> String {
        format!("{} tools", self.namespace)
    }

    fn find_all(&self) -> Vec<Tool> {
        self.tools.clone()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("namespace", &self.namespace)
            .field("tools", &self.tools)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modbuild_domain::ToolOutput;

    #[test]
    fn test_register_and_find() {
        let registry = ToolRegistry::new("modbuild")
            .register("hello", |_: &[String]| ToolOutput::success("hi"));

        assert_eq!(registry.len(), 1);
        assert!(registry.has_tool("hello"));
        assert!(registry.has_tool("modbuild/hello"));
        let tool = registry.find_first("modbuild/hello").unwrap();
        assert_eq!(tool.run(&[]).out, "hi");
        assert_eq!(registry.description(), "modbuild tools");
    }

    #[test]
    fn test_first_registration_wins() {
        let registry = ToolRegistry::new("x")
            .register("t", |_: &[String]| ToolOutput::success("first"))
            .register("t", |_: &[String]| ToolOutput::success("second"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find_first("t").unwrap().run(&[]).out, "first");
    }

    #[test]
    fn test_invalid_name_is_skipped() {
        let registry = ToolRegistry::new("x").register("a/b", |_: &[String]| ToolOutput::default());
        assert!(registry.is_empty());
    }
}
