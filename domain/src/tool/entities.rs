//! Tool domain entities

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;

use super::provider::{ToolOutput, ToolProvider};

/// Identifier of a tool: `[namespace "/"] name ["@" version]`
///
/// Examples: `javac`, `jdk.compiler/javac`, `modbuild/checksum@1.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ToolIdentifier {
    namespace: Option<String>,
    name: String,
    version: Option<String>,
}

impl ToolIdentifier {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        Self::validate_name(&name, &name)?;
        Ok(Self {
            namespace: None,
            name,
            version: None,
        })
    }

    /// Parse the `[namespace/]name[@version]` form
    pub fn parse(identifier: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidIdentifier {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
        };

        let (namespace, rest) = match identifier.rfind(['/', '\\']) {
            Some(index) => (Some(&identifier[..index]), &identifier[index + 1..]),
            None => (None, identifier),
        };
        let (name, version) = match rest.split_once('@') {
            Some((name, version)) => (name, Some(version)),
            None => (rest, None),
        };

        if let Some(namespace) = namespace {
            if namespace.is_empty() {
                return Err(invalid("namespace must not be empty"));
            }
            if namespace.starts_with(['/', '\\']) || namespace.ends_with(['/', '\\']) {
                return Err(invalid("namespace must not start or end with a separator"));
            }
        }
        if version.is_some_and(|v| v.is_empty() || v.contains('@')) {
            return Err(invalid("version must be non-empty and must not contain '@'"));
        }
        Self::validate_name(identifier, name)?;

        Ok(Self {
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
            version: version.map(str::to_string),
        })
    }

    fn validate_name(identifier: &str, name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() || name.contains(['/', '\\', '@']) {
            return Err(DomainError::InvalidIdentifier {
                identifier: identifier.to_string(),
                reason: "name must be non-empty and must not contain '/', '\\' or '@'".to_string(),
            });
        }
        Ok(())
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Match a query of the form `name`, `namespace/name`, `name@version`
    /// or `namespace/name@version`.
    pub fn matches(&self, query: &str) -> bool {
        if query == self.name {
            return true;
        }
        let namespaced = self.namespace.as_ref().map(|ns| format!("{ns}/{}", self.name));
        let versioned = self.version.as_ref().map(|v| format!("{}@{v}", self.name));
        if namespaced.as_deref() == Some(query) || versioned.as_deref() == Some(query) {
            return true;
        }
        self.to_string() == query
    }
}

impl fmt::Display for ToolIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace) = &self.namespace {
            write!(f, "{namespace}/")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(version) = &self.version {
            write!(f, "@{version}")?;
        }
        Ok(())
    }
}

/// A runnable tool, owned by the finder that produced it
#[derive(Clone)]
pub struct Tool {
    identifier: ToolIdentifier,
    provider: Arc<dyn ToolProvider>,
}

impl Tool {
    pub fn new(identifier: ToolIdentifier, provider: Arc<dyn ToolProvider>) -> Self {
        Self {
            identifier,
            provider,
        }
    }

    /// Create a tool from an identifier string and a provider
    pub fn of(identifier: &str, provider: impl ToolProvider + 'static) -> Result<Self, DomainError> {
        Ok(Self::new(ToolIdentifier::parse(identifier)?, Arc::new(provider)))
    }

    pub fn identifier(&self) -> &ToolIdentifier {
        &self.identifier
    }

    pub fn name(&self) -> &str {
        self.identifier.name()
    }

    pub fn matches(&self, query: &str) -> bool {
        self.identifier.matches(query)
    }

    pub fn run(&self, arguments: &[String]) -> ToolOutput {
        self.provider.run(arguments)
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("identifier", &self.identifier.to_string())
            .finish_non_exhaustive()
    }
}
