//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid tool name: {0:?}")]
    InvalidToolName(String),

    #[error("Invalid tool identifier {identifier:?}: {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    #[error("Invalid module name: {0:?}")]
    InvalidModuleName(String),

    #[error("Unknown placeholder {{{placeholder}}} in template {template:?}")]
    UnknownPlaceholder { template: String, placeholder: String },

    #[error("Unknown module space: {0}")]
    UnknownSpace(String),

    #[error("Invalid workflow transition: {0}")]
    InvalidTransition(String),
}
