//! Error types for tool descriptor construction and argument validation.

use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Errors returned while constructing tool registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolRegistryDomainError {
    /// The tool name is empty after trimming.
    #[error("tool name must not be empty")]
    EmptyToolName,

    /// The tool name contains characters outside `[A-Za-z0-9_-]`.
    #[error(
        "tool name '{0}' contains invalid characters (only ASCII letters, digits, '_' and '-' allowed)"
    )]
    InvalidToolName(String),

    /// The tool name exceeds the 64-character limit.
    #[error("tool name exceeds 64 character limit: {0}")]
    ToolNameTooLong(String),

    /// A tool description is empty after trimming.
    #[error("tool description must not be empty")]
    EmptyToolDescription,

    /// A schema property name is empty after trimming.
    #[error("schema property name must not be empty")]
    EmptyPropertyName,

    /// The same property was declared twice.
    #[error("schema property '{0}' is declared more than once")]
    DuplicateProperty(String),

    /// An enum constraint was declared without members.
    #[error("schema property '{0}' declares an empty enum")]
    EmptyEnum(String),

    /// A declared default does not satisfy the property's own constraints.
    #[error("default for schema property '{property}' is invalid: {reason}")]
    InvalidDefault {
        /// Property name.
        property: String,
        /// Which constraint the default violates.
        reason: String,
    },
}

/// A single reason why tool arguments were rejected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaViolation {
    /// A required property is absent or `null`.
    #[error("missing required argument '{0}'")]
    MissingRequired(String),

    /// A property is not declared by the schema.
    #[error("unexpected argument '{0}'")]
    UnknownProperty(String),

    /// A property has the wrong JSON type.
    #[error("argument '{property}' must be of type {expected}")]
    TypeMismatch {
        /// Property name.
        property: String,
        /// Expected JSON type name.
        expected: &'static str,
    },

    /// A property value is not one of the allowed enum members.
    #[error("argument '{property}' must be one of {allowed}")]
    NotInEnum {
        /// Property name.
        property: String,
        /// Allowed members rendered as JSON.
        allowed: String,
    },

    /// A numeric property is outside its declared bounds.
    #[error("argument '{property}' is out of range: {value}")]
    OutOfRange {
        /// Property name.
        property: String,
        /// Offending value.
        value: Value,
    },
}

impl Serialize for SchemaViolation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
