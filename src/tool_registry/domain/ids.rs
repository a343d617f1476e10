//! Validated tool name type.

use super::ToolRegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a tool name.
const MAX_TOOL_NAME_LENGTH: usize = 64;

/// Validated tool name, unique within a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolName(String);

impl ToolName {
    /// Creates a validated tool name.
    ///
    /// The input is trimmed. Case is preserved because clients address tools
    /// by their exact name. Only characters in `[A-Za-z0-9_-]` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, ToolRegistryDomainError> {
        let normalized = value.into().trim().to_owned();

        if normalized.is_empty() {
            return Err(ToolRegistryDomainError::EmptyToolName);
        }

        let is_valid = normalized.chars().all(|character| {
            character.is_ascii_alphanumeric() || character == '_' || character == '-'
        });
        if !is_valid {
            return Err(ToolRegistryDomainError::InvalidToolName(normalized));
        }

        if normalized.len() > MAX_TOOL_NAME_LENGTH {
            return Err(ToolRegistryDomainError::ToolNameTooLong(normalized));
        }

        Ok(Self(normalized))
    }

    /// Returns the tool name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ToolName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
