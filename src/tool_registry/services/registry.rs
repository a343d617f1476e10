//! Ordered tool registry.

use crate::tool_registry::domain::{
    SchemaViolation, ToolDescriptor, ToolMetadata, ToolName, ToolRegistryDomainError,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Service-level errors for tool registration and lookup.
#[derive(Debug, Error)]
pub enum ToolRegistryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ToolRegistryDomainError),

    /// A tool with the same name is already registered.
    #[error("tool '{0}' is already registered")]
    DuplicateTool(ToolName),

    /// No tool is registered under the requested name.
    #[error("Unknown tool: {0}")]
    NotFound(String),

    /// Call arguments do not satisfy the tool's input schema.
    #[error("invalid arguments for tool '{tool}'")]
    InvalidArguments {
        /// Tool name.
        tool: ToolName,
        /// Every violation found.
        violations: Vec<SchemaViolation>,
    },
}

/// Result type for registry operations.
pub type ToolRegistryResult<T> = Result<T, ToolRegistryError>;

/// Tools available to the dispatcher, listed in registration order.
///
/// The registry is populated at startup and shared read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<ToolName, usize>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryError::DuplicateTool`] when the name is taken.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> ToolRegistryResult<()> {
        let name = descriptor.name().clone();
        if self.index.contains_key(&name) {
            return Err(ToolRegistryError::DuplicateTool(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(descriptor);
        Ok(())
    }

    /// Looks up a tool by its exact name.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryError::NotFound`] when no tool has the name.
    pub fn get(&self, name: &str) -> ToolRegistryResult<&ToolDescriptor> {
        ToolName::new(name)
            .ok()
            .and_then(|tool_name| self.index.get(&tool_name))
            .and_then(|position| self.tools.get(*position))
            .ok_or_else(|| ToolRegistryError::NotFound(name.to_owned()))
    }

    /// Looks up a tool and validates call arguments against its schema.
    ///
    /// Returns the descriptor together with the arguments after defaults
    /// have been applied.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryError::NotFound`] for unknown tools and
    /// [`ToolRegistryError::InvalidArguments`] when validation fails.
    pub fn prepare_call(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> ToolRegistryResult<(&ToolDescriptor, Map<String, Value>)> {
        let descriptor = self.get(name)?;
        let accepted = descriptor
            .input_schema()
            .validate(arguments)
            .map_err(|violations| ToolRegistryError::InvalidArguments {
                tool: descriptor.name().clone(),
                violations,
            })?;
        Ok((descriptor, accepted))
    }

    /// Returns public metadata for every tool in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<ToolMetadata> {
        self.tools.iter().map(ToolDescriptor::metadata).collect()
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` when no tools are registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
