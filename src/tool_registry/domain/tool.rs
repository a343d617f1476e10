//! Tool descriptor value object.

use super::{InputSchema, ToolName, ToolRegistryDomainError};
use crate::tool_registry::ports::ToolHandler;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A registered tool: its public metadata plus the handler that serves it.
#[derive(Clone)]
pub struct ToolDescriptor {
    name: ToolName,
    description: String,
    input_schema: InputSchema,
    handler: Arc<dyn ToolHandler>,
}

impl ToolDescriptor {
    /// Creates a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] when the name is invalid or the
    /// description is empty.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: InputSchema,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<Self, ToolRegistryDomainError> {
        let tool_name = ToolName::new(name)?;

        let normalized_description = description.into().trim().to_owned();
        if normalized_description.is_empty() {
            return Err(ToolRegistryDomainError::EmptyToolDescription);
        }

        Ok(Self {
            name: tool_name,
            description: normalized_description,
            input_schema,
            handler,
        })
    }

    /// Returns the tool name.
    #[must_use]
    pub const fn name(&self) -> &ToolName {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the input schema.
    #[must_use]
    pub const fn input_schema(&self) -> &InputSchema {
        &self.input_schema
    }

    /// Returns a shared handle to the handler.
    #[must_use]
    pub fn handler(&self) -> Arc<dyn ToolHandler> {
        Arc::clone(&self.handler)
    }

    /// Returns the metadata advertised through `tools/list`.
    #[must_use]
    pub fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: self.name.as_str().to_owned(),
            description: self.description.clone(),
            input_schema: self.input_schema.to_json(),
        }
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

/// Public view of a tool as listed by `tools/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolMetadata {
    /// Tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON-Schema for the tool arguments.
    pub input_schema: Value,
}
