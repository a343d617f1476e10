//! Handler port invoked by `tools/call`.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// Result type for tool handler invocations.
pub type ToolHandlerResult<T> = Result<T, ToolHandlerError>;

/// Executes a single tool against already-validated arguments.
///
/// Arguments have passed the tool's input schema and carry declared
/// defaults. The returned value is rendered as the text content of the
/// `tools/call` result.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Runs the tool.
    async fn invoke(&self, arguments: Map<String, Value>) -> ToolHandlerResult<Value>;
}

/// Errors returned by tool handlers.
#[derive(Debug, Clone, Error)]
pub enum ToolHandlerError {
    /// The arguments are well-formed but the tool cannot serve them.
    #[error("{0}")]
    Rejected(String),

    /// Generic handler failure.
    #[error("tool handler error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl ToolHandlerError {
    /// Creates a rejection carrying a caller-facing message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Wraps a runtime error from the handler.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
