//! Function-backed tool handler.

use crate::tool_registry::ports::{ToolHandler, ToolHandlerResult};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Adapts a synchronous function into a [`ToolHandler`].
#[derive(Debug, Clone)]
pub struct FnToolHandler<F> {
    function: F,
}

impl<F> FnToolHandler<F>
where
    F: Fn(Map<String, Value>) -> ToolHandlerResult<Value> + Send + Sync,
{
    /// Wraps `function`.
    #[must_use]
    pub const fn new(function: F) -> Self {
        Self { function }
    }
}

#[async_trait]
impl<F> ToolHandler for FnToolHandler<F>
where
    F: Fn(Map<String, Value>) -> ToolHandlerResult<Value> + Send + Sync,
{
    async fn invoke(&self, arguments: Map<String, Value>) -> ToolHandlerResult<Value> {
        (self.function)(arguments)
    }
}
