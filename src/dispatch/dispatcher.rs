//! Request dispatcher.

use super::{DispatchError, DispatchResult};
use crate::protocol::{
    CallToolParams, CallToolResult, InboundMessage, InitializeParams, InitializeResult,
    JsonRpcErrorResponse, JsonRpcRequest, JsonRpcResponse, ProtocolMessage, ServerCapabilities,
    ServerInfo, decode_message,
};
use crate::tool_registry::services::{ToolRegistry, ToolRegistryError};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{Instrument, debug, error, info_span, warn};

/// Translates inbound requests into results against a [`ToolRegistry`].
///
/// Holds no per-session state; transports serialize calls per session.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    server_info: ServerInfo,
    instructions: Option<String>,
}

impl Dispatcher {
    /// Creates a dispatcher for `registry`.
    #[must_use]
    pub const fn new(registry: Arc<ToolRegistry>, server_info: ServerInfo) -> Self {
        Self {
            registry,
            server_info,
            instructions: None,
        }
    }

    /// Sets the usage hint returned by `initialize`.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Returns the tool registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Returns the server identity.
    #[must_use]
    pub const fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Resolves one request to its result value.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] for unknown methods or tools, invalid
    /// parameters and handler failures.
    pub async fn dispatch(&self, request: &JsonRpcRequest) -> DispatchResult<Value> {
        match request.method.as_str() {
            "initialize" => self.initialize(&request.params),
            "tools/list" => Ok(self.list_tools()),
            "tools/call" => self.call_tool(&request.params).await,
            "ping" => Ok(json!({})),
            other => Err(DispatchError::MethodNotFound(format!(
                "Method not found: {other}"
            ))),
        }
    }

    /// Resolves one request and frames the outcome as a response envelope.
    pub async fn handle(&self, request: &JsonRpcRequest) -> ProtocolMessage {
        debug!(method = %request.method, id = %request.id, "dispatching request");
        match self.dispatch(request).await {
            Ok(result) => JsonRpcResponse::new(request.id.clone(), result).into(),
            Err(err) => {
                debug!(method = %request.method, id = %request.id, error = %err, "request failed");
                JsonRpcErrorResponse::new(Some(request.id.clone()), err.into_rpc_error()).into()
            }
        }
    }

    /// Handles a decoded message. Notifications produce no response.
    pub async fn handle_inbound(&self, message: &InboundMessage) -> Option<ProtocolMessage> {
        match message {
            InboundMessage::Request(request) => Some(self.handle(request).await),
            InboundMessage::Notification(notification) => {
                debug!(method = %notification.method, "notification accepted");
                None
            }
        }
    }

    /// Decodes and handles raw bytes.
    ///
    /// Decoding failures are answered with a parse or invalid-request error.
    pub async fn handle_bytes(&self, raw: &[u8]) -> Option<ProtocolMessage> {
        match decode_message(raw) {
            Ok(message) => self.handle_inbound(&message).await,
            Err(err) => {
                debug!(error = %err, "rejecting undecodable message");
                Some(err.into_response().into())
            }
        }
    }

    fn initialize(&self, params: &Value) -> DispatchResult<Value> {
        let requested = if params.is_null() {
            InitializeParams::default()
        } else {
            serde_json::from_value::<InitializeParams>(params.clone()).map_err(|err| {
                DispatchError::invalid_params(
                    "Invalid initialize params",
                    Some(Value::String(err.to_string())),
                )
            })?
        };

        let result = InitializeResult {
            protocol_version: InitializeResult::negotiate_version(
                requested.protocol_version.as_deref(),
            )
            .to_owned(),
            server_info: self.server_info.clone(),
            capabilities: ServerCapabilities::default(),
            instructions: self.instructions.clone(),
        };
        serde_json::to_value(result)
            .map_err(|err| DispatchError::internal("Internal error", err.to_string()))
    }

    fn list_tools(&self) -> Value {
        json!({ "tools": self.registry.list() })
    }

    async fn call_tool(&self, params: &Value) -> DispatchResult<Value> {
        if params.is_null() {
            return Err(DispatchError::invalid_params(
                "tools/call requires params",
                None,
            ));
        }
        let call: CallToolParams = serde_json::from_value(params.clone()).map_err(|err| {
            DispatchError::invalid_params(
                "Invalid tools/call params",
                Some(Value::String(err.to_string())),
            )
        })?;
        let arguments = call.arguments.unwrap_or_default();

        let (descriptor, accepted) = self
            .registry
            .prepare_call(&call.name, &arguments)
            .map_err(registry_error)?;
        let tool = descriptor.name().clone();
        let handler = descriptor.handler();

        let span = info_span!("tool.invoke", tool = %tool);
        let outcome =
            tokio::spawn(async move { handler.invoke(accepted).await }.instrument(span)).await;

        match outcome {
            Ok(Ok(payload)) => CallToolResult::json_text(&payload)
                .and_then(serde_json::to_value)
                .map_err(|err| DispatchError::internal("Internal error", err.to_string())),
            Ok(Err(err)) => {
                warn!(tool = %tool, error = %err, "tool handler failed");
                Err(DispatchError::internal(
                    format!("Tool '{tool}' failed"),
                    err.to_string(),
                ))
            }
            Err(join_error) => {
                error!(tool = %tool, error = %join_error, "tool handler aborted");
                let detail = if join_error.is_panic() {
                    "tool handler panicked"
                } else {
                    "tool handler was cancelled"
                };
                Err(DispatchError::internal(format!("Tool '{tool}' failed"), detail))
            }
        }
    }
}

fn registry_error(err: ToolRegistryError) -> DispatchError {
    match err {
        ToolRegistryError::NotFound(name) => {
            DispatchError::MethodNotFound(format!("Unknown tool: {name}"))
        }
        ToolRegistryError::InvalidArguments { tool, violations } => DispatchError::invalid_params(
            format!("Invalid arguments for tool '{tool}'"),
            Some(Value::Array(
                violations
                    .iter()
                    .map(|violation| Value::String(violation.to_string()))
                    .collect(),
            )),
        ),
        other => DispatchError::internal("Internal error", other.to_string()),
    }
}
