//! JSON-RPC 2.0 wire types for the Model Context Protocol surface.
//!
//! The protocol layer is transport-free: it decodes one inbound message from
//! raw bytes and frames outbound [`ProtocolMessage`] envelopes. Both the
//! duplex and the HTTP transports share these types.

mod content;
mod error;
mod initialize;
mod message;

pub use content::{CallToolParams, CallToolResult, ContentBlock};
pub use error::{DecodeError, ErrorCode, RpcError};
pub use initialize::{
    InitializeParams, InitializeResult, LATEST_PROTOCOL_VERSION, ServerCapabilities, ServerInfo,
    SUPPORTED_PROTOCOL_VERSIONS, ToolCapabilities,
};
pub use message::{
    InboundMessage, JsonRpcErrorResponse, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
    JsonRpcVersion, ProtocolMessage, RequestId, decode_message,
};
