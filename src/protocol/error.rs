//! JSON-RPC error objects and decoding failures.

use super::{JsonRpcErrorResponse, RequestId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error codes used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Inbound bytes are not valid JSON.
    ParseError,
    /// Valid JSON that is not a valid JSON-RPC request.
    InvalidRequest,
    /// Unknown protocol method or unknown tool name.
    MethodNotFound,
    /// Arguments failed schema validation.
    InvalidParams,
    /// A tool handler failed or the server could not complete the request.
    InternalError,
    /// Transport-level rejection of a request without a usable session.
    BadRequest,
}

impl ErrorCode {
    /// Returns the numeric JSON-RPC code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::BadRequest => -32000,
        }
    }

    /// Returns the canonical message for the code.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid Request",
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
            Self::BadRequest => "Bad Request",
        }
    }
}

/// The `error` member of a JSON-RPC error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    /// Numeric error code.
    pub code: i32,
    /// Short human-readable description.
    pub message: String,
    /// Optional structured detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    /// Creates an error with the canonical message for `code`.
    #[must_use]
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code: code.code(),
            message: code.message().to_owned(),
            data: None,
        }
    }

    /// Creates an error with a custom message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }

    /// Attaches structured detail.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Failure to turn raw bytes into an [`InboundMessage`](super::InboundMessage).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DecodeError {
    /// The payload is not valid JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// The payload is JSON but not an acceptable JSON-RPC request.
    #[error("invalid request: {detail}")]
    InvalidRequest {
        /// Request id, when one could be recovered from the payload.
        id: Option<RequestId>,
        /// Explanation of what was wrong.
        detail: String,
    },
}

impl DecodeError {
    /// Frames the failure as a JSON-RPC error response.
    #[must_use]
    pub fn into_response(self) -> JsonRpcErrorResponse {
        match self {
            Self::Parse(detail) => JsonRpcErrorResponse::new(
                None,
                RpcError::new(ErrorCode::ParseError).with_data(Value::String(detail)),
            ),
            Self::InvalidRequest { id, detail } => JsonRpcErrorResponse::new(
                id,
                RpcError::new(ErrorCode::InvalidRequest).with_data(Value::String(detail)),
            ),
        }
    }
}
