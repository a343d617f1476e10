//! Dispatch errors and their JSON-RPC mapping.

use crate::protocol::{ErrorCode, RpcError};
use serde_json::Value;
use thiserror::Error;

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors a request can resolve to.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    /// The method or tool does not exist.
    #[error("{0}")]
    MethodNotFound(String),

    /// Parameters failed validation.
    #[error("{message}")]
    InvalidParams {
        /// Summary of the failure.
        message: String,
        /// Structured detail such as a violation list.
        data: Option<Value>,
    },

    /// A tool handler failed or panicked.
    #[error("{message}")]
    Internal {
        /// Summary of the failure.
        message: String,
        /// Structured detail such as the handler's message.
        data: Option<Value>,
    },
}

impl DispatchError {
    /// Creates an invalid-params error with detail.
    #[must_use]
    pub fn invalid_params(message: impl Into<String>, data: Option<Value>) -> Self {
        Self::InvalidParams {
            message: message.into(),
            data,
        }
    }

    /// Creates an internal error whose detail is `detail`.
    #[must_use]
    pub fn internal(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            data: Some(Value::String(detail.into())),
        }
    }

    /// Returns the JSON-RPC error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MethodNotFound(_) => ErrorCode::MethodNotFound,
            Self::InvalidParams { .. } => ErrorCode::InvalidParams,
            Self::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Converts into the wire error object.
    #[must_use]
    pub fn into_rpc_error(self) -> RpcError {
        let code = self.code();
        match self {
            Self::MethodNotFound(message) => RpcError::with_message(code, message),
            Self::InvalidParams { message, data } | Self::Internal { message, data } => {
                let error = RpcError::with_message(code, message);
                match data {
                    Some(detail) => error.with_data(detail),
                    None => error,
                }
            }
        }
    }
}
