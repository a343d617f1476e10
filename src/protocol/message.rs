//! JSON-RPC request, response and notification envelopes.

use super::{DecodeError, RpcError};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Method namespace whose messages are accepted without an `id`.
const NOTIFICATION_PREFIX: &str = "notifications/";

/// The literal `"2.0"` carried by every envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct JsonRpcVersion;

impl JsonRpcVersion {
    /// Wire representation.
    pub const VALUE: &'static str = "2.0";
}

impl Serialize for JsonRpcVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(Self::VALUE)
    }
}

impl<'de> Deserialize<'de> for JsonRpcVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        if value == Self::VALUE {
            Ok(Self)
        } else {
            Err(de::Error::custom(format!(
                "unsupported jsonrpc version '{value}'"
            )))
        }
    }
}

/// Request identifier correlating a request with its response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric identifier, echoed back exactly as received.
    Number(Number),
    /// String identifier.
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(formatter, "{value}"),
            Self::String(value) => formatter.write_str(value),
        }
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

/// A request expecting exactly one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    jsonrpc: JsonRpcVersion,
    /// Correlation id.
    pub id: RequestId,
    /// Protocol method name.
    pub method: String,
    /// Method parameters, `null` when omitted.
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    /// Creates a request envelope.
    #[must_use]
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            id: id.into(),
            method: method.into(),
            params,
        }
    }
}

/// A one-way message that never receives a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    jsonrpc: JsonRpcVersion,
    /// Notification method name.
    pub method: String,
    /// Notification parameters.
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcNotification {
    /// Creates a notification envelope.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            method: method.into(),
            params,
        }
    }
}

/// A successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    jsonrpc: JsonRpcVersion,
    /// Id of the request being answered.
    pub id: RequestId,
    /// Method result.
    pub result: Value,
}

impl JsonRpcResponse {
    /// Creates a success envelope.
    #[must_use]
    pub const fn new(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            id,
            result,
        }
    }
}

/// An error response. `id` is `null` when the request could not be
/// correlated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorResponse {
    jsonrpc: JsonRpcVersion,
    /// Id of the failed request, if known.
    pub id: Option<RequestId>,
    /// Error detail.
    pub error: RpcError,
}

impl JsonRpcErrorResponse {
    /// Creates an error envelope.
    #[must_use]
    pub const fn new(id: Option<RequestId>, error: RpcError) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            id,
            error,
        }
    }
}

/// Outbound protocol message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProtocolMessage {
    /// Server-initiated request.
    Request(JsonRpcRequest),
    /// Successful reply.
    Response(JsonRpcResponse),
    /// Error reply.
    ErrorResponse(JsonRpcErrorResponse),
}

impl ProtocolMessage {
    /// Returns the correlation id, if the message carries one.
    #[must_use]
    pub const fn id(&self) -> Option<&RequestId> {
        match self {
            Self::Request(request) => Some(&request.id),
            Self::Response(response) => Some(&response.id),
            Self::ErrorResponse(response) => response.id.as_ref(),
        }
    }

    /// Returns `true` for error responses.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::ErrorResponse(_))
    }

    /// Encodes the message as compact single-line JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error when a payload value cannot be encoded.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<JsonRpcResponse> for ProtocolMessage {
    fn from(value: JsonRpcResponse) -> Self {
        Self::Response(value)
    }
}

impl From<JsonRpcErrorResponse> for ProtocolMessage {
    fn from(value: JsonRpcErrorResponse) -> Self {
        Self::ErrorResponse(value)
    }
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Request requiring a response.
    Request(JsonRpcRequest),
    /// Notification requiring no response.
    Notification(JsonRpcNotification),
}

impl InboundMessage {
    /// Returns the method name.
    #[must_use]
    pub fn method(&self) -> &str {
        match self {
            Self::Request(request) => &request.method,
            Self::Notification(notification) => &notification.method,
        }
    }

    /// Returns `true` when this is an `initialize` request.
    #[must_use]
    pub fn is_initialize(&self) -> bool {
        matches!(self, Self::Request(request) if request.method == "initialize")
    }
}

/// Decodes one inbound JSON-RPC message.
///
/// A message without `id` is accepted only in the `notifications/` method
/// namespace; batches are not supported.
///
/// # Errors
///
/// Returns [`DecodeError::Parse`] for malformed JSON and
/// [`DecodeError::InvalidRequest`] for JSON that is not a valid request.
pub fn decode_message(raw: &[u8]) -> Result<InboundMessage, DecodeError> {
    let value: Value =
        serde_json::from_slice(raw).map_err(|err| DecodeError::Parse(err.to_string()))?;

    let object = match value {
        Value::Object(object) => object,
        Value::Array(_) => return Err(invalid(None, "batching not supported")),
        _ => return Err(invalid(None, "request must be a JSON object")),
    };

    let id = recover_id(&object);
    if object.get("jsonrpc").and_then(Value::as_str) != Some(JsonRpcVersion::VALUE) {
        return Err(invalid(id, "jsonrpc must be \"2.0\""));
    }

    let Some(method) = object.get("method").and_then(Value::as_str) else {
        return Err(invalid(id, "method must be a string"));
    };

    if !object.contains_key("id") {
        if method.starts_with(NOTIFICATION_PREFIX) {
            return serde_json::from_value(Value::Object(object))
                .map(InboundMessage::Notification)
                .map_err(|err| invalid(None, err.to_string()));
        }
        return Err(invalid(None, format!("request '{method}' is missing an id")));
    }

    if id.is_none() {
        return Err(invalid(None, "id must be a number or a string"));
    }

    serde_json::from_value(Value::Object(object))
        .map(InboundMessage::Request)
        .map_err(|err| invalid(id, err.to_string()))
}

fn recover_id(object: &Map<String, Value>) -> Option<RequestId> {
    match object.get("id")? {
        Value::Number(number) => Some(RequestId::Number(number.clone())),
        Value::String(value) => Some(RequestId::String(value.clone())),
        _ => None,
    }
}

fn invalid(id: Option<RequestId>, detail: impl Into<String>) -> DecodeError {
    DecodeError::InvalidRequest {
        id,
        detail: detail.into(),
    }
}
