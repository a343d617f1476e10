//! Accessors for schema-validated tool arguments.

use crate::tool_registry::ports::{ToolHandlerError, ToolHandlerResult};
use serde_json::{Map, Value};

pub(super) fn required_str<'a>(
    arguments: &'a Map<String, Value>,
    key: &str,
) -> ToolHandlerResult<&'a str> {
    optional_str(arguments, key)
        .ok_or_else(|| ToolHandlerError::rejected(format!("missing argument '{key}'")))
}

pub(super) fn optional_str<'a>(arguments: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    arguments.get(key).and_then(Value::as_str)
}

pub(super) fn count(arguments: &Map<String, Value>, key: &str, fallback: u64) -> u64 {
    arguments
        .get(key)
        .and_then(Value::as_u64)
        .unwrap_or(fallback)
}
