//! `tools/call` parameter and result payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters of a `tools/call` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Registered tool name.
    pub name: String,
    /// Tool arguments; an omitted value is treated as an empty object.
    #[serde(default)]
    pub arguments: Option<Map<String, Value>>,
}

/// One block of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text content.
    Text {
        /// The text payload.
        text: String,
    },
}

/// Result of a successful `tools/call`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    /// Output blocks.
    pub content: Vec<ContentBlock>,
    /// Set when the tool reports a domain-level failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallToolResult {
    /// Wraps a handler payload as a single pretty-printed JSON text block.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if `payload` cannot be encoded.
    pub fn json_text(payload: &Value) -> Result<Self, serde_json::Error> {
        Ok(Self {
            content: vec![ContentBlock::Text {
                text: serde_json::to_string_pretty(payload)?,
            }],
            is_error: None,
        })
    }

    /// Returns the text of the first block, if any.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|block| match block {
            ContentBlock::Text { text } => text.as_str(),
        })
    }
}
