//! `initialize` handshake payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Most recent protocol revision understood by the server.
pub const LATEST_PROTOCOL_VERSION: &str = "2025-06-18";

/// Protocol revisions the server will echo back when a client requests them.
pub const SUPPORTED_PROTOCOL_VERSIONS: [&str; 3] =
    [LATEST_PROTOCOL_VERSION, "2025-03-26", "2024-11-05"];

/// Client-supplied `initialize` parameters. All fields are optional so that
/// minimal clients can still establish a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Requested protocol revision.
    #[serde(default)]
    pub protocol_version: Option<String>,
    /// Declared client capabilities.
    #[serde(default)]
    pub capabilities: Option<Value>,
    /// Client identity.
    #[serde(default)]
    pub client_info: Option<Value>,
}

/// Server identity reported during `initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl ServerInfo {
    /// Creates a server identity.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Tool-related capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCapabilities {
    /// `tools/list` is available.
    pub list: bool,
    /// `tools/call` is available.
    pub call: bool,
}

/// Capabilities declared by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Tool capabilities.
    pub tools: ToolCapabilities,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            tools: ToolCapabilities {
                list: true,
                call: true,
            },
        }
    }
}

/// Result of a successful `initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Negotiated protocol revision.
    pub protocol_version: String,
    /// Server identity.
    pub server_info: ServerInfo,
    /// Declared capabilities.
    pub capabilities: ServerCapabilities,
    /// Optional usage hints for the calling agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl InitializeResult {
    /// Picks the protocol revision to report for a requested one.
    ///
    /// Supported revisions are echoed; anything else falls back to
    /// [`LATEST_PROTOCOL_VERSION`].
    #[must_use]
    pub fn negotiate_version(requested: Option<&str>) -> &'static str {
        requested
            .and_then(|wanted| {
                SUPPORTED_PROTOCOL_VERSIONS
                    .iter()
                    .find(|supported| **supported == wanted)
                    .copied()
            })
            .unwrap_or(LATEST_PROTOCOL_VERSION)
    }
}
