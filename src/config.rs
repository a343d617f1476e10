//! Command-line and environment configuration.
//!
//! [`ServerArgs`] is the raw `clap` surface; [`ServerConfig`] is the
//! validated form the server runs from.

use crate::tool_registry::adapters::Catalog;
use clap::{Parser, ValueEnum};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroUsize;
use std::time::Duration;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Default graceful shutdown budget in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// Transport the server speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportKind {
    /// Newline-delimited JSON over standard input and output.
    #[default]
    Stdio,
    /// Streamable HTTP with SSE and the NDJSON endpoint.
    Http,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        })
    }
}

/// Raw command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "waypoint", version, about = "Travel tool server speaking MCP")]
pub struct ServerArgs {
    /// Transport to serve.
    #[arg(long, value_enum, env = "WAYPOINT_TRANSPORT", default_value_t = TransportKind::Stdio)]
    pub transport: TransportKind,

    /// Address the HTTP transport binds to.
    #[arg(long, env = "WAYPOINT_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// HTTP port. Defaults to the catalog's conventional port.
    #[arg(long, env = "WAYPOINT_PORT")]
    pub port: Option<u16>,

    /// Tool catalog to expose: weather, flights, places or all.
    #[arg(long, env = "WAYPOINT_CATALOG", default_value_t = Catalog::All)]
    pub catalog: Catalog,

    /// Events retained per session for SSE resumption. Unlimited when unset.
    #[arg(long, env = "WAYPOINT_EVENT_RETENTION")]
    pub event_retention: Option<usize>,

    /// Seconds in-flight HTTP requests get to finish after shutdown.
    #[arg(
        long,
        env = "WAYPOINT_SHUTDOWN_TIMEOUT_SECS",
        default_value_t = DEFAULT_SHUTDOWN_TIMEOUT_SECS
    )]
    pub shutdown_timeout_secs: u64,

    /// Log filter directives, e.g. `info,waypoint=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,

    /// Emit logs as JSON lines.
    #[arg(long, env = "WAYPOINT_LOG_JSON")]
    pub log_json: bool,
}

/// Errors raised while validating [`ServerArgs`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Event retention must keep at least one event.
    #[error("event retention must be at least 1")]
    ZeroRetention,

    /// The log filter could not be parsed.
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidLogFilter {
        /// The rejected directives.
        filter: String,
        /// Parser explanation.
        reason: String,
    },
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Validated filter directives.
    pub filter: String,
    /// JSON output instead of human-readable lines.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            json: false,
        }
    }
}

/// Validated server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Transport to serve.
    pub transport: TransportKind,
    /// HTTP bind address.
    pub bind: SocketAddr,
    /// Tool catalog to expose.
    pub catalog: Catalog,
    /// Per-session event retention.
    pub event_retention: Option<NonZeroUsize>,
    /// Graceful shutdown budget for in-flight HTTP requests.
    pub shutdown_timeout: Duration,
    /// Logging settings.
    pub log: LogConfig,
}

impl ServerConfig {
    /// Returns a stdio configuration for `catalog` with default settings.
    #[must_use]
    pub fn for_catalog(catalog: Catalog) -> Self {
        Self {
            transport: TransportKind::Stdio,
            bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), catalog.default_port()),
            catalog,
            event_retention: None,
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            log: LogConfig::default(),
        }
    }
}

impl TryFrom<ServerArgs> for ServerConfig {
    type Error = ConfigError;

    fn try_from(args: ServerArgs) -> Result<Self, Self::Error> {
        let event_retention = args
            .event_retention
            .map(|limit| NonZeroUsize::new(limit).ok_or(ConfigError::ZeroRetention))
            .transpose()?;

        if let Err(err) = EnvFilter::try_new(&args.log_filter) {
            return Err(ConfigError::InvalidLogFilter {
                filter: args.log_filter,
                reason: err.to_string(),
            });
        }

        let port = args.port.unwrap_or_else(|| args.catalog.default_port());
        Ok(Self {
            transport: args.transport,
            bind: SocketAddr::new(args.host, port),
            catalog: args.catalog,
            event_retention,
            shutdown_timeout: Duration::from_secs(args.shutdown_timeout_secs),
            log: LogConfig {
                filter: args.log_filter,
                json: args.log_json,
            },
        })
    }
}
