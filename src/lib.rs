//! Waypoint: a travel tool server speaking the Model Context Protocol.
//!
//! Clients discover and invoke sample travel tools (weather, flights and
//! places) through JSON-RPC 2.0 over either a duplex line stream or
//! streamable HTTP with resumable server-sent events.
//!
//! # Architecture
//!
//! Waypoint follows hexagonal architecture principles:
//!
//! - **Domain**: tool descriptors, schemas, sessions and events
//! - **Ports**: [`ToolHandler`](tool_registry::ports::ToolHandler) and
//!   [`EventStore`](event_store::ports::EventStore)
//! - **Adapters**: the sample travel catalog, the in-memory event store and
//!   the duplex and HTTP transports
//!
//! # Modules
//!
//! - [`protocol`]: JSON-RPC wire types and decoding
//! - [`tool_registry`]: tool descriptors, argument validation and catalog
//! - [`dispatch`]: method routing and error mapping
//! - [`session`]: session lifecycle and per-session event feeds
//! - [`event_store`]: append-only per-session event log
//! - [`transport`]: duplex and HTTP adapters
//! - [`config`], [`telemetry`], [`server`]: process assembly

pub mod config;
pub mod dispatch;
pub mod event_store;
pub mod protocol;
pub mod server;
pub mod session;
pub mod telemetry;
pub mod tool_registry;
pub mod transport;
