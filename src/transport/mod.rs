//! Transport adapters.
//!
//! Each adapter moves JSON-RPC messages between a byte channel and the
//! [`Dispatcher`](crate::dispatch::Dispatcher):
//!
//! - [`duplex`]: newline-delimited JSON over a bidirectional stream
//! - [`http`]: streamable HTTP with sessions and SSE resumption, plus the
//!   session-less chunked NDJSON endpoint

pub mod duplex;
mod error;
pub mod http;

pub use duplex::DuplexTransport;
pub use error::TransportError;
