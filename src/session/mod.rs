//! Session management for the tool server.
//!
//! Every conversation with a client happens inside a session. The duplex
//! transport owns one implicit session for the life of its input stream;
//! the HTTP transport creates one per successful `initialize` and hands the
//! id back in the `mcp-session-id` header.
//!
//! - Domain types in [`domain`]
//! - The shared [`services::SessionRegistry`] in [`services`]

pub mod domain;
pub mod services;
