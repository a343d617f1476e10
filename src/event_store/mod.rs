//! Per-session log of outbound protocol messages.
//!
//! The streaming HTTP transport records every response it sends so that a
//! client reconnecting with `last-event-id` can resume without loss.
//!
//! - Domain types in [`domain`]
//! - The [`ports::EventStore`] contract in [`ports`]
//! - The in-memory implementation in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
