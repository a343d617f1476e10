//! Tool registration and schema validation for the Waypoint tool server.
//!
//! A [`services::ToolRegistry`] maps tool names to typed descriptors carrying
//! a structural input schema and an async handler. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations (the sample travel catalog) in [`adapters`]
//! - The registry itself in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
