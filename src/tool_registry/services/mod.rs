//! Application services for tool registration and lookup.

mod registry;

pub use registry::{ToolRegistry, ToolRegistryError, ToolRegistryResult};
