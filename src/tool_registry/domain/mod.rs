//! Domain model for tool descriptors and their input schemas.
//!
//! Descriptors are immutable once built. Schemas are validated at
//! construction so that every registered tool exposes a well-formed
//! JSON-Schema object through `tools/list`.

mod error;
mod ids;
mod schema;
mod tool;

pub use error::{SchemaViolation, ToolRegistryDomainError};
pub use ids::ToolName;
pub use schema::{InputSchema, PropertySchema, SchemaType};
pub use tool::{ToolDescriptor, ToolMetadata};
