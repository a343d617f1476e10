//! Port contracts for tool execution.

mod handler;

pub use handler::{ToolHandler, ToolHandlerError, ToolHandlerResult};
