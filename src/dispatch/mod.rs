//! JSON-RPC method dispatch.
//!
//! The [`Dispatcher`] turns one decoded request into exactly one result or
//! typed error. Envelope framing and delivery stay with the transports.

mod dispatcher;
mod error;

pub use dispatcher::Dispatcher;
pub use error::{DispatchError, DispatchResult};
