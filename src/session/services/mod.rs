//! Session services.

mod registry;

pub use registry::{EventSubscription, SessionRegistry};
