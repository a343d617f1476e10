//! Port contract for event log storage.

mod store;

pub use store::{EventStore, EventStoreError, EventStoreResult};
