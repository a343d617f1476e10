//! Shared fixtures for in-memory integration tests.

use mockable::{Clock, DefaultClock};
use rstest::fixture;
use serde_json::json;
use std::sync::Arc;
use waypoint::event_store::adapters::InMemoryEventStore;
use waypoint::event_store::ports::EventStore;
use waypoint::protocol::{JsonRpcResponse, ProtocolMessage, RequestId};
use waypoint::session::services::SessionRegistry;

/// Provides a clock for session creation.
#[fixture]
pub fn clock() -> Arc<dyn Clock + Send + Sync> {
    Arc::new(DefaultClock)
}

/// Provides a shared store that keeps every event.
#[fixture]
pub fn store() -> Arc<InMemoryEventStore> {
    Arc::new(InMemoryEventStore::new())
}

/// Builds a registry over `store`.
pub fn registry_over(
    store: Arc<InMemoryEventStore>,
    clock: Arc<dyn Clock + Send + Sync>,
) -> SessionRegistry {
    let events: Arc<dyn EventStore> = store;
    SessionRegistry::new(events, clock)
}

/// Provides a registry over a fresh unbounded store.
#[fixture]
pub fn registry(
    store: Arc<InMemoryEventStore>,
    clock: Arc<dyn Clock + Send + Sync>,
) -> SessionRegistry {
    registry_over(store, clock)
}

/// A successful response carrying `n` as both id and payload.
pub fn numbered_response(n: i64) -> ProtocolMessage {
    JsonRpcResponse::new(RequestId::from(n), json!({"n": n})).into()
}
