//! Event store port.

use crate::event_store::domain::{Event, SequenceNumber};
use crate::protocol::ProtocolMessage;
use crate::session::domain::SessionId;
use std::sync::Arc;
use thiserror::Error;

/// Result type for event store operations.
pub type EventStoreResult<T> = Result<T, EventStoreError>;

/// Append-only, per-session event log.
///
/// Operations are synchronous: the session registry appends while holding
/// its write lock so that append order equals delivery order.
pub trait EventStore: Send + Sync {
    /// Appends `message` to the session's log and returns the stored event.
    ///
    /// # Errors
    ///
    /// Returns [`EventStoreError::Storage`] if the log cannot be written.
    fn append(&self, session: SessionId, message: ProtocolMessage) -> EventStoreResult<Event>;

    /// Returns every event with a sequence number greater than `cursor`, in
    /// order. A cursor at or beyond the head yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`EventStoreError::CursorExpired`] when events after `cursor`
    /// have been trimmed by retention.
    fn replay_from(&self, session: SessionId, cursor: SequenceNumber)
    -> EventStoreResult<Vec<Event>>;

    /// Drops the session's partition.
    ///
    /// # Errors
    ///
    /// Returns [`EventStoreError::Storage`] if the log cannot be accessed.
    fn release(&self, session: SessionId) -> EventStoreResult<()>;
}

/// Errors returned by event store adapters.
#[derive(Debug, Clone, Error)]
pub enum EventStoreError {
    /// The requested cursor precedes the retained window.
    #[error("cursor {cursor} for session {session} has expired (oldest retained event is {oldest})")]
    CursorExpired {
        /// Session whose log was queried.
        session: SessionId,
        /// Requested cursor.
        cursor: SequenceNumber,
        /// Oldest event still retained.
        oldest: SequenceNumber,
    },

    /// Generic storage failure.
    #[error("event store error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl EventStoreError {
    /// Wraps a storage error from the adapter.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
