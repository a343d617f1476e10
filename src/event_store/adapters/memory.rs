//! In-memory implementation of the [`EventStore`] port.

use crate::event_store::domain::{Event, SequenceNumber};
use crate::event_store::ports::{EventStore, EventStoreError, EventStoreResult};
use crate::protocol::ProtocolMessage;
use crate::session::domain::SessionId;
use std::collections::{HashMap, VecDeque};
use std::num::NonZeroUsize;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Partition {
    head: SequenceNumber,
    events: VecDeque<Event>,
}

/// In-memory [`EventStore`] with optional per-session retention.
///
/// Thread-safe via internal [`RwLock`]. Without a retention limit every
/// event is kept until the session's partition is released.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventStore {
    partitions: Arc<RwLock<HashMap<SessionId, Partition>>>,
    retention: Option<NonZeroUsize>,
}

impl InMemoryEventStore {
    /// Creates a store that keeps every event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that keeps at most `limit` events per session.
    #[must_use]
    pub fn with_retention(limit: NonZeroUsize) -> Self {
        Self {
            partitions: Arc::default(),
            retention: Some(limit),
        }
    }

    /// Returns the number of sessions with a partition.
    #[must_use]
    pub fn partition_count(&self) -> usize {
        self.partitions.read().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl EventStore for InMemoryEventStore {
    fn append(&self, session: SessionId, message: ProtocolMessage) -> EventStoreResult<Event> {
        let mut guard = self
            .partitions
            .write()
            .map_err(|e| EventStoreError::storage(std::io::Error::other(e.to_string())))?;

        let partition = guard.entry(session).or_default();
        partition.head = partition.head.next();
        let event = Event::new(session, partition.head, message);
        partition.events.push_back(event.clone());

        if let Some(limit) = self.retention {
            while partition.events.len() > limit.get() {
                partition.events.pop_front();
            }
        }

        Ok(event)
    }

    fn replay_from(
        &self,
        session: SessionId,
        cursor: SequenceNumber,
    ) -> EventStoreResult<Vec<Event>> {
        let guard = self
            .partitions
            .read()
            .map_err(|e| EventStoreError::storage(std::io::Error::other(e.to_string())))?;

        let Some(partition) = guard.get(&session) else {
            return Ok(Vec::new());
        };

        if let Some(oldest) = partition.events.front().map(Event::seq) {
            if cursor.next() < oldest {
                return Err(EventStoreError::CursorExpired {
                    session,
                    cursor,
                    oldest,
                });
            }
        }

        Ok(partition
            .events
            .iter()
            .filter(|event| event.seq() > cursor)
            .cloned()
            .collect())
    }

    fn release(&self, session: SessionId) -> EventStoreResult<()> {
        let mut guard = self
            .partitions
            .write()
            .map_err(|e| EventStoreError::storage(std::io::Error::other(e.to_string())))?;

        guard.remove(&session);
        Ok(())
    }
}
