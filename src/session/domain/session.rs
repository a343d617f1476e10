//! Session aggregate.

use super::SessionId;
use crate::event_store::domain::SequenceNumber;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport a session is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportBinding {
    /// Single bidirectional byte stream, such as stdin/stdout.
    Duplex,
    /// Streamable HTTP with SSE delivery.
    HttpStream,
}

impl TransportBinding {
    /// Returns the canonical binding name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Duplex => "duplex",
            Self::HttpStream => "http-stream",
        }
    }
}

impl fmt::Display for TransportBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a session's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    created_at: DateTime<Utc>,
    binding: TransportBinding,
    last_event_seq: Option<SequenceNumber>,
    open: bool,
}

impl Session {
    /// Creates an open session with no recorded events.
    #[must_use]
    pub fn new(id: SessionId, binding: TransportBinding, clock: &(impl Clock + ?Sized)) -> Self {
        Self {
            id,
            created_at: clock.utc(),
            binding,
            last_event_seq: None,
            open: true,
        }
    }

    /// Returns the session id.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the transport binding.
    #[must_use]
    pub const fn binding(&self) -> TransportBinding {
        self.binding
    }

    /// Returns the sequence number of the latest recorded event.
    #[must_use]
    pub const fn last_event_seq(&self) -> Option<SequenceNumber> {
        self.last_event_seq
    }

    /// Returns `true` until the session is closed.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) const fn record_event(&mut self, seq: SequenceNumber) {
        self.last_event_seq = Some(seq);
    }

    pub(crate) const fn mark_closed(&mut self) {
        self.open = false;
    }
}
