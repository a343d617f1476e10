//! Recorded outbound message.

use super::SequenceNumber;
use crate::protocol::ProtocolMessage;
use crate::session::domain::SessionId;

/// One outbound protocol message in a session's log. Never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    session: SessionId,
    seq: SequenceNumber,
    payload: ProtocolMessage,
}

impl Event {
    /// Creates an event.
    #[must_use]
    pub const fn new(session: SessionId, seq: SequenceNumber, payload: ProtocolMessage) -> Self {
        Self {
            session,
            seq,
            payload,
        }
    }

    /// Returns the owning session.
    #[must_use]
    pub const fn session(&self) -> SessionId {
        self.session
    }

    /// Returns the event's position in the session log.
    #[must_use]
    pub const fn seq(&self) -> SequenceNumber {
        self.seq
    }

    /// Returns the recorded message.
    #[must_use]
    pub const fn payload(&self) -> &ProtocolMessage {
        &self.payload
    }
}
