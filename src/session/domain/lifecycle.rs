//! Lifecycle notifications published by the session registry.

use super::SessionId;

/// Broadcast when a session opens or closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLifecycleEvent {
    /// A session was created.
    Created(SessionId),
    /// A session was closed and its id retired.
    Closed(SessionId),
}

impl SessionLifecycleEvent {
    /// Returns the session the event refers to.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        match self {
            Self::Created(id) | Self::Closed(id) => *id,
        }
    }
}

/// What a `close` call actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The session was live and is now closed.
    Closed,
    /// The id had already been retired; nothing changed.
    AlreadyClosed,
}
