//! Session registry errors.

use super::SessionId;
use crate::event_store::ports::EventStoreError;
use std::sync::Arc;
use thiserror::Error;

/// Result type for session registry operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors returned by the session registry.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// No live session has the given id.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// Every generated id collided with an existing one.
    #[error("could not allocate a unique session id after {attempts} attempts")]
    IdExhausted {
        /// Number of ids tried.
        attempts: usize,
    },

    /// The session's event log rejected an operation.
    #[error(transparent)]
    EventStore(#[from] EventStoreError),

    /// Registry state could not be accessed.
    #[error("session registry state error: {0}")]
    State(Arc<dyn std::error::Error + Send + Sync>),
}

impl SessionError {
    /// Wraps a state access failure such as lock poisoning.
    pub fn state(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::State(Arc::new(err))
    }
}
