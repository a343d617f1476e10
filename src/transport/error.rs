//! Transport errors.

use crate::session::domain::SessionError;
use thiserror::Error;

/// Errors that end a transport loop.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Reading or writing the underlying stream failed.
    #[error("transport I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// An outbound message could not be encoded.
    #[error("failed to encode outbound message: {0}")]
    Encode(#[from] serde_json::Error),

    /// The session backing the transport could not be managed.
    #[error(transparent)]
    Session(#[from] SessionError),
}
