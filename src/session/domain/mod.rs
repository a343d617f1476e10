//! Session domain model.

mod error;
mod ids;
mod lifecycle;
mod session;

pub use error::{SessionError, SessionResult};
pub use ids::SessionId;
pub use lifecycle::{CloseOutcome, SessionLifecycleEvent};
pub use session::{Session, TransportBinding};
