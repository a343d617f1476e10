//! Shared state for HTTP handlers.

use crate::dispatch::Dispatcher;
use crate::session::services::SessionRegistry;
use std::sync::Arc;
use std::time::Duration;

/// Default interval between SSE keep-alive comments.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(15);

/// State cloned into every HTTP handler.
#[derive(Debug, Clone)]
pub struct HttpState {
    pub(super) dispatcher: Arc<Dispatcher>,
    pub(super) sessions: Arc<SessionRegistry>,
    pub(super) service_name: Arc<str>,
    pub(super) keep_alive: Duration,
}

impl HttpState {
    /// Creates handler state reporting `service_name` from `/health`.
    #[must_use]
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        sessions: Arc<SessionRegistry>,
        service_name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            dispatcher,
            sessions,
            service_name: service_name.into(),
            keep_alive: DEFAULT_KEEP_ALIVE,
        }
    }

    /// Overrides the SSE keep-alive interval.
    #[must_use]
    pub const fn with_keep_alive(mut self, interval: Duration) -> Self {
        self.keep_alive = interval;
        self
    }

    /// Returns the session registry.
    #[must_use]
    pub const fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }
}
