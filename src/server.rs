//! Server assembly: wires the catalog, dispatcher and session registry to the
//! configured transport.

use crate::config::{ServerConfig, TransportKind};
use crate::dispatch::Dispatcher;
use crate::event_store::adapters::InMemoryEventStore;
use crate::event_store::ports::EventStore;
use crate::protocol::ServerInfo;
use crate::session::services::SessionRegistry;
use crate::tool_registry::services::ToolRegistryError;
use crate::transport::http::{self, HttpState};
use crate::transport::{DuplexTransport, TransportError};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The tool catalog could not be assembled.
    #[error("failed to build tool registry: {0}")]
    Registry(#[from] ToolRegistryError),

    /// Binding or serving the HTTP listener failed.
    #[error("http transport failed: {0}")]
    Io(#[from] std::io::Error),

    /// The duplex transport failed.
    #[error("duplex transport failed: {0}")]
    Transport(#[from] TransportError),
}

/// Shared services every transport runs on.
#[derive(Debug, Clone)]
pub struct Services {
    /// Request dispatcher over the configured catalog.
    pub dispatcher: Arc<Dispatcher>,
    /// Registry of live sessions.
    pub sessions: Arc<SessionRegistry>,
}

impl Services {
    /// Builds the dispatcher and session registry for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError::Registry`] when the catalog is malformed.
    pub fn build(
        config: &ServerConfig,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Result<Self, ServeError> {
        let registry = config.catalog.build_registry(&clock)?;
        info!(
            catalog = %config.catalog,
            tools = registry.len(),
            "tool catalog loaded"
        );

        let server_info =
            ServerInfo::new(config.catalog.service_name(), env!("CARGO_PKG_VERSION"));
        let dispatcher = Dispatcher::new(Arc::new(registry), server_info);

        let store = config
            .event_retention
            .map_or_else(InMemoryEventStore::new, InMemoryEventStore::with_retention);
        let events: Arc<dyn EventStore> = Arc::new(store);

        Ok(Self {
            dispatcher: Arc::new(dispatcher),
            sessions: Arc::new(SessionRegistry::new(events, clock)),
        })
    }
}

/// Runs the server until the transport finishes or Ctrl-C arrives.
///
/// # Errors
///
/// Returns [`ServeError`] when assembly, binding or the transport fails.
pub async fn run(config: &ServerConfig) -> Result<(), ServeError> {
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(DefaultClock);
    let services = Services::build(config, clock)?;

    match config.transport {
        TransportKind::Stdio => run_stdio(&services).await,
        TransportKind::Http => run_http(config, services).await,
    }
}

async fn run_stdio(services: &Services) -> Result<(), ServeError> {
    let transport = DuplexTransport::new(
        Arc::clone(&services.dispatcher),
        Arc::clone(&services.sessions),
    );

    tokio::select! {
        outcome = transport.run_stdio() => outcome?,
        () = shutdown_signal() => {
            let closed = services.sessions.close_all();
            info!(closed, "shutdown requested");
        }
    }
    Ok(())
}

async fn run_http(config: &ServerConfig, services: Services) -> Result<(), ServeError> {
    let listener = TcpListener::bind(config.bind).await?;
    let state = HttpState::new(
        services.dispatcher,
        services.sessions,
        config.catalog.service_name(),
    );

    http::serve(listener, state, shutdown_signal(), config.shutdown_timeout).await?;
    info!("http transport stopped");
    Ok(())
}

/// Resolves on Ctrl-C. A failed signal handler never resolves.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
