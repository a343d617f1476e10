//! Streamable HTTP transport.
//!
//! `/mcp` carries sessions: `POST` delivers client messages, `GET` opens a
//! resumable SSE stream and `DELETE` terminates the session. `POST /` and
//! `POST /ndjson` answer single requests as chunked NDJSON without a
//! session. `GET /health` reports liveness.

mod headers;
mod health;
mod ndjson;
mod sse;
mod state;
mod streamable;

pub use headers::{LAST_EVENT_ID_HEADER, SESSION_HEADER};
pub use health::HealthReport;
pub use ndjson::NDJSON_CONTENT_TYPE;
pub use state::{DEFAULT_KEEP_ALIVE, HttpState};

use axum::Router;
use axum::routing::{get, post};
use std::future::{Future, IntoFuture};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Builds the application router.
#[must_use]
pub fn router(state: HttpState) -> Router {
    Router::new()
        .route(
            "/mcp",
            post(streamable::post)
                .get(streamable::get)
                .delete(streamable::delete),
        )
        .route("/health", get(health::health))
        .route("/", post(ndjson::post))
        .route("/ndjson", post(ndjson::post))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `state` on `listener` until `shutdown` resolves.
///
/// On shutdown every live session is closed, which ends attached event
/// streams. In-flight requests then get `drain_timeout` to finish before the
/// server stops waiting for them.
///
/// # Errors
///
/// Returns the I/O error that stopped the accept loop.
pub async fn serve(
    listener: TcpListener,
    state: HttpState,
    shutdown: impl Future<Output = ()> + Send + 'static,
    drain_timeout: Duration,
) -> std::io::Result<()> {
    let sessions = std::sync::Arc::clone(state.sessions());
    let (drain_tx, drain_rx) = oneshot::channel::<()>();

    let graceful = async move {
        shutdown.await;
        let closed = sessions.close_all();
        info!(closed, "shutdown requested, sessions closed");
        if drain_tx.send(()).is_err() {
            debug!("server already stopped");
        }
    };

    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "http transport listening");
    }

    let server = axum::serve(listener, router(state))
        .with_graceful_shutdown(graceful)
        .into_future();
    let deadline = async move {
        if drain_rx.await.is_ok() {
            tokio::time::sleep(drain_timeout).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        outcome = server => outcome,
        () = deadline => {
            warn!(?drain_timeout, "in-flight requests did not drain in time");
            Ok(())
        }
    }
}
