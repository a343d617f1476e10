//! Server-sent event framing and resumable per-session streams.

use super::headers::with_session_header;
use crate::event_store::domain::{Event, SequenceNumber};
use crate::session::domain::SessionId;
use crate::session::services::{EventSubscription, SessionRegistry};
use axum::response::sse::{self, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures_util::future;
use futures_util::stream::{self, Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

fn frame(event: &Event) -> Result<sse::Event, axum::Error> {
    sse::Event::default()
        .id(event.seq().to_string())
        .event("message")
        .json_data(event.payload())
}

/// Answers a POST with a stream carrying exactly one event.
pub(super) fn single(event: &Event) -> Response {
    Sse::new(stream::once(future::ready(frame(event)))).into_response()
}

struct LiveCursor {
    live: Receiver<Event>,
    last: SequenceNumber,
    sessions: Arc<SessionRegistry>,
    session: SessionId,
}

async fn next_batch(mut cursor: LiveCursor) -> Option<(Vec<Event>, LiveCursor)> {
    loop {
        match cursor.live.recv().await {
            Ok(event) if event.seq() <= cursor.last => {}
            Ok(event) => {
                cursor.last = event.seq();
                return Some((vec![event], cursor));
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(
                    session_id = %cursor.session,
                    skipped,
                    "event stream lagged, replaying from the store"
                );
                return match cursor.sessions.replay(cursor.session, cursor.last) {
                    Ok(missed) => {
                        if let Some(latest) = missed.last() {
                            cursor.last = latest.seq();
                        }
                        Some((missed, cursor))
                    }
                    Err(err) => {
                        debug!(session_id = %cursor.session, error = %err, "replay after lag failed");
                        None
                    }
                };
            }
            Err(RecvError::Closed) => {
                debug!(session_id = %cursor.session, "session closed, ending event stream");
                return None;
            }
        }
    }
}

/// Streams the subscription backlog, then live events until the session
/// closes. Live events at or below the last delivered sequence are skipped.
fn session_events(
    sessions: Arc<SessionRegistry>,
    session: SessionId,
    cursor: SequenceNumber,
    subscription: EventSubscription,
) -> impl Stream<Item = Result<sse::Event, axum::Error>> + Send + 'static {
    let EventSubscription { backlog, live } = subscription;
    let last = backlog.last().map_or(cursor, Event::seq);
    let tail = stream::unfold(
        LiveCursor {
            live,
            last,
            sessions,
            session,
        },
        next_batch,
    )
    .flat_map(stream::iter);

    stream::iter(backlog)
        .chain(tail)
        .map(|event| frame(&event))
}

/// Builds the long-lived `GET` response for a session.
pub(super) fn attached(
    sessions: Arc<SessionRegistry>,
    session: SessionId,
    cursor: SequenceNumber,
    subscription: EventSubscription,
    keep_alive: Duration,
) -> Response {
    let events = session_events(sessions, session, cursor, subscription);
    let response = Sse::new(events)
        .keep_alive(KeepAlive::new().interval(keep_alive))
        .into_response();
    with_session_header(response, session)
}
