//! Streamable HTTP endpoint: `POST`, `GET` and `DELETE` on `/mcp`.

use super::HttpState;
use super::headers::{
    LAST_EVENT_ID_HEADER, SessionHeader, accepts_event_stream, bad_request, header_str,
    internal_error, session_header, with_session_header,
};
use super::sse;
use crate::event_store::domain::{Event, SequenceNumber};
use crate::event_store::ports::EventStoreError;
use crate::protocol::{InboundMessage, decode_message};
use crate::session::domain::{CloseOutcome, SessionError, SessionId, TransportBinding};
use crate::session::services::EventSubscription;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::{debug, info, warn};

const NO_VALID_SESSION: &str = "No valid session ID provided";
const INVALID_SESSION: &str = "Invalid or missing session ID";

/// Handles one client-to-server message.
pub(super) async fn post(
    State(state): State<HttpState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let message = match decode_message(&body) {
        Ok(message) => message,
        Err(err) => {
            debug!(error = %err, "rejecting undecodable POST body");
            return (StatusCode::BAD_REQUEST, Json(err.into_response())).into_response();
        }
    };

    match session_header(&headers) {
        SessionHeader::Present(id) if state.sessions.lookup(id).is_ok() => {
            match exchange(&state, id, &message).await {
                Ok(event) => reply(event, id, &headers),
                Err(response) => response,
            }
        }
        SessionHeader::Missing if message.is_initialize() => open(&state, &message, &headers).await,
        _ => bad_request(NO_VALID_SESSION),
    }
}

/// Opens a session for an `initialize` request.
async fn open(state: &HttpState, message: &InboundMessage, headers: &HeaderMap) -> Response {
    let session = match state.sessions.create_session(TransportBinding::HttpStream) {
        Ok(session) => session,
        Err(err @ SessionError::IdExhausted { .. }) => {
            warn!(error = %err, "initialize lost a session id race");
            return bad_request("Session ID already in use");
        }
        Err(err) => {
            warn!(error = %err, "failed to create session");
            return internal_error();
        }
    };
    let id = session.id();

    match exchange(state, id, message).await {
        Ok(Some(event)) if event.payload().is_error() => {
            discard(state, id);
            deliver(&event, headers)
        }
        Ok(event) => {
            info!(session_id = %id, "session initialized");
            reply(event, id, headers)
        }
        Err(response) => {
            discard(state, id);
            response
        }
    }
}

fn discard(state: &HttpState, id: SessionId) {
    if let Err(err) = state.sessions.close(id) {
        warn!(session_id = %id, error = %err, "failed to discard session");
    }
}

/// Dispatches under the session's lane and records the response.
async fn exchange(
    state: &HttpState,
    id: SessionId,
    message: &InboundMessage,
) -> Result<Option<Event>, Response> {
    let lane = state
        .sessions
        .dispatch_lane(id)
        .map_err(|_| bad_request(NO_VALID_SESSION))?;
    let _turn = lane.lock().await;

    let Some(response) = state.dispatcher.handle_inbound(message).await else {
        return Ok(None);
    };
    state
        .sessions
        .record(id, response)
        .map(Some)
        .map_err(|err| session_failure(id, &err))
}

fn session_failure(id: SessionId, err: &SessionError) -> Response {
    if matches!(err, SessionError::NotFound(_)) {
        bad_request("Session terminated")
    } else {
        warn!(session_id = %id, error = %err, "failed to record response");
        internal_error()
    }
}

fn reply(event: Option<Event>, id: SessionId, headers: &HeaderMap) -> Response {
    let response = event.map_or_else(
        || StatusCode::ACCEPTED.into_response(),
        |recorded| deliver(&recorded, headers),
    );
    with_session_header(response, id)
}

fn deliver(event: &Event, headers: &HeaderMap) -> Response {
    if accepts_event_stream(headers) {
        sse::single(event)
    } else {
        Json(event.payload()).into_response()
    }
}

/// Opens the server-to-client event stream for a session.
pub(super) async fn get(State(state): State<HttpState>, headers: HeaderMap) -> Response {
    let SessionHeader::Present(id) = session_header(&headers) else {
        return bad_request(INVALID_SESSION);
    };

    let parsed = header_str(&headers, &LAST_EVENT_ID_HEADER)
        .map(str::parse::<SequenceNumber>)
        .transpose();
    let Ok(cursor) = parsed else {
        return bad_request("Invalid Last-Event-ID");
    };

    let subscription = match cursor {
        Some(after) => state.sessions.attach(id, after),
        None => state
            .sessions
            .subscribe_events(id)
            .map(|live| EventSubscription {
                backlog: Vec::new(),
                live,
            }),
    };

    match subscription {
        Ok(subscription) => {
            debug!(
                session_id = %id,
                replayed = subscription.backlog.len(),
                "event stream attached"
            );
            sse::attached(
                Arc::clone(&state.sessions),
                id,
                cursor.unwrap_or(SequenceNumber::ORIGIN),
                subscription,
                state.keep_alive,
            )
        }
        Err(SessionError::NotFound(_)) => bad_request(INVALID_SESSION),
        Err(SessionError::EventStore(EventStoreError::CursorExpired { cursor, oldest, .. })) => {
            bad_request(&format!(
                "Event cursor {cursor} has expired; oldest retained event is {oldest}"
            ))
        }
        Err(err) => {
            warn!(session_id = %id, error = %err, "failed to attach event stream");
            internal_error()
        }
    }
}

/// Terminates a session.
pub(super) async fn delete(State(state): State<HttpState>, headers: HeaderMap) -> Response {
    let SessionHeader::Present(id) = session_header(&headers) else {
        return bad_request(INVALID_SESSION);
    };

    match state.sessions.close(id) {
        Ok(CloseOutcome::Closed) => StatusCode::OK.into_response(),
        Ok(CloseOutcome::AlreadyClosed) => {
            debug!(session_id = %id, "session already closed");
            StatusCode::OK.into_response()
        }
        Err(SessionError::NotFound(_)) => bad_request(INVALID_SESSION),
        Err(err) => {
            warn!(session_id = %id, error = %err, "failed to close session");
            internal_error()
        }
    }
}
