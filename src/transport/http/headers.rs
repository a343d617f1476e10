//! Header parsing and shared response builders.

use crate::protocol::{ErrorCode, JsonRpcErrorResponse, RpcError};
use crate::session::domain::SessionId;
use axum::Json;
use axum::http::header::ACCEPT;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// Header carrying the session id in both directions.
pub const SESSION_HEADER: HeaderName = HeaderName::from_static("mcp-session-id");

/// Header carrying the SSE resumption cursor.
pub const LAST_EVENT_ID_HEADER: HeaderName = HeaderName::from_static("last-event-id");

/// Session id as presented by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum SessionHeader {
    Missing,
    Unparsable,
    Present(SessionId),
}

pub(super) fn session_header(headers: &HeaderMap) -> SessionHeader {
    let Some(raw) = headers.get(SESSION_HEADER) else {
        return SessionHeader::Missing;
    };
    raw.to_str()
        .ok()
        .and_then(|value| value.parse().ok())
        .map_or(SessionHeader::Unparsable, SessionHeader::Present)
}

pub(super) fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Returns `true` when the client lists `text/event-stream` in `Accept`.
pub(super) fn accepts_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|media| {
            media
                .split(';')
                .next()
                .is_some_and(|kind| kind.trim().eq_ignore_ascii_case("text/event-stream"))
        })
}

pub(super) fn with_session_header(mut response: Response, id: SessionId) -> Response {
    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

/// 400 with a JSON-RPC error body and `id: null`.
pub(super) fn bad_request(message: &str) -> Response {
    let body = JsonRpcErrorResponse::new(
        None,
        RpcError::with_message(ErrorCode::BadRequest, format!("Bad Request: {message}")),
    );
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

/// 500 with a bare internal-error body.
pub(super) fn internal_error() -> Response {
    let body = JsonRpcErrorResponse::new(None, RpcError::new(ErrorCode::InternalError));
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
