//! Chunked NDJSON endpoint: one request line in, one response line out.

use super::HttpState;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::stream;
use std::convert::Infallible;
use tracing::{debug, warn};

/// Media type of every NDJSON response.
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

fn first_line(body: &[u8]) -> &[u8] {
    body.split(|byte| *byte == b'\n')
        .find(|line| line.iter().any(|byte| !byte.is_ascii_whitespace()))
        .unwrap_or_default()
}

/// Handles a request posted as JSON or NDJSON.
pub(super) async fn post(State(state): State<HttpState>, body: Bytes) -> Response {
    let Some(message) = state.dispatcher.handle_bytes(first_line(&body)).await else {
        return StatusCode::ACCEPTED.into_response();
    };

    let mut line = match message.to_json_line() {
        Ok(line) => line,
        Err(err) => {
            warn!(error = %err, "failed to encode NDJSON response");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    line.push('\n');
    debug!(error = message.is_error(), "NDJSON response ready");

    let chunks = stream::iter([Ok::<_, Infallible>(Bytes::from(line))]);
    let mut response = Body::from_stream(chunks).into_response();
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(NDJSON_CONTENT_TYPE));
    response
}
