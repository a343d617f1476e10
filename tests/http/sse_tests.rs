//! Server-sent event delivery and resumption.

use crate::http::helpers::{ACCEPT_BOTH, TestServer, call_tool, rpc, server};
use axum::http::StatusCode;
use eyre::eyre;
use rstest::rstest;
use serde_json::json;
use std::num::NonZeroUsize;
use waypoint::config::ServerConfig;
use waypoint::tool_registry::adapters::Catalog;

type TestResult = eyre::Result<()>;

/// Initializes a session and records `extra` more responses.
async fn session_with_events(server: &TestServer, extra: i64) -> eyre::Result<String> {
    let session = server.initialize().await?;
    for id in 1..=extra {
        server
            .post(Some(&session), &rpc(id, "ping", json!({})))
            .await?;
    }
    Ok(session)
}

fn frame_ids(reply: &crate::http::helpers::Reply) -> eyre::Result<Vec<String>> {
    reply
        .frames()?
        .into_iter()
        .map(|frame| frame.id.ok_or_else(|| eyre!("frame without id")))
        .collect()
}

#[rstest]
#[tokio::test]
async fn post_can_answer_with_a_single_event(server: eyre::Result<TestServer>) -> TestResult {
    let server = server?;
    let session = server.initialize().await?;

    let reply = server
        .post_to(
            "/mcp",
            Some(&session),
            ACCEPT_BOTH,
            &call_tool(7, "get_forecast", json!({"location": "Oslo", "days": 2})),
        )
        .await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(
        reply
            .content_type
            .as_deref()
            .is_some_and(|value| value.starts_with("text/event-stream"))
    );
    let frames = reply.frames()?;
    let [frame] = frames.as_slice() else {
        return Err(eyre!("expected exactly one frame, got {}", frames.len()));
    };
    assert_eq!(frame.id.as_deref(), Some("2"));
    assert_eq!(frame.event.as_deref(), Some("message"));
    assert_eq!(frame.json()?["id"], json!(7));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn stream_replays_after_the_cursor_until_the_session_closes(
    server: eyre::Result<TestServer>,
) -> TestResult {
    let server = server?;
    let session = session_with_events(&server, 2).await?;

    let stream = server.open_stream(&session, Some("1")).await?;
    assert_eq!(stream.status(), StatusCode::OK);
    assert_eq!(server.delete(Some(&session)).await?, StatusCode::OK);

    let reply = TestServer::drain(stream).await?;
    assert_eq!(frame_ids(&reply)?, ["2", "3"]);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn stream_without_cursor_delivers_only_new_events(
    server: eyre::Result<TestServer>,
) -> TestResult {
    let server = server?;
    let session = session_with_events(&server, 1).await?;

    let stream = server.open_stream(&session, None).await?;
    server
        .post(Some(&session), &rpc(42, "tools/list", json!({})))
        .await?;
    assert_eq!(server.delete(Some(&session)).await?, StatusCode::OK);

    let reply = TestServer::drain(stream).await?;
    let frames = reply.frames()?;
    let [frame] = frames.as_slice() else {
        return Err(eyre!("expected one live frame, got {}", frames.len()));
    };
    assert_eq!(frame.id.as_deref(), Some("3"));
    assert_eq!(frame.json()?["id"], json!(42));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn replay_then_live_has_no_gap_or_duplicate(
    server: eyre::Result<TestServer>,
) -> TestResult {
    let server = server?;
    let session = session_with_events(&server, 2).await?;

    let stream = server.open_stream(&session, Some("0")).await?;
    for id in 10..13 {
        server
            .post(Some(&session), &rpc(id, "ping", json!({})))
            .await?;
    }
    assert_eq!(server.delete(Some(&session)).await?, StatusCode::OK);

    let reply = TestServer::drain(stream).await?;
    assert_eq!(frame_ids(&reply)?, ["1", "2", "3", "4", "5", "6"]);
    Ok(())
}

#[rstest]
#[case(None)]
#[case(Some("oops"))]
#[tokio::test]
async fn invalid_stream_requests_are_rejected(
    server: eyre::Result<TestServer>,
    #[case] cursor: Option<&str>,
) -> TestResult {
    let server = server?;
    let session = match cursor {
        Some(_) => server.initialize().await?,
        None => waypoint::session::domain::SessionId::new().to_string(),
    };

    let stream = server.open_stream(&session, cursor).await?;

    let reply = TestServer::drain(stream).await?;
    reply.expect_bad_request()?;
    assert_eq!(reply.content_type.as_deref(), Some("application/json"));
    Ok(())
}

#[tokio::test]
async fn expired_cursor_is_rejected() -> TestResult {
    let mut config = ServerConfig::for_catalog(Catalog::Weather);
    config.event_retention = NonZeroUsize::new(2);
    let server = TestServer::new(config)?;
    let session = session_with_events(&server, 3).await?;

    let expired = TestServer::drain(server.open_stream(&session, Some("0")).await?).await?;
    let body = expired.expect_bad_request()?;
    assert!(
        body["error"]["message"]
            .as_str()
            .is_some_and(|message| message.contains("expired"))
    );

    let within = server.open_stream(&session, Some("2")).await?;
    assert_eq!(within.status(), StatusCode::OK);
    assert_eq!(server.delete(Some(&session)).await?, StatusCode::OK);
    let reply = TestServer::drain(within).await?;
    assert_eq!(frame_ids(&reply)?, ["3", "4"]);
    Ok(())
}
