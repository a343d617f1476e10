//! Chunked NDJSON endpoint.

use crate::http::helpers::{ACCEPT_JSON, TestServer, call_tool, rpc, server};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};

type TestResult = eyre::Result<()>;

fn single_line(body: &str) -> eyre::Result<Value> {
    let line = body
        .strip_suffix('\n')
        .ok_or_else(|| eyre::eyre!("response should end with a newline"))?;
    eyre::ensure!(!line.contains('\n'), "response should be one line");
    Ok(serde_json::from_str(line)?)
}

#[rstest]
#[case("/")]
#[case("/ndjson")]
#[tokio::test]
async fn answers_with_one_line_echoing_the_id(
    server: eyre::Result<TestServer>,
    #[case] uri: &str,
) -> TestResult {
    let server = server?;

    let reply = server
        .post_to(uri, None, ACCEPT_JSON, &rpc(11, "tools/list", json!({})))
        .await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.content_type.as_deref(), Some("application/x-ndjson"));
    assert!(reply.session.is_none());
    let message = single_line(reply.text()?)?;
    assert_eq!(message["id"], json!(11));
    assert_eq!(message["result"]["tools"].as_array().map(Vec::len), Some(7));
    assert!(server.services.sessions.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn string_ids_are_echoed(server: eyre::Result<TestServer>) -> TestResult {
    let server = server?;
    let mut request = call_tool(
        0,
        "search_flights",
        json!({"origin": "LHR", "destination": "JFK", "departureDate": "2025-07-01"}),
    );
    request["id"] = json!("flight-1");

    let reply = server.post_to("/", None, ACCEPT_JSON, &request).await?;

    let message = single_line(reply.text()?)?;
    assert_eq!(message["id"], json!("flight-1"));
    assert!(message.get("result").is_some());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn only_the_first_line_is_handled(server: eyre::Result<TestServer>) -> TestResult {
    let server = server?;
    let body = format!(
        "\n{}\n{}\n",
        rpc(1, "ping", json!({})),
        rpc(2, "tools/list", json!({}))
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/ndjson")
        .header("content-type", "application/x-ndjson")
        .body(Body::from(body))?;

    let reply = TestServer::drain(server.send(request).await?).await?;

    let message = single_line(reply.text()?)?;
    assert_eq!(message["id"], json!(1));
    assert_eq!(message["result"], json!({}));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn garbage_is_a_parse_error_line(server: eyre::Result<TestServer>) -> TestResult {
    let server = server?;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .body(Body::from("definitely not json"))?;

    let reply = TestServer::drain(server.send(request).await?).await?;

    assert_eq!(reply.status, StatusCode::OK);
    let message = single_line(reply.text()?)?;
    assert_eq!(message["error"]["code"], json!(-32700));
    assert_eq!(message["id"], Value::Null);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn notifications_get_no_line(server: eyre::Result<TestServer>) -> TestResult {
    let server = server?;

    let reply = server
        .post_to(
            "/",
            None,
            ACCEPT_JSON,
            &json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        )
        .await?;

    assert_eq!(reply.status, StatusCode::ACCEPTED);
    assert!(reply.body.is_empty());
    Ok(())
}
