//! Session lifecycle over the streamable HTTP endpoint.

use crate::http::helpers::{TestServer, call_tool, initialize_request, rpc, server};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use eyre::eyre;
use rstest::rstest;
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;
use waypoint::config::ServerConfig;
use waypoint::event_store::adapters::InMemoryEventStore;
use waypoint::server::Services;
use waypoint::session::domain::SessionId;
use waypoint::session::services::SessionRegistry;
use waypoint::tool_registry::adapters::Catalog;

type TestResult = eyre::Result<()>;

fn tool_text(reply: &Value) -> eyre::Result<Value> {
    let text = reply
        .pointer("/result/content/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| eyre!("tool result should carry a text block: {reply}"))?;
    Ok(serde_json::from_str(text)?)
}

fn error_code(reply: &Value) -> Option<i64> {
    reply.pointer("/error/code").and_then(Value::as_i64)
}

#[rstest]
#[tokio::test]
async fn initialize_opens_a_session(server: eyre::Result<TestServer>) -> TestResult {
    let server = server?;

    let reply = server.post(None, &initialize_request(1)).await?;

    assert_eq!(reply.status, StatusCode::OK);
    let session = reply
        .session
        .as_deref()
        .ok_or_else(|| eyre!("missing session header"))?;
    let id = TestServer::session_id(session)?;
    assert!(server.services.sessions.lookup(id).is_ok());

    let body = reply.json()?;
    assert_eq!(body["id"], json!(1));
    assert_eq!(body["result"]["serverInfo"]["name"], json!("travel-mcp-server"));
    assert_eq!(body["result"]["protocolVersion"], json!("2025-03-26"));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn initialize_call_delete_then_reject(server: eyre::Result<TestServer>) -> TestResult {
    let server = server?;
    let session = server.initialize().await?;

    let listed = server
        .post(Some(&session), &rpc(2, "tools/list", json!({})))
        .await?
        .json()?;
    let names: Vec<&str> = listed["result"]["tools"]
        .as_array()
        .ok_or_else(|| eyre!("tools should be an array"))?
        .iter()
        .filter_map(|tool| tool["name"].as_str())
        .collect();
    assert_eq!(
        names,
        [
            "get_weather",
            "get_forecast",
            "search_flights",
            "get_flight_prices",
            "search_attractions",
            "get_place_details",
            "get_restaurants",
        ]
    );

    let called = server
        .post(
            Some(&session),
            &call_tool(3, "get_weather", json!({"location": "Paris"})),
        )
        .await?;
    assert_eq!(called.status, StatusCode::OK);
    let weather = tool_text(&called.json()?)?;
    assert_eq!(weather["location"], json!("Paris"));
    assert_eq!(weather["unit"], json!("celsius"));

    assert_eq!(server.delete(Some(&session)).await?, StatusCode::OK);

    let rejected = server
        .post(Some(&session), &rpc(4, "tools/list", json!({})))
        .await?;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    let body = rejected.json()?;
    assert_eq!(error_code(&body), Some(-32000));
    assert_eq!(body["id"], Value::Null);

    assert_eq!(server.delete(Some(&session)).await?, StatusCode::OK);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn requests_without_a_session_are_rejected(server: eyre::Result<TestServer>) -> TestResult {
    let server = server?;

    let reply = server.post(None, &rpc(1, "tools/list", json!({}))).await?;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let body = reply.json()?;
    assert_eq!(error_code(&body), Some(-32000));
    assert_eq!(
        body["error"]["message"],
        json!("Bad Request: No valid session ID provided")
    );
    assert!(server.services.sessions.is_empty());
    Ok(())
}

#[rstest]
#[case("not-a-session")]
#[case("8c1f0f9e-1d1b-4c4e-9a53-1b2d3c4e5f60")]
#[tokio::test]
async fn unknown_session_headers_are_rejected(
    server: eyre::Result<TestServer>,
    #[case] header: &str,
) -> TestResult {
    let server = server?;

    let reply = server
        .post(Some(header), &rpc(1, "tools/list", json!({})))
        .await?;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&reply.json()?), Some(-32000));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn delete_requires_an_issued_session(server: eyre::Result<TestServer>) -> TestResult {
    let server = server?;
    let never_issued = SessionId::new().to_string();

    server.delete_reply(None).await?.expect_bad_request()?;
    server
        .delete_reply(Some(&never_issued))
        .await?
        .expect_bad_request()?;
    server
        .delete_reply(Some("not-a-uuid"))
        .await?
        .expect_bad_request()?;
    Ok(())
}

#[rstest]
#[tokio::test]
async fn notifications_are_accepted_without_a_body(
    server: eyre::Result<TestServer>,
) -> TestResult {
    let server = server?;
    let session = server.initialize().await?;

    let reply = server
        .post(
            Some(&session),
            &json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        )
        .await?;

    assert_eq!(reply.status, StatusCode::ACCEPTED);
    assert!(reply.body.is_empty());
    assert_eq!(reply.session.as_deref(), Some(session.as_str()));
    Ok(())
}

#[rstest]
#[case(call_tool(5, "book_hotel", json!({})), -32601)]
#[case(call_tool(5, "get_weather", json!({})), -32602)]
#[case(call_tool(5, "get_forecast", json!({"location": "Oslo", "days": 30})), -32602)]
#[case(call_tool(5, "get_place_details", json!({"placeName": "Atlantis", "destination": "Paris"})), -32603)]
#[case(rpc(5, "resources/list", json!({})), -32601)]
#[tokio::test]
async fn dispatch_failures_are_json_rpc_errors(
    server: eyre::Result<TestServer>,
    #[case] request: Value,
    #[case] expected: i64,
) -> TestResult {
    let server = server?;
    let session = server.initialize().await?;

    let reply = server.post(Some(&session), &request).await?;

    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json()?;
    assert_eq!(error_code(&body), Some(expected));
    assert_eq!(body["id"], json!(5));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn undecodable_bodies_are_parse_errors(server: eyre::Result<TestServer>) -> TestResult {
    let server = server?;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))?;

    let response = server.send(request).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let reply = TestServer::drain(response).await?;
    assert_eq!(error_code(&reply.json()?), Some(-32700));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn failed_initialize_leaves_no_session(server: eyre::Result<TestServer>) -> TestResult {
    let server = server?;

    let reply = server
        .post(None, &rpc(1, "initialize", json!({"protocolVersion": 7})))
        .await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(error_code(&reply.json()?), Some(-32602));
    assert!(reply.session.is_none());
    assert!(server.services.sessions.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn initialize_within_a_session_is_idempotent(
    server: eyre::Result<TestServer>,
) -> TestResult {
    let server = server?;
    let session = server.initialize().await?;

    let reply = server.post(Some(&session), &initialize_request(9)).await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.session.as_deref(), Some(session.as_str()));
    assert_eq!(server.services.sessions.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn health_reports_the_service(server: eyre::Result<TestServer>) -> TestResult {
    let server = server?;
    let request = Request::builder().uri("/health").body(Body::empty())?;

    let reply = TestServer::drain(server.send(request).await?).await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.json()?,
        json!({"status": "ok", "service": "travel-mcp-server", "transport": "http"})
    );
    Ok(())
}

#[tokio::test]
async fn initialize_losing_an_id_collision_is_a_bad_request() -> TestResult {
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(DefaultClock);
    let built = Services::build(
        &ServerConfig::for_catalog(Catalog::Weather),
        Arc::clone(&clock),
    )?;
    let fixed = SessionId::from_uuid(Uuid::from_u128(42));
    let sessions = SessionRegistry::new(Arc::new(InMemoryEventStore::new()), clock)
        .with_id_source(move || fixed);
    let server = TestServer::from_services(
        Services {
            dispatcher: built.dispatcher,
            sessions: Arc::new(sessions),
        },
        "collision-test",
    );

    let winner = server.initialize().await?;
    let loser = server.post(None, &initialize_request(1)).await?;

    assert_eq!(winner, fixed.to_string());
    let body = loser.expect_bad_request()?;
    assert_eq!(body["error"]["message"], json!("Bad Request: Session ID already in use"));
    assert_eq!(loser.session, None);
    assert_eq!(server.services.sessions.len(), 1);
    Ok(())
}
