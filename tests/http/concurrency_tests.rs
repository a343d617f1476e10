//! Concurrent sessions keep independent, ordered event logs, and a slow call
//! only holds up its own session.

use crate::http::helpers::{TestServer, call_tool, server};
use async_trait::async_trait;
use axum::http::StatusCode;
use eyre::eyre;
use mockable::{Clock, DefaultClock};
use rstest::rstest;
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use waypoint::dispatch::Dispatcher;
use waypoint::event_store::adapters::InMemoryEventStore;
use waypoint::event_store::domain::SequenceNumber;
use waypoint::event_store::ports::EventStore;
use waypoint::protocol::{RequestId, ServerInfo};
use waypoint::server::Services;
use waypoint::session::services::SessionRegistry;
use waypoint::tool_registry::domain::{InputSchema, ToolDescriptor};
use waypoint::tool_registry::ports::{ToolHandler, ToolHandlerResult};
use waypoint::tool_registry::services::ToolRegistry;

const SESSIONS: i64 = 4;
const CALLS_PER_SESSION: i64 = 12;
const NAP: Duration = Duration::from_millis(300);

/// Suspends for [`NAP`] before answering.
struct SleepingHandler;

#[async_trait]
impl ToolHandler for SleepingHandler {
    async fn invoke(&self, _arguments: Map<String, Value>) -> ToolHandlerResult<Value> {
        tokio::time::sleep(NAP).await;
        Ok(json!({"slept_ms": NAP.as_millis()}))
    }
}

fn sleeping_server() -> eyre::Result<TestServer> {
    let mut registry = ToolRegistry::new();
    registry.register(ToolDescriptor::new(
        "nap",
        "Sleeps before answering",
        InputSchema::new(),
        Arc::new(SleepingHandler),
    )?)?;
    let dispatcher = Dispatcher::new(Arc::new(registry), ServerInfo::new("nap-server", "0.1.0"));
    let events: Arc<dyn EventStore> = Arc::new(InMemoryEventStore::new());
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(DefaultClock);
    let services = Services {
        dispatcher: Arc::new(dispatcher),
        sessions: Arc::new(SessionRegistry::new(events, clock)),
    };
    Ok(TestServer::from_services(services, "nap-server"))
}

fn timed_nap(
    server: &Arc<TestServer>,
    session: &str,
    id: i64,
) -> tokio::task::JoinHandle<eyre::Result<Duration>> {
    let server = Arc::clone(server);
    let session = session.to_owned();
    tokio::spawn(async move {
        let started = Instant::now();
        let reply = server
            .post(Some(&session), &call_tool(id, "nap", json!({})))
            .await?;
        if reply.status != StatusCode::OK || reply.json()?["id"] != json!(id) {
            return Err(eyre!("nap {id} failed with {}", reply.status));
        }
        Ok(started.elapsed())
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn slow_calls_queue_per_session_but_not_across_sessions() -> eyre::Result<()> {
    let server = Arc::new(sleeping_server()?);
    let first = server.initialize().await?;
    let second = server.initialize().await?;

    let queued = [timed_nap(&server, &first, 1), timed_nap(&server, &first, 2)];
    let independent = timed_nap(&server, &second, 3);

    let mut first_times = Vec::new();
    for call in queued {
        first_times.push(call.await??);
    }
    let second_time = independent.await??;

    let slowest = first_times.iter().max().copied().unwrap_or_default();
    let fastest = first_times.iter().min().copied().unwrap_or_default();
    assert!(slowest >= NAP * 2, "same-session calls overlapped: {first_times:?}");
    assert!(fastest < NAP * 2, "first call waited too long: {first_times:?}");
    assert!(
        second_time < NAP + NAP / 2,
        "other session was blocked for {second_time:?}"
    );

    let events = server
        .services
        .sessions
        .replay(TestServer::session_id(&first)?, SequenceNumber::ORIGIN)?;
    assert_eq!(events.len(), 3);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sessions_never_interleave(server: eyre::Result<TestServer>) -> eyre::Result<()> {
    let server = Arc::new(server?);
    let mut sessions = Vec::new();
    for _ in 0..SESSIONS {
        sessions.push(server.initialize().await?);
    }

    let mut calls = Vec::new();
    for (index, session) in (0_i64..).zip(&sessions) {
        for call in 0..CALLS_PER_SESSION {
            let server = Arc::clone(&server);
            let session = session.clone();
            let id = index * 1000 + call;
            calls.push(tokio::spawn(async move {
                server
                    .post(
                        Some(&session),
                        &call_tool(id, "get_weather", json!({"location": format!("City {id}")})),
                    )
                    .await
                    .map(|reply| (reply.status, id, reply.json()))
            }));
        }
    }

    for call in calls {
        let (status, id, body) = call.await??;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body?["id"], json!(id));
    }

    for (index, session) in (0_i64..).zip(&sessions) {
        let events = server
            .services
            .sessions
            .replay(TestServer::session_id(session)?, SequenceNumber::ORIGIN)?;

        let seqs: Vec<u64> = events.iter().map(|event| event.seq().value()).collect();
        let expected: Vec<u64> = (1..=u64::try_from(CALLS_PER_SESSION + 1)?).collect();
        assert_eq!(seqs, expected);

        let own: HashSet<RequestId> = (0..CALLS_PER_SESSION)
            .map(|call| RequestId::from(index * 1000 + call))
            .chain(std::iter::once(RequestId::from(0_i64)))
            .collect();
        assert!(
            events
                .iter()
                .filter_map(|event| event.payload().id())
                .all(|id| own.contains(id))
        );
    }
    Ok(())
}
