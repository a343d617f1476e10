//! Replay from every cursor through the session registry.

use crate::in_memory::helpers::{clock, numbered_response, registry, registry_over, store};
use mockable::Clock;
use rstest::rstest;
use std::num::NonZeroUsize;
use std::sync::Arc;
use waypoint::event_store::adapters::InMemoryEventStore;
use waypoint::event_store::domain::SequenceNumber;
use waypoint::event_store::ports::EventStoreError;
use waypoint::session::domain::{SessionError, SessionId, TransportBinding};
use waypoint::session::services::SessionRegistry;

const EVENT_COUNT: u64 = 25;

fn record_events(registry: &SessionRegistry, count: u64) -> Result<SessionId, SessionError> {
    let id = registry.create_session(TransportBinding::HttpStream)?.id();
    for n in 1..=count {
        let request_id = i64::try_from(n).map_err(SessionError::state)?;
        registry.record(id, numbered_response(request_id))?;
    }
    Ok(id)
}

fn seqs(events: &[waypoint::event_store::domain::Event]) -> Vec<u64> {
    events.iter().map(|event| event.seq().value()).collect()
}

#[rstest]
fn replay_from_every_cursor_returns_the_suffix(
    registry: SessionRegistry,
) -> Result<(), SessionError> {
    let id = record_events(&registry, EVENT_COUNT)?;

    for k in 0..=EVENT_COUNT {
        let replayed = registry.replay(id, SequenceNumber::new(k))?;
        let expected: Vec<u64> = (k + 1..=EVENT_COUNT).collect();
        assert_eq!(seqs(&replayed), expected, "cursor {k}");
    }
    Ok(())
}

#[rstest]
fn session_tracks_its_latest_event(registry: SessionRegistry) -> Result<(), SessionError> {
    let id = record_events(&registry, 3)?;

    let session = registry.lookup(id)?;

    assert_eq!(session.last_event_seq(), Some(SequenceNumber::new(3)));
    Ok(())
}

#[rstest]
fn bounded_retention_replays_only_the_window(
    clock: Arc<dyn Clock + Send + Sync>,
) -> Result<(), SessionError> {
    let window = NonZeroUsize::MIN.saturating_add(4);
    let registry = registry_over(Arc::new(InMemoryEventStore::with_retention(window)), clock);
    let id = record_events(&registry, EVENT_COUNT)?;
    let oldest = EVENT_COUNT - 4;

    for k in 0..=EVENT_COUNT {
        let outcome = registry.replay(id, SequenceNumber::new(k));
        if k + 1 < oldest {
            assert!(
                matches!(
                    outcome,
                    Err(SessionError::EventStore(EventStoreError::CursorExpired { .. }))
                ),
                "cursor {k} should have expired"
            );
        } else {
            let expected: Vec<u64> = (k + 1..=EVENT_COUNT).collect();
            assert_eq!(seqs(&outcome?), expected, "cursor {k}");
        }
    }
    Ok(())
}

#[rstest]
fn closing_releases_the_event_log(
    store: Arc<InMemoryEventStore>,
    clock: Arc<dyn Clock + Send + Sync>,
) -> Result<(), SessionError> {
    let registry = registry_over(Arc::clone(&store), clock);
    let id = record_events(&registry, 4)?;
    assert_eq!(store.partition_count(), 1);

    registry.close(id)?;

    assert_eq!(store.partition_count(), 0);
    assert!(matches!(
        registry.replay(id, SequenceNumber::ORIGIN),
        Err(SessionError::NotFound(_))
    ));
    Ok(())
}
