//! Lifecycle announcements and shutdown.

use crate::in_memory::helpers::{numbered_response, registry};
use rstest::rstest;
use tokio::sync::broadcast::error::TryRecvError;
use waypoint::session::domain::{SessionError, SessionLifecycleEvent, TransportBinding};
use waypoint::session::services::SessionRegistry;

#[rstest]
fn lifecycle_events_follow_creation_and_closure(
    registry: SessionRegistry,
) -> Result<(), SessionError> {
    let mut lifecycle = registry.subscribe_lifecycle();

    let id = registry.create_session(TransportBinding::HttpStream)?.id();
    registry.close(id)?;

    assert_eq!(lifecycle.try_recv().ok(), Some(SessionLifecycleEvent::Created(id)));
    assert_eq!(lifecycle.try_recv().ok(), Some(SessionLifecycleEvent::Closed(id)));
    assert!(matches!(lifecycle.try_recv(), Err(TryRecvError::Empty)));
    Ok(())
}

#[rstest]
fn close_all_ends_every_live_feed(registry: SessionRegistry) -> Result<(), SessionError> {
    let first = registry.create_session(TransportBinding::HttpStream)?.id();
    let second = registry.create_session(TransportBinding::Duplex)?.id();
    let mut first_feed = registry.subscribe_events(first)?;
    let mut second_feed = registry.subscribe_events(second)?;
    registry.record(first, numbered_response(1))?;

    assert_eq!(registry.close_all(), 2);

    assert!(registry.is_empty());
    assert!(first_feed.try_recv().is_ok());
    assert!(matches!(first_feed.try_recv(), Err(TryRecvError::Closed)));
    assert!(matches!(second_feed.try_recv(), Err(TryRecvError::Closed)));
    Ok(())
}
