//! Session id uniqueness.

use crate::in_memory::helpers::registry;
use rstest::rstest;
use std::collections::HashSet;
use waypoint::session::domain::{CloseOutcome, SessionError, SessionId, TransportBinding};
use waypoint::session::services::SessionRegistry;

const SESSION_COUNT: usize = 10_000;

#[rstest]
fn ten_thousand_sessions_get_unique_ids(registry: SessionRegistry) -> Result<(), SessionError> {
    let mut seen = HashSet::with_capacity(SESSION_COUNT);
    for _ in 0..SESSION_COUNT {
        let session = registry.create_session(TransportBinding::HttpStream)?;
        assert!(seen.insert(session.id()), "duplicate id {}", session.id());
    }

    assert_eq!(registry.len(), SESSION_COUNT);
    Ok(())
}

#[rstest]
fn closed_ids_are_never_reissued(registry: SessionRegistry) -> Result<(), SessionError> {
    let retired = registry.create_session(TransportBinding::HttpStream)?.id();
    assert_eq!(registry.close(retired)?, CloseOutcome::Closed);

    let registry = registry.with_id_source(move || retired);
    let outcome = registry.create_session(TransportBinding::HttpStream);

    assert!(matches!(outcome, Err(SessionError::IdExhausted { .. })));
    assert!(registry.is_retired(retired));
    Ok(())
}

#[rstest]
fn closing_twice_is_a_no_op(registry: SessionRegistry) -> Result<(), SessionError> {
    let id = registry.create_session(TransportBinding::Duplex)?.id();

    assert_eq!(registry.close(id)?, CloseOutcome::Closed);
    assert_eq!(registry.close(id)?, CloseOutcome::AlreadyClosed);
    assert!(matches!(
        registry.close(SessionId::new()),
        Err(SessionError::NotFound(_))
    ));
    Ok(())
}
