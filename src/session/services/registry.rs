//! Shared registry of live sessions.

use crate::event_store::domain::{Event, SequenceNumber};
use crate::event_store::ports::EventStore;
use crate::protocol::ProtocolMessage;
use crate::session::domain::{
    CloseOutcome, Session, SessionError, SessionId, SessionLifecycleEvent, SessionResult,
    TransportBinding,
};
use mockable::Clock;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info, warn};

/// Number of fresh ids tried before `create_session` gives up.
const MAX_ID_ATTEMPTS: usize = 8;
const LIFECYCLE_CAPACITY: usize = 64;
const EVENT_FEED_CAPACITY: usize = 256;

type IdSource = dyn Fn() -> SessionId + Send + Sync;

struct LiveSession {
    session: Session,
    lane: Arc<Mutex<()>>,
    feed: broadcast::Sender<Event>,
}

#[derive(Default)]
struct RegistryState {
    live: HashMap<SessionId, LiveSession>,
    retired: HashSet<SessionId>,
}

/// A live event subscription primed with the backlog after a cursor.
#[derive(Debug)]
pub struct EventSubscription {
    /// Events already recorded after the requested cursor.
    pub backlog: Vec<Event>,
    /// Events recorded from now on. Closed when the session closes.
    pub live: broadcast::Receiver<Event>,
}

/// Sole owner of every live [`Session`].
///
/// The live table is guarded by a read/write lock: creation, closure and
/// event recording take the write lock, lookups take the read lock. Closed
/// ids are remembered so they are never handed out again.
pub struct SessionRegistry {
    state: RwLock<RegistryState>,
    events: Arc<dyn EventStore>,
    clock: Arc<dyn Clock + Send + Sync>,
    lifecycle: broadcast::Sender<SessionLifecycleEvent>,
    id_source: Box<IdSource>,
}

impl SessionRegistry {
    /// Creates an empty registry recording events into `events`.
    #[must_use]
    pub fn new(events: Arc<dyn EventStore>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        let (lifecycle, _) = broadcast::channel(LIFECYCLE_CAPACITY);
        Self {
            state: RwLock::default(),
            events,
            clock,
            lifecycle,
            id_source: Box::new(SessionId::new),
        }
    }

    /// Replaces the id generator.
    #[must_use]
    pub fn with_id_source(
        mut self,
        source: impl Fn() -> SessionId + Send + Sync + 'static,
    ) -> Self {
        self.id_source = Box::new(source);
        self
    }

    fn read_state(&self) -> SessionResult<RwLockReadGuard<'_, RegistryState>> {
        self.state
            .read()
            .map_err(|e| SessionError::state(std::io::Error::other(e.to_string())))
    }

    fn write_state(&self) -> SessionResult<RwLockWriteGuard<'_, RegistryState>> {
        self.state
            .write()
            .map_err(|e| SessionError::state(std::io::Error::other(e.to_string())))
    }

    fn announce(&self, event: SessionLifecycleEvent) {
        if self.lifecycle.send(event).is_err() {
            debug!(session_id = %event.session_id(), "no lifecycle subscribers");
        }
    }

    /// Opens a new session with an unused id.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::IdExhausted`] if every candidate id collides
    /// with a live or retired one, or [`SessionError::State`] on lock failure.
    pub fn create_session(&self, binding: TransportBinding) -> SessionResult<Session> {
        let session = {
            let mut state = self.write_state()?;
            let id = (0..MAX_ID_ATTEMPTS)
                .map(|_| (self.id_source)())
                .find(|candidate| {
                    !state.live.contains_key(candidate) && !state.retired.contains(candidate)
                })
                .ok_or(SessionError::IdExhausted {
                    attempts: MAX_ID_ATTEMPTS,
                })?;

            let session = Session::new(id, binding, &*self.clock);
            let (feed, _) = broadcast::channel(EVENT_FEED_CAPACITY);
            state.live.insert(
                id,
                LiveSession {
                    session: session.clone(),
                    lane: Arc::new(Mutex::new(())),
                    feed,
                },
            );
            session
        };

        info!(session_id = %session.id(), binding = %binding, "session created");
        self.announce(SessionLifecycleEvent::Created(session.id()));
        Ok(session)
    }

    /// Returns a snapshot of a live session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] when the id is unknown or retired.
    pub fn lookup(&self, id: SessionId) -> SessionResult<Session> {
        self.read_state()?
            .live
            .get(&id)
            .map(|live| live.session.clone())
            .ok_or(SessionError::NotFound(id))
    }

    /// Returns `true` when the id belonged to a session that has closed.
    #[must_use]
    pub fn is_retired(&self, id: SessionId) -> bool {
        self.read_state()
            .map(|state| state.retired.contains(&id))
            .unwrap_or(false)
    }

    /// Closes a session, releases its event log and retires its id.
    ///
    /// Closing drops the session's event feed, which ends any attached
    /// server-to-client streams.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] when the id was never issued.
    pub fn close(&self, id: SessionId) -> SessionResult<CloseOutcome> {
        let mut closed = {
            let mut state = self.write_state()?;
            let Some(live) = state.live.remove(&id) else {
                return if state.retired.contains(&id) {
                    Ok(CloseOutcome::AlreadyClosed)
                } else {
                    Err(SessionError::NotFound(id))
                };
            };
            state.retired.insert(id);
            live.session
        };
        closed.mark_closed();

        if let Err(err) = self.events.release(id) {
            warn!(session_id = %id, error = %err, "failed to release event log");
        }

        info!(
            session_id = %id,
            binding = %closed.binding(),
            last_event_seq = ?closed.last_event_seq().map(|seq| seq.value()),
            "session closed"
        );
        self.announce(SessionLifecycleEvent::Closed(id));
        Ok(CloseOutcome::Closed)
    }

    /// Closes every live session. Failures are logged, not propagated.
    ///
    /// Returns the number of sessions closed.
    pub fn close_all(&self) -> usize {
        let ids = match self.read_state() {
            Ok(state) => state.live.keys().copied().collect::<Vec<_>>(),
            Err(err) => {
                warn!(error = %err, "cannot enumerate sessions for shutdown");
                return 0;
            }
        };

        ids.into_iter()
            .filter(|id| match self.close(*id) {
                Ok(outcome) => outcome == CloseOutcome::Closed,
                Err(err) => {
                    warn!(session_id = %id, error = %err, "failed to close session");
                    false
                }
            })
            .count()
    }

    /// Appends an outbound message to the session's log and forwards it to
    /// live subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for unknown sessions and
    /// [`SessionError::EventStore`] if the append fails.
    pub fn record(&self, id: SessionId, message: ProtocolMessage) -> SessionResult<Event> {
        let mut state = self.write_state()?;
        let live = state.live.get_mut(&id).ok_or(SessionError::NotFound(id))?;

        let event = self.events.append(id, message)?;
        live.session.record_event(event.seq());
        if live.feed.send(event.clone()).is_err() {
            debug!(session_id = %id, seq = %event.seq(), "no live stream attached");
        }
        Ok(event)
    }

    /// Returns the mutex that serializes request handling for a session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for unknown sessions.
    pub fn dispatch_lane(&self, id: SessionId) -> SessionResult<Arc<Mutex<()>>> {
        self.read_state()?
            .live
            .get(&id)
            .map(|live| Arc::clone(&live.lane))
            .ok_or(SessionError::NotFound(id))
    }

    /// Subscribes to events recorded for a session from now on.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for unknown sessions.
    pub fn subscribe_events(&self, id: SessionId) -> SessionResult<broadcast::Receiver<Event>> {
        self.read_state()?
            .live
            .get(&id)
            .map(|live| live.feed.subscribe())
            .ok_or(SessionError::NotFound(id))
    }

    /// Subscribes to live events and replays everything after `cursor`.
    ///
    /// Both happen under one read lock, so no event is lost or delivered
    /// twice between the backlog and the live feed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for unknown sessions and
    /// [`SessionError::EventStore`] when the cursor has expired.
    pub fn attach(
        &self,
        id: SessionId,
        cursor: SequenceNumber,
    ) -> SessionResult<EventSubscription> {
        let state = self.read_state()?;
        let live = state.live.get(&id).ok_or(SessionError::NotFound(id))?;
        let receiver = live.feed.subscribe();
        let backlog = self.events.replay_from(id, cursor)?;
        Ok(EventSubscription {
            backlog,
            live: receiver,
        })
    }

    /// Replays recorded events after `cursor` for a live session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for unknown sessions and
    /// [`SessionError::EventStore`] when the cursor has expired.
    pub fn replay(&self, id: SessionId, cursor: SequenceNumber) -> SessionResult<Vec<Event>> {
        let state = self.read_state()?;
        if !state.live.contains_key(&id) {
            return Err(SessionError::NotFound(id));
        }
        Ok(self.events.replay_from(id, cursor)?)
    }

    /// Subscribes to session lifecycle events.
    #[must_use]
    pub fn subscribe_lifecycle(&self) -> broadcast::Receiver<SessionLifecycleEvent> {
        self.lifecycle.subscribe()
    }

    /// Returns the number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_state().map(|state| state.live.len()).unwrap_or(0)
    }

    /// Returns `true` when no session is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("live", &self.len())
            .finish_non_exhaustive()
    }
}
