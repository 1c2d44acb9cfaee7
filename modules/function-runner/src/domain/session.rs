//! Per-visitor component state.
//!
//! Every visitor gets their own pair of calculator components. Nothing a
//! visitor types or receives is visible to anyone else.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::interaction::Interaction;
use super::sum::SumCalculation;
use super::ticket::TicketCalculation;
use super::transport::FunctionTransport;

/// Sessions kept before the least recently used one is dropped.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// One visitor's ticket and sum components.
pub struct Session {
    ticket: Arc<Interaction<TicketCalculation>>,
    sum: Arc<Interaction<SumCalculation>>,
}

impl Session {
    #[must_use]
    pub fn new(transport: &Arc<dyn FunctionTransport>, ticket_url: &str, sum_url: &str) -> Self {
        Self {
            ticket: Arc::new(Interaction::with_endpoint(Arc::clone(transport), ticket_url)),
            sum: Arc::new(Interaction::with_endpoint(Arc::clone(transport), sum_url)),
        }
    }

    #[must_use]
    pub fn ticket(&self) -> &Arc<Interaction<TicketCalculation>> {
        &self.ticket
    }

    #[must_use]
    pub fn sum(&self) -> &Arc<Interaction<SumCalculation>> {
        &self.sum
    }

    /// Reset both cards; calls in flight are abandoned.
    pub fn reset(&self) {
        self.ticket.reset();
        self.sum.reset();
    }
}

struct Entry {
    last_used: u64,
    session: Arc<Session>,
}

#[derive(Default)]
struct Entries {
    clock: u64,
    sessions: HashMap<Uuid, Entry>,
}

impl Entries {
    fn tick(&mut self) -> u64 {
        self.clock = self.clock.wrapping_add(1);
        self.clock
    }
}

/// Bounded map of session id to [`Session`], evicting the least recently used.
///
/// An evicted session is only forgotten: a call it has in flight still
/// finishes for the request that started it.
pub struct SessionStore {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl SessionStore {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The session stored under `id`, marked as just used.
    #[must_use]
    pub fn get(&self, id: &Uuid) -> Option<Arc<Session>> {
        let mut entries = self.entries.lock();
        let now = entries.tick();
        let entry = entries.sessions.get_mut(id)?;
        entry.last_used = now;
        Some(Arc::clone(&entry.session))
    }

    /// Store `session` under a fresh random id.
    pub fn insert(&self, session: Session) -> (Uuid, Arc<Session>) {
        let id = Uuid::new_v4();
        let session = Arc::new(session);

        let mut entries = self.entries.lock();
        while entries.sessions.len() >= self.capacity {
            let Some(oldest) = entries
                .sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| *id)
            else {
                break;
            };
            entries.sessions.remove(&oldest);
            debug!(session = %oldest, "evicted least recently used session");
        }

        let now = entries.tick();
        entries.sessions.insert(
            id,
            Entry {
                last_used: now,
                session: Arc::clone(&session),
            },
        );
        (id, session)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::{RawReply, TransportError};
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl FunctionTransport for Unreachable {
        async fn post_json(
            &self,
            _url: &str,
            _body: &serde_json::Value,
        ) -> Result<RawReply, TransportError> {
            Err(TransportError::new("unreachable"))
        }
    }

    fn session() -> Session {
        let transport: Arc<dyn FunctionTransport> = Arc::new(Unreachable);
        Session::new(&transport, "http://functions.test/ticket", "http://functions.test/sum")
    }

    #[test]
    fn sessions_are_distinct() {
        let store = SessionStore::default();
        let (a, first) = store.insert(session());
        let (b, second) = store.insert(session());

        assert_ne!(a, b);
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&store.get(&a).unwrap(), &first));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn unknown_id_is_absent() {
        let store = SessionStore::default();
        assert!(store.get(&Uuid::new_v4()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn least_recently_used_is_evicted() {
        let store = SessionStore::new(2);
        let (a, _) = store.insert(session());
        let (b, _) = store.insert(session());

        // touching `a` leaves `b` as the oldest
        assert!(store.get(&a).is_some());
        let (c, _) = store.insert(session());

        assert_eq!(store.len(), 2);
        assert!(store.get(&a).is_some());
        assert!(store.get(&b).is_none());
        assert!(store.get(&c).is_some());
    }

    #[test]
    fn capacity_is_at_least_one() {
        let store = SessionStore::new(0);
        assert_eq!(store.capacity(), 1);
        let (first, _) = store.insert(session());
        let (second, _) = store.insert(session());
        assert!(store.get(&first).is_none());
        assert!(store.get(&second).is_some());
    }

    #[test]
    fn session_cards_use_their_endpoints() {
        let session = session();
        assert_eq!(session.ticket().endpoint(), "http://functions.test/ticket");
        assert_eq!(session.sum().endpoint(), "http://functions.test/sum");
    }
}
