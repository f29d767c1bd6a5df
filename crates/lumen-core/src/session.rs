//! In-memory per-user session store.
//!
//! Holds at most one active [`FlowState`] per user. Backed by a `DashMap`
//! so independent users' turns can run on concurrent tasks with per-key
//! granularity; a user cannot have two concurrent turns in this channel
//! model, so last-write-wins per key is acceptable.

use dashmap::DashMap;
use lumen_types::session::FlowState;

/// Per-user active-flow records. No TTL: a session lives until it
/// completes, is cancelled, or is overwritten by a new flow.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: DashMap<i64, FlowState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Snapshot the user's active session, if any.
    pub fn get(&self, user_id: i64) -> Option<FlowState> {
        self.inner.get(&user_id).map(|s| s.clone())
    }

    /// Install a new session, returning the discarded prior state.
    ///
    /// Replacement is explicit so call sites cannot silently lose an
    /// in-progress flow without it being visible in the contract. Nothing
    /// from the discarded state was persisted.
    #[must_use = "the discarded prior session is returned so overwrites stay visible"]
    pub fn replace(&self, user_id: i64, state: FlowState) -> Option<FlowState> {
        self.inner.insert(user_id, state)
    }

    /// Remove and return the user's session.
    pub fn take(&self, user_id: i64) -> Option<FlowState> {
        self.inner.remove(&user_id).map(|(_, s)| s)
    }

    /// Drop the user's session if present.
    pub fn clear(&self, user_id: i64) {
        self.inner.remove(&user_id);
    }

    /// Number of users with an active flow.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
