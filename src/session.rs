//! Session registry: per-session scoring state, keyed by session id.
//!
//! The temporal scorer needs a sliding sequence buffer that survives across
//! calls. That state is owned here, one entry per session, each behind its
//! own mutex — one scoring call per session in flight at a time, while
//! distinct sessions proceed in parallel. The scoring engine receives a
//! session's state by handle and never touches ambient global state.

use crate::scoring::TemporalBuffer;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

/// Mutable per-session scoring state.
#[derive(Debug)]
pub struct SessionState {
    pub buffer: TemporalBuffer,
}

pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionState>>>>,
    sequence_len: usize,
}

impl SessionRegistry {
    pub fn new(sequence_len: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            sequence_len,
        }
    }

    /// Handle to the session's state, creating it on first sight.
    pub fn get_or_create(&self, session_id: &str) -> Arc<Mutex<SessionState>> {
        if let Some(state) = self.sessions.read().expect("lock").get(session_id) {
            return Arc::clone(state);
        }
        let mut sessions = self.sessions.write().expect("lock");
        Arc::clone(sessions.entry(session_id.to_string()).or_insert_with(|| {
            Arc::new(Mutex::new(SessionState {
                buffer: TemporalBuffer::new(self.sequence_len),
            }))
        }))
    }

    /// Drop a session's state (e.g. on session end).
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions
            .write()
            .expect("lock")
            .remove(session_id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().expect("lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
