//! In-memory review sessions
//!
//! A session groups the reviews run by one caller under a time-derived
//! identifier. The store is bounded: once `capacity` sessions exist, starting
//! another evicts the oldest one. Reading a session does not refresh its age.

use std::num::NonZeroUsize;

use chrono::{DateTime, Local, Utc};
use lru::LruCache;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::review::ReviewRecord;
use crate::{Error, Result};

/// Generate a session identifier with microsecond precision
pub fn new_session_id() -> String {
    format!("session_{}", Local::now().format("%Y%m%d_%H%M%S_%6f"))
}

/// One caller's review history
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Identifier of the session
    pub session_id: String,
    /// When the session was started
    pub start_time: DateTime<Utc>,
    /// Completed reviews, oldest first
    pub reviews: Vec<ReviewRecord>,
}

impl Session {
    fn new(session_id: String) -> Self {
        Self {
            session_id,
            start_time: Utc::now(),
            reviews: Vec::new(),
        }
    }
}

/// Bounded store of live sessions
pub struct SessionStore {
    sessions: LruCache<String, Session>,
}

impl SessionStore {
    /// Create a store holding at most `capacity` sessions
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            Error::Config("session store capacity must be at least 1".to_string())
        })?;
        Ok(Self {
            sessions: LruCache::new(capacity),
        })
    }

    /// Register an empty session and return its identifier
    ///
    /// An identifier already in use gets a numeric suffix.
    pub fn start(&mut self, session_id: impl Into<String>) -> String {
        let requested = session_id.into();
        let mut id = requested.clone();
        let mut n = 1;
        while self.sessions.contains(&id) {
            id = format!("{}_{}", requested, n);
            n += 1;
        }

        if let Some((evicted, old)) = self.sessions.push(id.clone(), Session::new(id.clone())) {
            warn!(
                session_id = %evicted,
                reviews = old.reviews.len(),
                "Session store full, evicted oldest session"
            );
        }

        info!(session_id = %id, "Started session");
        id
    }

    /// Append a review to a session
    ///
    /// Returns false when the session is unknown (never started or evicted).
    pub fn add_review(&mut self, session_id: &str, review: ReviewRecord) -> bool {
        match self.sessions.peek_mut(session_id) {
            Some(session) => {
                session.reviews.push(review);
                debug!(session_id, reviews = session.reviews.len(), "Recorded review");
                true
            }
            None => {
                warn!(session_id, "Dropping review for unknown session");
                false
            }
        }
    }

    /// Reviews of a session, empty when the session is unknown
    pub fn history(&self, session_id: &str) -> &[ReviewRecord] {
        self.sessions
            .peek(session_id)
            .map(|s| s.reviews.as_slice())
            .unwrap_or(&[])
    }

    /// Look up a session
    pub fn get(&self, session_id: &str) -> Option<&Session> {
        self.sessions.peek(session_id)
    }

    /// Tear down a session
    pub fn remove(&mut self, session_id: &str) -> Option<Session> {
        let removed = self.sessions.pop(session_id);
        if removed.is_some() {
            info!(session_id, "Ended session");
        }
        removed
    }

    /// Whether the session is live
    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains(session_id)
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are live
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Maximum number of live sessions
    pub fn capacity(&self) -> usize {
        self.sessions.cap().get()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("len", &self.sessions.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}
