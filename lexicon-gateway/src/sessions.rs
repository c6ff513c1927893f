//! Session registry
//!
//! Each browsing session owns one `ViewController` built from the shared,
//! immutable seed. Controllers sit behind a `tokio::sync::Mutex`; handlers
//! hold the lock only for the synchronous phases of a search.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use lexicon::{QueryInputs, SeedBundle, ViewController};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::types::{GatewayError, Result};

pub type SessionHandle = Arc<Mutex<ViewController>>;

struct SessionEntry {
    controller: SessionHandle,
    created_at: DateTime<Utc>,
}

pub struct SessionStore {
    sessions: DashMap<Uuid, SessionEntry>,
    seed: Arc<SeedBundle>,
    max_sessions: usize,
    search_timeout: Duration,
}

impl SessionStore {
    pub fn new(seed: Arc<SeedBundle>, max_sessions: usize, search_timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            seed,
            max_sessions,
            search_timeout,
        }
    }

    /// Create a session whose inputs come from a first-load address.
    pub fn create(&self, inputs: QueryInputs) -> Result<(Uuid, SessionHandle)> {
        if self.sessions.len() >= self.max_sessions {
            return Err(GatewayError::Capacity(format!(
                "limit of {} sessions reached",
                self.max_sessions
            )));
        }

        let mut controller = ViewController::new(self.seed.store(), self.seed.battles.clone())
            .with_inputs(inputs)
            .with_search_timeout(self.search_timeout);
        controller.load_battle();

        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(controller));
        self.sessions.insert(
            id,
            SessionEntry {
                controller: Arc::clone(&handle),
                created_at: Utc::now(),
            },
        );

        info!(session_id = %id, sessions = self.sessions.len(), "Session created");
        Ok((id, handle))
    }

    pub fn get(&self, id: &str) -> Result<SessionHandle> {
        let uuid = Uuid::parse_str(id)
            .map_err(|_| GatewayError::BadRequest(format!("invalid session id: {}", id)))?;
        self.sessions
            .get(&uuid)
            .map(|entry| Arc::clone(&entry.controller))
            .ok_or_else(|| GatewayError::NotFound(format!("session {}", id)))
    }

    /// Drop sessions older than `max_age`. Returns how many were removed.
    pub fn expire(&self, max_age: Duration) -> usize {
        let max_age = chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX);
        let cutoff = Utc::now() - max_age;
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.created_at > cutoff);
        let removed = before - self.sessions.len();
        if removed > 0 {
            debug!(removed, remaining = self.sessions.len(), "Expired sessions");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    pub fn seed(&self) -> &SeedBundle {
        &self.seed
    }
}
