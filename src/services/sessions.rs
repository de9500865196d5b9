//! In-memory browse session store
//!
//! Bounded LRU of [`BrowseSession`]s keyed by a short random id. Sessions idle
//! for longer than the TTL are treated as missing and evicted on access.
//! Callers get the session only inside a closure, so the lock can never be
//! held across an upstream await.

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::Config;
use crate::services::browse::{BrowseSession, SectionLists};

struct StoredSession {
    session: BrowseSession,
    last_access: DateTime<Utc>,
}

pub struct SessionStore {
    sessions: Mutex<LruCache<String, StoredSession>>,
    sections: Arc<SectionLists>,
    page_size: usize,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(sections: Arc<SectionLists>, capacity: usize, ttl_seconds: u64, page_size: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
            sections,
            page_size,
            ttl: Duration::seconds(ttl_seconds.min(u32::MAX as u64) as i64),
        }
    }

    pub fn from_config(sections: Arc<SectionLists>, config: &Config) -> Self {
        Self::new(
            sections,
            config.session_capacity,
            config.session_ttl_seconds,
            config.page_size,
        )
    }

    /// Create a session; returns its id and expiry (unix millis)
    pub async fn create(&self) -> (String, i64) {
        let now = Utc::now();
        // 12 hex characters
        let session_id = Uuid::new_v4().simple().to_string()[..12].to_string();
        let session = BrowseSession::new(Arc::clone(&self.sections), self.page_size);

        let mut sessions = self.sessions.lock().await;
        if let Some((evicted, _)) = sessions.push(
            session_id.clone(),
            StoredSession {
                session,
                last_access: now,
            },
        ) {
            if evicted != session_id {
                tracing::debug!("Session {} evicted (capacity)", evicted);
            }
        }

        (session_id, (now + self.ttl).timestamp_millis())
    }

    /// Run `f` against a live session. `None` when the id is unknown or
    /// the session has expired.
    pub async fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut BrowseSession) -> R,
    ) -> Option<R> {
        self.with_session_at(id, Utc::now(), f).await
    }

    async fn with_session_at<R>(
        &self,
        id: &str,
        now: DateTime<Utc>,
        f: impl FnOnce(&mut BrowseSession) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.lock().await;

        let expired = match sessions.get(id) {
            None => return None,
            Some(stored) => now - stored.last_access > self.ttl,
        };
        if expired {
            sessions.pop(id);
            tracing::debug!("Session {} expired", id);
            return None;
        }

        let stored = sessions.get_mut(id)?;
        stored.last_access = now;
        Some(f(&mut stored.session))
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
