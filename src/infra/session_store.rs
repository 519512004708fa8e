//! Session token storage.
//!
//! A session maps an opaque random token to a user id until it expires or
//! is revoked. The in-memory store suits a single process; the Redis store
//! survives restarts and is shared between replicas.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cache;
use crate::errors::AppResult;

/// Session store trait for dependency injection.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start a session for the user and return its token
    async fn create(&self, user_id: i32) -> AppResult<String>;

    /// User id behind a live token
    async fn resolve(&self, token: &str) -> AppResult<Option<i32>>;

    /// End a session. Unknown tokens are ignored.
    async fn revoke(&self, token: &str) -> AppResult<()>;
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone, Copy)]
struct MemorySession {
    user_id: i32,
    expires_at: Instant,
}

/// Process-local session store.
pub struct MemorySessionStore {
    sessions: DashMap<String, MemorySession>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Drop expired sessions, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.expires_at > now);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: i32) -> AppResult<String> {
        let token = new_token();
        self.sessions.insert(
            token.clone(),
            MemorySession {
                user_id,
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> AppResult<Option<i32>> {
        let session = match self.sessions.get(token) {
            Some(entry) => *entry,
            None => return Ok(None),
        };

        if session.expires_at <= Instant::now() {
            self.sessions.remove(token);
            return Ok(None);
        }
        Ok(Some(session.user_id))
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        self.sessions.remove(token);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionData {
    user_id: i32,
}

/// Redis-backed session store; expiry is left to key TTLs.
pub struct RedisSessionStore {
    cache: Cache,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    pub fn new(cache: Cache, ttl_seconds: u64) -> Self {
        Self { cache, ttl_seconds }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user_id: i32) -> AppResult<String> {
        let token = new_token();
        self.cache
            .set_session(&token, &SessionData { user_id }, self.ttl_seconds)
            .await?;
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> AppResult<Option<i32>> {
        let data: Option<SessionData> = self.cache.get_session(token).await?;
        Ok(data.map(|d| d.user_id))
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        self.cache.delete_session(token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_resolve_revoke() {
        let store = MemorySessionStore::new(Duration::from_secs(60));

        let token = store.create(7).await.unwrap();
        assert_eq!(token.len(), 32);
        assert_eq!(store.resolve(&token).await.unwrap(), Some(7));

        store.revoke(&token).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let a = store.create(1).await.unwrap();
        let b = store.create(1).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        assert_eq!(store.resolve("nope").await.unwrap(), None);
        assert!(store.revoke("nope").await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected_and_purged() {
        let store = MemorySessionStore::new(Duration::ZERO);
        let token = store.create(3).await.unwrap();
        let _other = store.create(4).await.unwrap();

        assert_eq!(store.resolve(&token).await.unwrap(), None);
        assert_eq!(store.purge_expired(), 1);
        assert!(store.is_empty());
    }
}
