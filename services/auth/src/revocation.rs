//! Token deny-list
//!
//! Tokens are stateless, so logout records the token id here until the
//! token would have expired anyway. The gateway consults the list on every
//! authenticated request.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use common::cache::RedisPool;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Storage for revoked token ids
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Deny `token_id` for the next `ttl_seconds`
    async fn revoke(&self, token_id: Uuid, ttl_seconds: u64) -> Result<()>;

    async fn is_revoked(&self, token_id: Uuid) -> Result<bool>;
}

/// Deny-list kept in Redis with per-key TTL
#[derive(Clone)]
pub struct RedisRevocationStore {
    redis_pool: RedisPool,
}

impl RedisRevocationStore {
    pub fn new(redis_pool: RedisPool) -> Self {
        Self { redis_pool }
    }

    fn key(token_id: Uuid) -> String {
        format!("revoked_token:{}", token_id)
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn revoke(&self, token_id: Uuid, ttl_seconds: u64) -> Result<()> {
        // SETEX rejects a zero TTL
        self.redis_pool
            .set(&Self::key(token_id), "1", Some(ttl_seconds.max(1)))
            .await
    }

    async fn is_revoked(&self, token_id: Uuid) -> Result<bool> {
        self.redis_pool.exists(&Self::key(token_id)).await
    }
}

/// Deny-list kept in process memory
#[derive(Clone, Default)]
pub struct MemoryRevocationStore {
    entries: Arc<Mutex<HashMap<Uuid, Instant>>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn revoke(&self, token_id: Uuid, ttl_seconds: u64) -> Result<()> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        entries.retain(|_, expires| *expires > now);
        entries.insert(token_id, now + Duration::from_secs(ttl_seconds));
        Ok(())
    }

    async fn is_revoked(&self, token_id: Uuid) -> Result<bool> {
        let entries = self.entries.lock().await;
        Ok(entries
            .get(&token_id)
            .is_some_and(|expires| *expires > Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn revoked_ids_are_reported_until_expiry() {
        let store = MemoryRevocationStore::new();
        let revoked = Uuid::new_v4();

        store.revoke(revoked, 60).await.unwrap();
        assert!(store.is_revoked(revoked).await.unwrap());
        assert!(!store.is_revoked(Uuid::new_v4()).await.unwrap());

        let lapsed = Uuid::new_v4();
        store.revoke(lapsed, 0).await.unwrap();
        assert!(!store.is_revoked(lapsed).await.unwrap());
    }
}
