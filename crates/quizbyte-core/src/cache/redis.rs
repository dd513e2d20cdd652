//! Production [`CachePort`] backed by Redis.
//!
//! Uses `redis::aio::ConnectionManager`, the same crate and connection style
//! `comfortablynumb-pmp-llm-gateway-api` uses for its own cache layer — the
//! teacher itself has no remote cache dependency to imitate directly, so this
//! module is grounded on that sibling example repo instead.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::error::CacheError;
use super::port::CachePort;

/// A [`CachePort`] backed by a single Redis (or Redis-compatible) endpoint.
#[derive(Clone)]
pub struct RedisCachePort {
    manager: ConnectionManager,
}

impl RedisCachePort {
    /// Connects to `redis_url` (e.g. `redis://127.0.0.1:6379`) and returns a
    /// ready-to-use cache port. The `ConnectionManager` reconnects
    /// transparently on transport errors, so callers do not need their own
    /// retry loop.
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| CacheError::Transport(e.to_string()))?;
        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl CachePort for RedisCachePort {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.manager.clone();
        conn.get(key)
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))
    }

    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.manager.clone();
        conn.hget(key, field)
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))
    }

    async fn hash_set(&self, key: &str, field: &str, value: &[u8]) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        conn.hset::<_, _, _, ()>(key, field, value)
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))
    }

    async fn hash_scan(&self, key: &str) -> Result<Vec<(String, Vec<u8>)>, CacheError> {
        let mut conn = self.manager.clone();
        let map: std::collections::HashMap<String, Vec<u8>> = conn
            .hgetall(key)
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))?;
        Ok(map.into_iter().collect())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let seconds = ttl.as_secs().max(1) as i64;
        conn.expire::<_, ()>(key, seconds)
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))?;
        Ok(())
    }
}
