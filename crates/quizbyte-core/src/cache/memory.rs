//! In-process [`CachePort`] used by tests.
//!
//! Follows `reflex::cache::l1::L1Cache`'s shape (a `moka::sync::Cache`
//! behind a thin wrapper) for scalar keys, plus a `dashmap`-backed table of
//! hash-map fields for `hash_get`/`hash_set`/`hash_scan`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use moka::sync::Cache;

use super::error::CacheError;
use super::port::CachePort;

struct Expiring<T> {
    value: T,
    expires_at: Option<Instant>,
}

/// An in-memory [`CachePort`] with real (if coarse) TTL expiry, suitable for
/// unit and integration tests that must observe miss-after-expiry behavior
/// without a real Redis instance.
pub struct InMemoryCachePort {
    scalars: Cache<String, Arc<Expiring<Vec<u8>>>>,
    maps: DashMap<String, Expiring<HashMap<String, Vec<u8>>>>,
}

impl InMemoryCachePort {
    const DEFAULT_CAPACITY: u64 = 10_000;

    pub fn new() -> Self {
        Self {
            scalars: Cache::builder().max_capacity(Self::DEFAULT_CAPACITY).build(),
            maps: DashMap::new(),
        }
    }

    fn is_expired(expires_at: Option<Instant>) -> bool {
        expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

impl Default for InMemoryCachePort {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CachePort for InMemoryCachePort {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let Some(entry) = self.scalars.get(key) else {
            return Ok(None);
        };
        if Self::is_expired(entry.expires_at) {
            self.scalars.invalidate(key);
            return Ok(None);
        }
        Ok(Some(entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        self.scalars.insert(
            key.to_string(),
            Arc::new(Expiring {
                value: value.to_vec(),
                expires_at: Some(Instant::now() + ttl),
            }),
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.scalars.invalidate(key);
        self.maps.remove(key);
        Ok(())
    }

    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let Some(entry) = self.maps.get(key) else {
            return Ok(None);
        };
        if Self::is_expired(entry.expires_at) {
            drop(entry);
            self.maps.remove(key);
            return Ok(None);
        }
        Ok(entry.value.get(field).cloned())
    }

    async fn hash_set(&self, key: &str, field: &str, value: &[u8]) -> Result<(), CacheError> {
        let mut entry = self.maps.entry(key.to_string()).or_insert_with(|| Expiring {
            value: HashMap::new(),
            expires_at: None,
        });
        entry.value.insert(field.to_string(), value.to_vec());
        Ok(())
    }

    async fn hash_scan(&self, key: &str) -> Result<Vec<(String, Vec<u8>)>, CacheError> {
        let Some(entry) = self.maps.get(key) else {
            return Ok(Vec::new());
        };
        if Self::is_expired(entry.expires_at) {
            drop(entry);
            self.maps.remove(key);
            return Ok(Vec::new());
        }
        Ok(entry
            .value
            .iter()
            .map(|(f, v)| (f.clone(), v.clone()))
            .collect())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CacheError> {
        if let Some(mut entry) = self.maps.get_mut(key) {
            entry.expires_at = Some(Instant::now() + ttl);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_set_roundtrip() {
        let cache = InMemoryCachePort::new();
        cache.set("k", b"v", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn get_miss_is_none_not_error() {
        let cache = InMemoryCachePort::new();
        assert_eq!(cache.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn ttl_expiry_produces_miss() {
        let cache = InMemoryCachePort::new();
        cache
            .set("k", b"v", Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn hash_set_get_scan() {
        let cache = InMemoryCachePort::new();
        cache.hash_set("map", "f1", b"v1").await.unwrap();
        cache.hash_set("map", "f2", b"v2").await.unwrap();
        assert_eq!(cache.hash_get("map", "f1").await.unwrap(), Some(b"v1".to_vec()));
        let mut scanned = cache.hash_scan("map").await.unwrap();
        scanned.sort();
        assert_eq!(
            scanned,
            vec![
                ("f1".to_string(), b"v1".to_vec()),
                ("f2".to_string(), b"v2".to_vec())
            ]
        );
    }

    #[tokio::test]
    async fn expire_applies_to_whole_map() {
        let cache = InMemoryCachePort::new();
        cache.hash_set("map", "f1", b"v1").await.unwrap();
        cache.expire("map", Duration::from_millis(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.hash_scan("map").await.unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn delete_clears_both_scalar_and_map() {
        let cache = InMemoryCachePort::new();
        cache.set("k", b"v", Duration::from_secs(60)).await.unwrap();
        cache.hash_set("k", "f", b"v").await.unwrap();
        cache.delete("k").await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert_eq!(cache.hash_scan("k").await.unwrap(), Vec::new());
    }
}
