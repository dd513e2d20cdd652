//! The Cache Port: an abstract key-value store with TTL.

use std::time::Duration;

use async_trait::async_trait;

use super::error::CacheError;

/// Abstract key-value cache with TTL and per-key hash-map fields.
///
/// Values are opaque byte strings; a miss is a distinct outcome (`Ok(None)`),
/// never an error. Transport failures are surfaced as [`CacheError`] so
/// callers can apply a consistent propagation policy: a miss-equivalent on
/// read paths, a logged-and-swallowed no-op on write paths (see
/// [`CachePortExt`]).
#[async_trait]
pub trait CachePort: Send + Sync {
    /// Fetches the raw value at `key`, or `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Stores `value` at `key` with the given time-to-live.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;

    /// Deletes `key`, if present.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Fetches `field` from the hash map stored at `key`.
    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Stores `field` = `value` in the hash map at `key`. Implementations do
    /// not themselves apply a TTL here; callers that need the map to expire
    /// call [`Self::expire`] once, on first write.
    async fn hash_set(&self, key: &str, field: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Returns every `(field, value)` pair currently stored in the hash map
    /// at `key`. Materialized eagerly: callers scan small per-quiz maps, not
    /// collection-wide indexes.
    async fn hash_scan(&self, key: &str) -> Result<Vec<(String, Vec<u8>)>, CacheError>;

    /// Sets (or refreshes) the TTL on `key` as a whole, independent of its
    /// contents. Used to bound staleness of a hash-map object on first write.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Liveness probe for the underlying transport.
    async fn ping(&self) -> Result<(), CacheError>;
}

/// Extension helpers implementing a consistent error-propagation policy so
/// call sites never have to repeat the "log and downgrade" boilerplate.
#[async_trait]
pub trait CachePortExt: CachePort {
    /// Reads `key`, treating any transport error as a miss.
    async fn get_or_miss(&self, key: &str) -> Option<Vec<u8>> {
        match self.get(key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "cache read failed, treating as miss");
                None
            }
        }
    }

    /// Writes `key`, logging and swallowing any transport error.
    async fn set_best_effort(&self, key: &str, value: &[u8], ttl: Duration) {
        if let Err(err) = self.set(key, value, ttl).await {
            tracing::warn!(key, error = %err, "cache write failed, continuing without cache");
        }
    }

    /// Reads a hash field, treating a transport error as a miss.
    async fn hash_get_or_miss(&self, key: &str, field: &str) -> Option<Vec<u8>> {
        match self.hash_get(key, field).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, field, error = %err, "cache hash read failed, treating as miss");
                None
            }
        }
    }

    /// Writes a hash field, logging and swallowing any transport error.
    async fn hash_set_best_effort(&self, key: &str, field: &str, value: &[u8]) {
        if let Err(err) = self.hash_set(key, field, value).await {
            tracing::warn!(key, field, error = %err, "cache hash write failed, continuing without cache");
        }
    }

    /// Scans a hash map, treating a transport error as an empty map.
    async fn hash_scan_or_empty(&self, key: &str) -> Vec<(String, Vec<u8>)> {
        match self.hash_scan(key).await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(key, error = %err, "cache hash scan failed, treating as empty");
                Vec::new()
            }
        }
    }
}

impl<T: CachePort + ?Sized> CachePortExt for T {}
