//! Caching decorator for [`EmbeddingProvider`].
//!
//! Grounded on the sibling pack's `CachedInferenceAdapter` decorator
//! (`f03c5e15_..._cached_inference_adapter.rs.rs`): wraps any
//! inner provider, consults its own cache before calling out, and never
//! lets a cache transport error break the call. Concurrent requests for the
//! same `(provider, text)` pair are coalesced through [`RequestCoalescer`]
//! so a cache stampede never reaches the remote embedding model twice.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::cache::{CachePort, CachePortExt};
use crate::coalesce::RequestCoalescer;
use crate::hashing::hash_sha256_hex;

use super::error::EmbeddingError;
use super::provider::{EmbeddingProvider, require_non_empty};
use super::vector::{decode_vector, encode_vector};

/// Wraps an [`EmbeddingProvider`] with cache-aside lookup and single-flight
/// coalescing of concurrent identical requests.
pub struct CachedEmbeddingProvider<P: EmbeddingProvider> {
    inner: P,
    cache: Arc<dyn CachePort>,
    coalescer: Arc<RequestCoalescer>,
    ttl: Duration,
}

impl<P: EmbeddingProvider> CachedEmbeddingProvider<P> {
    pub fn new(
        inner: P,
        cache: Arc<dyn CachePort>,
        coalescer: Arc<RequestCoalescer>,
        ttl: Duration,
    ) -> Self {
        Self {
            inner,
            cache,
            coalescer,
            ttl,
        }
    }

    fn cache_key(&self, text: &str) -> String {
        format!(
            "embedding:{}:{}",
            self.inner.provider_id(),
            hash_sha256_hex(text)
        )
    }

    async fn read_cached(&self, key: &str) -> Option<Vec<f32>> {
        let bytes = self.cache.get_or_miss(key).await?;
        match decode_vector(&bytes) {
            Ok(vector) => Some(vector),
            Err(err) => {
                tracing::warn!(key, error = %err, "discarding undecodable cached embedding");
                None
            }
        }
    }
}

#[async_trait]
impl<P: EmbeddingProvider + Send + Sync> EmbeddingProvider for CachedEmbeddingProvider<P> {
    #[instrument(skip(self, text), fields(provider = %self.inner.provider_id()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        require_non_empty(text)?;

        let key = self.cache_key(text);
        if let Some(vector) = self.read_cached(&key).await {
            debug!(key = %key, "embedding cache hit");
            return Ok(vector);
        }

        self.coalescer
            .coalesce(
                &key,
                || async {
                    let vector = self.inner.embed(text).await?;
                    // Never persist a zero-length or provider-failure placeholder.
                    if !vector.is_empty() {
                        self.cache
                            .set_best_effort(&key, &encode_vector(&vector), self.ttl)
                            .await;
                    }
                    Ok(vector)
                },
                || async {
                    if let Some(vector) = self.read_cached(&key).await {
                        Ok(vector)
                    } else {
                        // The leader failed before populating the cache; fall
                        // back to a direct call rather than propagating a
                        // stale miss to every coalesced follower.
                        self.inner.embed(text).await
                    }
                },
            )
            .await
    }

    fn provider_id(&self) -> &str {
        self.inner.provider_id()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}
