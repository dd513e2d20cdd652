//! Answer Cache Service: per-quiz hash map of answer
//! fingerprint to evaluation + embedding, with exact and semantic lookup.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::cache::{CachePort, CachePortExt, keys};
use crate::embedding::cosine_similarity;
use crate::hashing::answer_fingerprint;

use super::codec::{CachedAnswerEntry, decode_entry, encode_entry};

fn map_key(quiz_id: &str) -> String {
    keys::make("answer", "evaluation_map", quiz_id, &[])
}

/// Reads and writes cached answer evaluations for a quiz.
pub struct AnswerCacheService {
    cache: Arc<dyn CachePort>,
    similarity_threshold: f64,
    ttl: Duration,
}

impl AnswerCacheService {
    pub fn new(cache: Arc<dyn CachePort>, similarity_threshold: f64, ttl: Duration) -> Self {
        Self {
            cache,
            // Clamped here too, defensively: config validation should have
            // already rejected an out-of-range value.
            similarity_threshold: similarity_threshold.clamp(0.0, 1.0),
            ttl,
        }
    }

    /// Looks up a cached evaluation for `query_text`/`query_embedding`
    /// within quiz `quiz_id`. Exact fingerprint match first, then the best
    /// semantic match at or above the configured threshold.
    #[instrument(skip(self, query_embedding), fields(quiz_id))]
    pub async fn get(
        &self,
        quiz_id: &str,
        query_embedding: &[f32],
        query_text: &str,
    ) -> Option<CachedAnswerEntry> {
        let key = map_key(quiz_id);
        let fingerprint = answer_fingerprint(query_text);

        if let Some(bytes) = self.cache.hash_get_or_miss(&key, &fingerprint).await {
            match decode_entry(&bytes) {
                Ok(entry) => {
                    debug!(quiz_id, "answer cache exact hit");
                    return Some(entry);
                }
                Err(err) => {
                    tracing::warn!(quiz_id, error = %err, "discarding undecodable answer cache entry");
                }
            }
        }

        let fields = self.cache.hash_scan_or_empty(&key).await;
        let mut best: Option<(f64, CachedAnswerEntry)> = None;
        for (_field, bytes) in fields {
            let entry = match decode_entry(&bytes) {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(quiz_id, error = %err, "skipping undecodable answer cache entry during scan");
                    continue;
                }
            };
            let similarity = cosine_similarity(query_embedding, &entry.embedding);
            if best.as_ref().map(|(s, _)| similarity > *s).unwrap_or(true) {
                best = Some((similarity, entry));
            }
        }

        match best {
            Some((similarity, entry)) if similarity >= self.similarity_threshold => {
                debug!(quiz_id, similarity, "answer cache semantic hit");
                Some(entry)
            }
            _ => None,
        }
    }

    /// Stores `entry` under `query_text`'s fingerprint. The map TTL is set
    /// only on the map's first write, determined here by probing for an
    /// existing entry before writing.
    #[instrument(skip(self, entry), fields(quiz_id))]
    pub async fn put(&self, quiz_id: &str, query_text: &str, entry: &CachedAnswerEntry) {
        let key = map_key(quiz_id);
        let fingerprint = answer_fingerprint(query_text);
        let is_first_write = self.cache.hash_scan_or_empty(&key).await.is_empty();

        self.cache
            .hash_set_best_effort(&key, &fingerprint, &encode_entry(entry))
            .await;

        if is_first_write {
            if let Err(err) = self.cache.expire(&key, self.ttl).await {
                tracing::warn!(quiz_id, error = %err, "failed to set answer cache map TTL");
            }
        }
    }

    /// Deletes the whole per-quiz map, used when a quiz's scoring
    /// semantics change.
    #[instrument(skip(self))]
    pub async fn invalidate(&self, quiz_id: &str) {
        let key = map_key(quiz_id);
        if let Err(err) = self.cache.delete(&key).await {
            tracing::warn!(quiz_id, error = %err, "failed to invalidate answer cache map");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCachePort;

    fn make_entry(embedding: Vec<f32>, model_answer: &str) -> CachedAnswerEntry {
        CachedAnswerEntry {
            score: 0.9,
            completeness: 0.9,
            relevance: 0.9,
            accuracy: 0.9,
            explanation: "Excellent".to_string(),
            keyword_matches: vec!["paris".to_string()],
            model_answer: model_answer.to_string(),
            user_answer_text: "paris".to_string(),
            embedding,
        }
    }

    #[tokio::test]
    async fn put_then_get_exact_fingerprint_hit() {
        let cache = Arc::new(InMemoryCachePort::new());
        let service = AnswerCacheService::new(cache, 0.95, Duration::from_secs(60));
        let entry = make_entry(vec![1.0, 0.0, 0.0], "Paris");

        service.put("q1", "Paris", &entry).await;
        let found = service.get("q1", &[1.0, 0.0, 0.0], "Paris").await;
        assert_eq!(found, Some(entry));
    }

    #[tokio::test]
    async fn get_falls_back_to_semantic_scan_above_threshold() {
        let cache = Arc::new(InMemoryCachePort::new());
        let service = AnswerCacheService::new(cache, 0.9, Duration::from_secs(60));
        let entry = make_entry(vec![1.0, 0.0, 0.0], "Paris");
        service.put("q1", "the capital is paris", &entry).await;

        let found = service
            .get("q1", &[1.0, 0.0, 0.0], "a completely different text")
            .await;
        assert_eq!(found, Some(entry));
    }

    #[tokio::test]
    async fn get_misses_below_threshold() {
        let cache = Arc::new(InMemoryCachePort::new());
        let service = AnswerCacheService::new(cache, 0.95, Duration::from_secs(60));
        let entry = make_entry(vec![1.0, 0.0, 0.0], "Paris");
        service.put("q1", "the capital is paris", &entry).await;

        let found = service
            .get("q1", &[0.0, 1.0, 0.0], "unrelated text")
            .await;
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn invalidate_clears_the_whole_map() {
        let cache = Arc::new(InMemoryCachePort::new());
        let service = AnswerCacheService::new(cache, 0.95, Duration::from_secs(60));
        let entry = make_entry(vec![1.0, 0.0, 0.0], "Paris");
        service.put("q1", "paris", &entry).await;

        service.invalidate("q1").await;

        let found = service.get("q1", &[1.0, 0.0, 0.0], "paris").await;
        assert_eq!(found, None);
    }
}
