//! The Embedding Provider capability.

use async_trait::async_trait;

use super::error::EmbeddingError;

/// Converts text into a fixed-dimension embedding vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds `text`. Returns [`EmbeddingError::InvalidInput`] for empty
    /// text without making any remote call.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// A short identifier for this provider/model pair, used as part of
    /// cache keys so switching providers cannot return stale vectors from
    /// a different embedding space.
    fn provider_id(&self) -> &str;

    /// The dimensionality this provider produces.
    fn dimension(&self) -> usize;
}

/// Rejects empty (after trimming) text before any provider-specific work.
pub(crate) fn require_non_empty(text: &str) -> Result<(), EmbeddingError> {
    if text.trim().is_empty() {
        Err(EmbeddingError::InvalidInput)
    } else {
        Ok(())
    }
}
