//! Embedding provider error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Text was empty; this fails fast, before any remote call or cache
    /// lookup.
    #[error("invalid input: embedding text must not be empty")]
    InvalidInput,

    /// The remote embedding model call failed (transport error, non-2xx
    /// response, malformed payload).
    #[error("embedding provider call failed: {0}")]
    ProviderFailed(String),

    /// A cached vector could not be decoded back into floats.
    #[error("failed to decode cached embedding: {0}")]
    DecodeFailed(String),
}
