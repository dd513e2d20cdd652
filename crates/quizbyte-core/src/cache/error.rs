//! Cache port error types.

use thiserror::Error;

/// Errors returned by a [`super::CachePort`] implementation.
///
/// Transport errors are surfaced here but callers on read paths must treat
/// them as a miss, and callers on write paths must log-and-continue rather
/// than fail the request. See [`crate::cache::CachePortExt`].
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache transport error: {0}")]
    Transport(String),

    #[error("cache value at '{key}' failed to decode: {reason}")]
    Decode { key: String, reason: String },
}
