//! Answer Cache Service error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnswerCacheError {
    /// A stored entry could not be decoded; treated as a miss by callers,
    /// never surfaced to `checkAnswer`.
    #[error("failed to decode cached answer entry: {0}")]
    Decode(String),
}
