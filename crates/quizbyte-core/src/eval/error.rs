//! Evaluation Pipeline error types and failure routing.

use thiserror::Error;

use crate::llm::LlmEvaluatorError;

#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// `userText` was empty, or another caller-supplied argument failed
    /// validation before any I/O.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A sub-category name did not resolve to a known sub-category.
    #[error("unknown category: {0}")]
    InvalidCategory(String),

    /// `quizId` did not resolve to a known quiz.
    #[error("quiz not found: {0}")]
    QuizNotFound(String),

    /// The LLM evaluator failed (timeout, transport, or unparsable output).
    #[error("LLM service error: {0}")]
    LlmServiceError(#[from] LlmEvaluatorError),

    /// The backing store failed. Spec §4.7: "Store errors -> InternalError".
    #[error("internal error: {0}")]
    InternalError(String),

    /// A remote call exceeded its per-call timeout.
    #[error("operation timed out")]
    Timeout,
}

/// Maps a [`crate::eval::store::StoreError`] to the pipeline-level
/// `InternalError` variant.
impl From<super::store::StoreError> for EvalError {
    fn from(err: super::store::StoreError) -> Self {
        EvalError::InternalError(err.to_string())
    }
}
