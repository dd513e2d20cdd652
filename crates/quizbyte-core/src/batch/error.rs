//! Batch Generator error types.

use thiserror::Error;

use crate::eval::StoreError;
use crate::llm::LlmEvaluatorError;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("LLM service error: {0}")]
    LlmServiceError(#[from] LlmEvaluatorError),

    #[error("candidate proposal response was not a JSON array: {0}")]
    MalformedCandidateList(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
