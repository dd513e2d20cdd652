//! The Store collaborator contract.
//!
//! Expressed the idiomatic Rust way: a `Result` return and cooperative
//! cancellation via the caller dropping the future (e.g. under
//! `tokio::time::timeout`), rather than a threaded-through
//! `(value, error)` plus cancellation-context pair.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::model::{Quiz, QuizEvaluationBands, SubCategory};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("quiz not found: {0}")]
    NotFound(String),

    #[error("store query failed: {0}")]
    QueryFailed(String),

    #[error("store write failed: {0}")]
    WriteFailed(String),
}

/// Persistence collaborator the Evaluation Pipeline and Batch Generator
/// depend on. Implemented by `quizbyte-server`'s Postgres adapter in
/// production and by an in-memory fake in tests.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_quiz_by_id(&self, id: Uuid) -> Result<Quiz, StoreError>;

    /// A uniformly random quiz, optionally restricted to one sub-category.
    async fn get_random_quiz(&self, sub_category_id: Option<Uuid>) -> Result<Quiz, StoreError>;

    async fn get_quizzes_by_criteria(
        &self,
        sub_category_id: Uuid,
        count: u32,
    ) -> Result<Vec<Quiz>, StoreError>;

    /// Case-insensitive name lookup.
    async fn get_sub_category_id_by_name(&self, name: &str) -> Result<Uuid, StoreError>;

    async fn get_all_sub_categories(&self) -> Result<Vec<SubCategory>, StoreError>;

    /// `Ok(None)` if the quiz has no configured bands (bands are optional
    /// per quiz).
    async fn get_quiz_evaluation_bands(
        &self,
        quiz_id: Uuid,
    ) -> Result<Option<QuizEvaluationBands>, StoreError>;

    /// Persists a newly generated quiz. Transactional: either the quiz (and
    /// any bands) is fully visible afterward, or nothing is.
    async fn save_quiz(&self, quiz: &Quiz) -> Result<(), StoreError>;

    /// Persists a batch of newly generated quizzes as a single transaction:
    /// all are visible afterward, or none are. Used by the batch generator
    /// to commit one sub-category's accepted candidates atomically.
    async fn save_quizzes(&self, quizzes: &[Quiz]) -> Result<(), StoreError>;
}
