//! The Evaluation Pipeline and the data model it operates over
//!.

mod error;
mod model;
mod pipeline;
mod store;

pub use error::EvalError;
pub use model::{
    Difficulty, EvaluationResult, Quiz, QuizAttempt, QuizCandidate, QuizEvaluationBands,
    QuizSummary, SubCategory,
};
pub use pipeline::{EvaluationPipeline, PipelineConfig};
pub use store::{Store, StoreError};
