//! The LLM Evaluator: prompt assembly, model invocation, and
//! the mandated response post-processing pipeline.

mod error;
mod evaluator;
mod genai;
mod json_extract;
mod prompt;

pub use error::LlmEvaluatorError;
pub use evaluator::LlmEvaluator;
pub use genai::GenAiEvaluator;
pub use json_extract::{ExtractedEvaluation, extract_evaluation};
pub use prompt::build_evaluation_prompt;
