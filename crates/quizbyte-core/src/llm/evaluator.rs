//! The LLM Evaluator capability.

use async_trait::async_trait;

use super::error::LlmEvaluatorError;

/// Sends an assembled prompt to a language model and returns its raw text
/// response. Post-processing (think-block stripping, JSON extraction,
/// clamping) happens in [`super::json_extract`], not here: implementations
/// only own the call itself, including its timeout.
#[async_trait]
pub trait LlmEvaluator: Send + Sync {
    async fn call(&self, prompt: &str) -> Result<String, LlmEvaluatorError>;
}
