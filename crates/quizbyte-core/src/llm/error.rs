//! LLM Evaluator error types.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum LlmEvaluatorError {
    /// The call exceeded its configured timeout.
    #[error("LLM call timed out")]
    Timeout,

    /// Transport or provider-side failure calling the model.
    #[error("LLM service error: {0}")]
    ProviderFailed(String),

    /// The model's response had no balanced `{...}` candidate JSON.
    ///
    /// The cleaned (whitespace-trimmed, `<think>` stripped) text is kept
    /// attached for diagnostics.
    #[error("LLM service error: no balanced JSON object in response: {cleaned_text:?}")]
    NoJsonObject { cleaned_text: String },

    /// The candidate JSON did not parse as an object at all.
    #[error("LLM service error: candidate JSON did not parse: {0}")]
    MalformedJson(String),
}
