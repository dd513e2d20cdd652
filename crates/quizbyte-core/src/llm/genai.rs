//! [`LlmEvaluator`] backed by [`genai::Client`], the same provider
//! abstraction `reflex_server`'s gateway handler calls through
//! (`state.genai_client.exec_chat(&model, genai_req, None)`).

use std::time::Duration;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::instrument;

use super::error::LlmEvaluatorError;
use super::evaluator::LlmEvaluator;

/// Calls a chat-completion model through `genai::Client`, bounding every
/// call with a timeout.
pub struct GenAiEvaluator {
    client: Client,
    model: String,
    timeout: Duration,
}

impl GenAiEvaluator {
    pub fn new(client: Client, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            model: model.into(),
            timeout,
        }
    }
}

#[async_trait]
impl LlmEvaluator for GenAiEvaluator {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn call(&self, prompt: &str) -> Result<String, LlmEvaluatorError> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);

        let response = tokio::time::timeout(
            self.timeout,
            self.client.exec_chat(&self.model, request, None),
        )
        .await
        .map_err(|_| LlmEvaluatorError::Timeout)?
        .map_err(|e| LlmEvaluatorError::ProviderFailed(e.to_string()))?;

        Ok(response.first_text().unwrap_or_default().to_string())
    }
}
