use super::openai::{ChatRequest, ChatResponse, chat_messages, first_choice_text};
use super::{BackendError, BackendRequest, LlmBackend, LlmProviderConfig, status_error};
use crate::engines::BackendFamily;
use async_trait::async_trait;
use reqwest::Client;

/// Mistral chat backend.
///
/// The request shape matches OpenAI's chat completions, but no temperature or
/// token bound is sent; Mistral's defaults apply.
pub struct MistralBackend {
    config: LlmProviderConfig,
    client: Client,
}

impl MistralBackend {
    pub fn new(config: LlmProviderConfig, client: Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl LlmBackend for MistralBackend {
    async fn dispatch(&self, request: &BackendRequest<'_>) -> Result<String, BackendError> {
        let family = BackendFamily::Mistral;
        let api_key = self.config.require_key(family)?;

        let body = ChatRequest {
            model: request.model,
            messages: chat_messages(request),
            temperature: None,
            max_tokens: None,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::http(family, e))?;

        if !response.status().is_success() {
            return Err(status_error(family, response).await);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| BackendError::http(family, e))?;

        first_choice_text(parsed, family)
    }
}
