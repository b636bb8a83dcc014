use super::{BackendError, BackendRequest, LlmBackend, LlmProviderConfig, status_error};
use crate::engines::BackendFamily;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat completions backend
pub struct OpenAIBackend {
    config: LlmProviderConfig,
    client: Client,
}

impl OpenAIBackend {
    pub fn new(config: LlmProviderConfig, client: Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl LlmBackend for OpenAIBackend {
    async fn dispatch(&self, request: &BackendRequest<'_>) -> Result<String, BackendError> {
        let family = BackendFamily::OpenAI;
        let api_key = self.config.require_key(family)?;

        let body = ChatRequest {
            model: request.model,
            messages: chat_messages(request),
            temperature: Some(request.temperature),
            max_tokens: Some(request.max_tokens),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
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

/// Chat completion request body, shared with other OpenAI-shaped APIs
#[derive(Serialize)]
pub(super) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Serialize)]
pub(super) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// System instruction followed by the user prompt
pub(super) fn chat_messages<'a>(request: &BackendRequest<'a>) -> Vec<ChatMessage<'a>> {
    vec![
        ChatMessage {
            role: "system",
            content: request.system_prompt,
        },
        ChatMessage {
            role: "user",
            content: request.prompt,
        },
    ]
}

/// Text of the first choice; a null message content reads as empty
pub(super) fn first_choice_text(
    response: ChatResponse,
    family: BackendFamily,
) -> Result<String, BackendError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or(BackendError::EmptyResponse { backend: family })
}
