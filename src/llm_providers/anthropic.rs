use super::{BackendError, BackendRequest, LlmBackend, LlmProviderConfig, status_error};
use crate::engines::BackendFamily;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic messages API backend
pub struct AnthropicBackend {
    config: LlmProviderConfig,
    client: Client,
}

impl AnthropicBackend {
    pub fn new(config: LlmProviderConfig, client: Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    async fn dispatch(&self, request: &BackendRequest<'_>) -> Result<String, BackendError> {
        let family = BackendFamily::Anthropic;
        let api_key = self.config.require_key(family)?;

        let body = MessagesRequest {
            model: request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system_prompt,
            messages: vec![Message {
                role: "user",
                content: request.prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.config.base_url))
            .header("x-api-key", api_key.trim())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::http(family, e))?;

        if !response.status().is_success() {
            return Err(status_error(family, response).await);
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| BackendError::http(family, e))?;

        // Only the first text block carries the answer
        parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .ok_or(BackendError::EmptyResponse { backend: family })
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}
