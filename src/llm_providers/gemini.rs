use super::{BackendError, BackendRequest, LlmBackend, LlmProviderConfig, status_error};
use crate::engines::BackendFamily;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

/// Google generative language backend, also serving the Hugging Face proxy
pub struct GeminiBackend {
    config: LlmProviderConfig,
    client: Client,
}

impl GeminiBackend {
    /// Creates a new instance of `GeminiBackend` with the given configuration
    pub fn new(config: LlmProviderConfig, client: Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    /// Generates content with the system instruction attached.
    ///
    /// Sampling bounds are left to the model defaults.
    async fn dispatch(&self, request: &BackendRequest<'_>) -> Result<String, BackendError> {
        let family = BackendFamily::Gemini;
        let api_key = self.config.require_key(family)?;

        let request_body = json!({
            "systemInstruction": {
                "parts": [{"text": request.system_prompt}]
            },
            "contents": [
                {
                    "role": "user",
                    "parts": [{"text": request.prompt}]
                }
            ]
        });

        // Key goes in a header so it never appears in error URLs
        let api_url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, request.model
        );

        let response = self
            .client
            .post(api_url)
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| BackendError::http(family, e))?;

        if !response.status().is_success() {
            return Err(status_error(family, response).await);
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::http(family, e))?;

        // {"candidates": [{"content": {"parts": [{"text": "..."}]}}]}
        let parts = response_body["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or(BackendError::EmptyResponse { backend: family })?;

        let text: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();

        Ok(text)
    }
}
