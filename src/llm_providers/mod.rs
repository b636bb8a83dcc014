//! Vendor backends.
//!
//! Each backend family implements [`LlmBackend`]. The dispatcher only sees the
//! trait, so vendor request and response shapes stay inside their own file.

mod anthropic;
mod gemini;
mod mistral;
mod openai;

pub use anthropic::AnthropicBackend;
pub use gemini::GeminiBackend;
pub use mistral::MistralBackend;
pub use openai::OpenAIBackend;

use crate::config::Config;
use crate::engines::BackendFamily;
use async_trait::async_trait;
use reqwest::Client;

/// A single chat request as handed to a backend
#[derive(Debug, Clone, Copy)]
pub struct BackendRequest<'a> {
    pub model: &'a str,
    pub system_prompt: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Failure from a backend call
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{env} is not set. An API key is required for {backend} requests")]
    MissingApiKey {
        backend: BackendFamily,
        env: &'static str,
    },
    #[error("{backend} request failed: {source}")]
    Http {
        backend: BackendFamily,
        #[source]
        source: reqwest::Error,
    },
    #[error("{backend} API request failed with status {status}: {body}")]
    Status {
        backend: BackendFamily,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Failed to extract content from {backend} API response")]
    EmptyResponse { backend: BackendFamily },
}

impl BackendError {
    pub(crate) fn http(backend: BackendFamily, source: reqwest::Error) -> Self {
        Self::Http { backend, source }
    }
}

/// Capability shared by every vendor backend
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Send the request and return the model's text
    async fn dispatch(&self, request: &BackendRequest<'_>) -> Result<String, BackendError>;
}

/// Connection settings for one backend
#[derive(Clone)]
pub struct LlmProviderConfig {
    pub api_key: String,
    pub base_url: String,
}

impl LlmProviderConfig {
    /// Resolve settings for `family` from the application config
    pub fn from_config(config: &Config, family: BackendFamily) -> Self {
        Self {
            api_key: config.api_key(family).unwrap_or_default().to_string(),
            base_url: config.base_url(family).trim_end_matches('/').to_string(),
        }
    }

    /// The API key, or a missing-credential error for `family`
    pub(crate) fn require_key(&self, family: BackendFamily) -> Result<&str, BackendError> {
        if self.api_key.is_empty() {
            Err(BackendError::MissingApiKey {
                backend: family,
                env: family.api_key_env(),
            })
        } else {
            Ok(&self.api_key)
        }
    }
}

/// Build the backend for a family, sharing one HTTP client
pub fn create_backend(
    family: BackendFamily,
    config: &Config,
    client: &Client,
) -> Box<dyn LlmBackend> {
    let provider_config = LlmProviderConfig::from_config(config, family);
    let client = client.clone();
    match family {
        BackendFamily::OpenAI => Box::new(OpenAIBackend::new(provider_config, client)),
        BackendFamily::Anthropic => Box::new(AnthropicBackend::new(provider_config, client)),
        BackendFamily::Gemini => Box::new(GeminiBackend::new(provider_config, client)),
        BackendFamily::Mistral => Box::new(MistralBackend::new(provider_config, client)),
    }
}

/// Read a non-success response into a status error
async fn status_error(backend: BackendFamily, response: reqwest::Response) -> BackendError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_string());
    BackendError::Status {
        backend,
        status,
        body,
    }
}
