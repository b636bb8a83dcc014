//! LLM dispatch.
//!
//! Routes an engine identifier to a backend, sends the prompt, and always
//! hands back a string: failures are reported on the notifier's error channel
//! and replaced by an `Error with <engine>: <message>` placeholder.

use crate::config::Config;
use crate::engines::{self, BackendFamily, Route};
use crate::llm_providers::{BackendError, BackendRequest, LlmBackend, create_backend};
use crate::prompt::SYSTEM_PROMPT;
use crate::text::clean_text;
use crate::types::LlmResponse;
use crate::ui::Notifier;
use crate::{log_debug, log_error, log_warn};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;

/// Sampling temperature for backends that accept one
pub const TEMPERATURE: f32 = 0.4;
/// Output token bound for backends that accept one
pub const MAX_TOKENS: u32 = 2500;

/// Returned in place of model output for identifiers no backend handles
pub const UNSUPPORTED_ENGINE: &str = "Unsupported LLM engine.";

/// Shown when the Hugging Face engine is served by the proxy model
pub const HUGGINGFACE_PROXY_WARNING: &str = "Hugging Face model selected. Using Gemini Flash as a stable proxy. Ensure HUGGINGFACE_API_KEY is conceptually set for a real deployment.";

/// Failure inside a dispatch, before it is flattened to a string
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(
        "GOOGLE_API_KEY environment variable not found. Please set it before running the script."
    )]
    MissingProxyCredential,
    #[error("No backend registered for {0}")]
    NoBackend(BackendFamily),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Routes prompts to vendor backends
pub struct Dispatcher {
    config: Config,
    backends: HashMap<BackendFamily, Box<dyn LlmBackend>>,
    notifier: Arc<dyn Notifier>,
}

impl Dispatcher {
    /// Build a dispatcher with one HTTP backend per family
    pub fn new(config: Config, notifier: Arc<dyn Notifier>) -> Self {
        let client = Client::new();
        let backends = BackendFamily::ALL
            .iter()
            .map(|family| (*family, create_backend(*family, &config, &client)))
            .collect();

        Self {
            config,
            backends,
            notifier,
        }
    }

    /// Replace the backend serving a family
    pub fn with_backend(mut self, family: BackendFamily, backend: Box<dyn LlmBackend>) -> Self {
        self.backends.insert(family, backend);
        self
    }

    /// Send `prompt` to the engine and return its cleaned text, or an error placeholder
    pub async fn call_llm(&self, engine: &str, prompt: &str) -> String {
        self.respond(engine, prompt).await.raw_text
    }

    /// Like [`Dispatcher::call_llm`], keeping the failure message alongside the text
    pub async fn respond(&self, engine: &str, prompt: &str) -> LlmResponse {
        match self.try_dispatch(engine, prompt).await {
            Ok(text) => LlmResponse::success(text),
            Err(e) => {
                let message = e.to_string();
                log_error!("LLM call to {} failed: {}", engine, message);
                self.notifier.error(&format!("LLM call failed: {message}"));
                LlmResponse::failure(format!("Error with {engine}: {message}"), message)
            }
        }
    }

    async fn try_dispatch(&self, engine: &str, prompt: &str) -> Result<String, DispatchError> {
        // Every engine is gated on the Google credential, whichever backend serves it
        if self.config.proxy_credential().is_none() {
            return Err(DispatchError::MissingProxyCredential);
        }

        let route = engines::resolve(engine, &self.config.huggingface_proxy_model);
        let (family, model) = match &route {
            Route::Direct { family, model } => (*family, model.as_str()),
            Route::HuggingFaceProxy { model } => {
                if !self.config.has_huggingface_key() {
                    log_warn!("Hugging Face engine proxied to {}", model);
                    self.notifier.warn(HUGGINGFACE_PROXY_WARNING);
                }
                (BackendFamily::Gemini, model.as_str())
            }
            Route::Unsupported => {
                log_debug!("Unsupported engine: {}", engine);
                return Ok(UNSUPPORTED_ENGINE.to_string());
            }
        };

        let backend = self
            .backends
            .get(&family)
            .ok_or(DispatchError::NoBackend(family))?;

        log_debug!(
            "Dispatching to {} with model {} - prompt {} chars",
            family,
            model,
            prompt.len()
        );

        let request = BackendRequest {
            model,
            system_prompt: SYSTEM_PROMPT,
            prompt,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let text = backend.dispatch(&request).await?;
        log_debug!("Received {} chars from {}", text.len(), family);
        Ok(clean_text(&text))
    }
}
