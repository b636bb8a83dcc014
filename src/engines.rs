//! Engine catalogue and routing.
//!
//! Single source of truth for the engine identifiers offered to users and the
//! backend family each identifier is dispatched to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine identifiers offered by the CLI
pub const SUPPORTED_ENGINES: &[&str] = &[
    "gpt-5",
    "gpt-4o",
    "claude-3-5-sonnet",
    "gemini-2.5-pro",
    "mistral-large",
    "huggingface",
];

/// Default engine when none is selected
pub const DEFAULT_ENGINE: &str = "gpt-5";

/// Identifier routed through the Hugging Face proxy
pub const HUGGINGFACE_ENGINE: &str = "huggingface";

/// Vendor API family a request is sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendFamily {
    OpenAI,
    Anthropic,
    Gemini,
    Mistral,
}

impl BackendFamily {
    /// All backend families
    pub const ALL: &'static [BackendFamily] = &[
        BackendFamily::OpenAI,
        BackendFamily::Anthropic,
        BackendFamily::Gemini,
        BackendFamily::Mistral,
    ];

    /// Family name as used in config files
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::Mistral => "mistral",
        }
    }

    /// Environment variable holding the credential for this family
    pub const fn api_key_env(&self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Gemini => "GOOGLE_API_KEY",
            Self::Mistral => "MISTRAL_API_KEY",
        }
    }

    /// Public API base URL
    pub const fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com",
            Self::Gemini => "https://generativelanguage.googleapis.com",
            Self::Mistral => "https://api.mistral.ai",
        }
    }
}

impl fmt::Display for BackendFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where an engine identifier is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Sent to `family` with the engine identifier as the model name
    Direct { family: BackendFamily, model: String },
    /// Hugging Face selection, served by a fixed Gemini model
    HuggingFaceProxy { model: String },
    /// No backend handles this identifier
    Unsupported,
}

impl Route {
    /// Backend family that will serve the request, if any
    pub fn family(&self) -> Option<BackendFamily> {
        match self {
            Self::Direct { family, .. } => Some(*family),
            Self::HuggingFaceProxy { .. } => Some(BackendFamily::Gemini),
            Self::Unsupported => None,
        }
    }

    /// Model name sent to the backend, if any
    pub fn model(&self) -> Option<&str> {
        match self {
            Self::Direct { model, .. } | Self::HuggingFaceProxy { model } => Some(model),
            Self::Unsupported => None,
        }
    }
}

/// Prefix table, checked in order
const PREFIX_ROUTES: &[(&str, BackendFamily)] = &[
    ("gpt", BackendFamily::OpenAI),
    ("claude", BackendFamily::Anthropic),
    ("gemini", BackendFamily::Gemini),
    ("mistral", BackendFamily::Mistral),
];

/// Resolve an engine identifier to its route
pub fn resolve(engine: &str, huggingface_proxy_model: &str) -> Route {
    if let Some((_, family)) = PREFIX_ROUTES
        .iter()
        .find(|(prefix, _)| engine.starts_with(*prefix))
    {
        return Route::Direct {
            family: *family,
            model: engine.to_string(),
        };
    }

    if engine == HUGGINGFACE_ENGINE {
        return Route::HuggingFaceProxy {
            model: huggingface_proxy_model.to_string(),
        };
    }

    Route::Unsupported
}

/// Check an identifier is in the offered catalogue
pub fn is_supported(engine: &str) -> bool {
    SUPPORTED_ENGINES.contains(&engine)
}
