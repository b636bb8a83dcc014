use crate::engines::BackendFamily;
use crate::log_debug;

use anyhow::{Context, Result, anyhow};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the optional Hugging Face credential
pub const HUGGINGFACE_API_KEY_ENV: &str = "HUGGINGFACE_API_KEY";

/// Model serving requests for the `huggingface` engine
pub const DEFAULT_HUGGINGFACE_PROXY_MODEL: &str = "gemini-2.5-flash";

/// Configuration resolved once at startup and passed to the dispatcher
#[derive(Deserialize, Serialize, Clone)]
pub struct Config {
    /// Per-backend settings, keyed by backend family name
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Hugging Face credential, only checked to decide whether to warn
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub huggingface_api_key: String,
    /// Model that stands in for Hugging Face
    #[serde(default = "default_huggingface_proxy_model")]
    pub huggingface_proxy_model: String,
}

/// Backend-specific configuration
#[derive(Deserialize, Serialize, Clone, Default)]
pub struct ProviderConfig {
    /// API key for the backend
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    /// Base URL override, empty for the public endpoint
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_url: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("providers", &self.providers)
            .field("huggingface_api_key", &redact(&self.huggingface_api_key))
            .field("huggingface_proxy_model", &self.huggingface_proxy_model)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

fn default_huggingface_proxy_model() -> String {
    DEFAULT_HUGGINGFACE_PROXY_MODEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        let providers = BackendFamily::ALL
            .iter()
            .map(|family| (family.name().to_string(), ProviderConfig::default()))
            .collect();

        Self {
            providers,
            huggingface_api_key: String::new(),
            huggingface_proxy_model: default_huggingface_proxy_model(),
        }
    }
}

impl Config {
    /// Load the configuration file (if any) and overlay credentials from the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_config_path(),
        };

        let mut config = match config_path {
            Some(p) if p.exists() => Self::from_file(&p)?,
            Some(p) if path.is_some() => {
                return Err(anyhow!("Configuration file not found: {}", p.display()));
            }
            _ => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        log_debug!(
            "Configuration loaded - providers: {:?}, proxy model: {}",
            config.providers,
            config.huggingface_proxy_model
        );
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            anyhow!(
                "Invalid configuration file format: {}. Please check {} for syntax errors.",
                e,
                path.display()
            )
        })?;
        Ok(config)
    }

    /// Overlay credentials from environment-style lookups; empty values are ignored
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for family in BackendFamily::ALL {
            if let Some(key) = lookup(family.api_key_env()).filter(|v| !v.is_empty()) {
                self.providers
                    .entry(family.name().to_string())
                    .or_default()
                    .api_key = key;
            }
        }

        if let Some(key) = lookup(HUGGINGFACE_API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.huggingface_api_key = key;
        }
    }

    /// Save the configuration, creating the parent directory if needed
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()
                .ok_or_else(|| anyhow!("Unable to determine config directory"))?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file {}", config_path.display()))?;
        log_debug!("Configuration saved to {}", config_path.display());
        Ok(config_path)
    }

    /// Path of the per-user configuration file
    pub fn default_config_path() -> Option<PathBuf> {
        config_dir().map(|mut path| {
            path.push("tftest-gen");
            path.push("config.toml");
            path
        })
    }

    /// Get the configuration for a backend family
    pub fn get_provider_config(&self, family: BackendFamily) -> Option<&ProviderConfig> {
        self.providers.get(family.name())
    }

    /// Credential for a backend family, if set
    pub fn api_key(&self, family: BackendFamily) -> Option<&str> {
        self.get_provider_config(family)
            .map(|p| p.api_key.as_str())
            .filter(|k| !k.is_empty())
    }

    /// Effective base URL for a backend family
    pub fn base_url(&self, family: BackendFamily) -> &str {
        self.get_provider_config(family)
            .map(|p| p.base_url.as_str())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| family.default_base_url())
    }

    /// Set a base URL override
    pub fn set_base_url(&mut self, family: BackendFamily, url: impl Into<String>) {
        self.providers
            .entry(family.name().to_string())
            .or_default()
            .base_url = url.into();
    }

    /// Set a credential
    pub fn set_api_key(&mut self, family: BackendFamily, key: impl Into<String>) {
        self.providers
            .entry(family.name().to_string())
            .or_default()
            .api_key = key.into();
    }

    /// The generic credential every dispatch is gated on
    pub fn proxy_credential(&self) -> Option<&str> {
        self.api_key(BackendFamily::Gemini)
    }

    pub fn has_huggingface_key(&self) -> bool {
        !self.huggingface_api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.huggingface_proxy_model, "gemini-2.5-flash");
        assert_eq!(
            config.base_url(BackendFamily::OpenAI),
            "https://api.openai.com/v1"
        );
        assert!(config.proxy_credential().is_none());
        assert!(!config.has_huggingface_key());
    }

    #[test]
    fn test_env_overlay_ignores_empty_values() {
        let mut config = Config::default();
        config.apply_env(env_from(&[
            ("GOOGLE_API_KEY", "g-key"),
            ("OPENAI_API_KEY", ""),
            ("MISTRAL_API_KEY", "m-key"),
        ]));

        assert_eq!(config.proxy_credential(), Some("g-key"));
        assert_eq!(config.api_key(BackendFamily::OpenAI), None);
        assert_eq!(config.api_key(BackendFamily::Mistral), Some("m-key"));
        assert!(!config.has_huggingface_key());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config: Config = toml::from_str(
            r#"
            [providers.anthropic]
            api_key = "from-file"
            base_url = "http://localhost:9000"
            "#,
        )
        .expect("valid toml");
        config.apply_env(env_from(&[("ANTHROPIC_API_KEY", "from-env")]));

        assert_eq!(config.api_key(BackendFamily::Anthropic), Some("from-env"));
        assert_eq!(
            config.base_url(BackendFamily::Anthropic),
            "http://localhost:9000"
        );
        assert_eq!(config.huggingface_proxy_model, DEFAULT_HUGGINGFACE_PROXY_MODEL);
    }

    #[test]
    fn test_debug_redacts_keys() {
        let mut config = Config::default();
        config.set_api_key(BackendFamily::OpenAI, "sk-secret");
        config.huggingface_api_key = "hf-secret".to_string();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(!rendered.contains("hf-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
