//! Response and parsed-result types

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Text returned by the dispatcher, with the failure message kept separately
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The model output, or the formatted error string when the call failed
    pub raw_text: String,
    /// The underlying failure message, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LlmResponse {
    pub fn success(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            error: None,
        }
    }

    pub fn failure(raw_text: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Sections extracted from an LLM response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResult {
    pub summary: String,
    pub hcl_code: String,
    pub coverage_text: String,
    pub suggestions: String,
    pub coverage_percent: Option<u16>,
}

impl ParsedResult {
    /// Severity band for the reported coverage
    pub fn band(&self) -> CoverageBand {
        CoverageBand::classify(self.coverage_percent)
    }
}

/// Three-way severity band for a coverage percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CoverageBand {
    Good,
    Warning,
    Critical,
}

impl CoverageBand {
    /// Lowest percentage classified as good
    pub const GOOD_THRESHOLD: u16 = 75;
    /// Lowest percentage classified as warning
    pub const WARNING_THRESHOLD: u16 = 50;

    /// Classify a percentage; an absent value is always critical
    pub const fn classify(percent: Option<u16>) -> Self {
        match percent {
            Some(p) if p >= Self::GOOD_THRESHOLD => Self::Good,
            Some(p) if p >= Self::WARNING_THRESHOLD => Self::Warning,
            _ => Self::Critical,
        }
    }
}
