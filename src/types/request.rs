//! Generation request types

use serde::{Deserialize, Serialize};
use std::path::Path;
use strum_macros::{Display, EnumString};

/// Lowest coverage target accepted
pub const MIN_TARGET_COVERAGE: u8 = 50;
/// Highest coverage target accepted
pub const MAX_TARGET_COVERAGE: u8 = 100;
/// Coverage targets move in steps of this size
pub const TARGET_COVERAGE_STEP: u8 = 5;
/// Default coverage target
pub const DEFAULT_TARGET_COVERAGE: u8 = 80;

/// File extensions accepted as Terraform input
pub const ALLOWED_EXTENSIONS: &[&str] = &["tf", "tfvars"];

/// Cloud provider the Terraform module targets
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum CloudProvider {
    #[default]
    Azure,
    #[strum(serialize = "GCP")]
    #[serde(rename = "GCP")]
    Gcp,
    Other,
}

/// Whether tests are simulated placeholders or derived from real file contents
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TestMode {
    #[default]
    Mock,
    Real,
}

impl TestMode {
    /// Human-readable label shown to the user and embedded in prompts
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Mock => "Mock Test (Simulated)",
            Self::Real => "Real Test (Runnable with terraform test)",
        }
    }
}

/// Errors raised while assembling a generation request
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(
        "Target coverage must be between {MIN_TARGET_COVERAGE} and {MAX_TARGET_COVERAGE} in steps of {TARGET_COVERAGE_STEP}, got {0}"
    )]
    InvalidCoverage(u8),
    #[error("Unsupported file type: {0}. Only .tf and .tfvars files are accepted")]
    UnsupportedFile(String),
    #[error("No Terraform files supplied")]
    NoFiles,
    #[error("Invalid service name '{0}'. Path separators are not allowed")]
    InvalidService(String),
}

/// A single uploaded Terraform file, held fully in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerraformFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl TerraformFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Decode the content as UTF-8, dropping invalid byte sequences
    pub fn text(&self) -> String {
        self.content
            .utf8_chunks()
            .map(|chunk| chunk.valid())
            .collect()
    }

    /// Check the file name carries an accepted Terraform extension
    pub fn has_allowed_extension(&self) -> bool {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ALLOWED_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
    }
}

/// Everything needed for a single generation, immutable once built
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub provider: CloudProvider,
    pub service: String,
    pub target_coverage: u8,
    pub engine: String,
    pub mode: TestMode,
    pub files: Vec<TerraformFile>,
}

impl GenerationRequest {
    /// Build a validated request
    pub fn new(
        provider: CloudProvider,
        service: impl Into<String>,
        target_coverage: u8,
        engine: impl Into<String>,
        mode: TestMode,
        files: Vec<TerraformFile>,
    ) -> Result<Self, RequestError> {
        validate_target_coverage(target_coverage)?;

        // The service name becomes part of the artifact file name
        let service: String = service.into();
        if service.contains(['/', '\\', '\0']) {
            return Err(RequestError::InvalidService(service));
        }

        if files.is_empty() {
            return Err(RequestError::NoFiles);
        }
        if let Some(bad) = files.iter().find(|f| !f.has_allowed_extension()) {
            return Err(RequestError::UnsupportedFile(bad.name.clone()));
        }

        Ok(Self {
            provider,
            service,
            target_coverage,
            engine: engine.into(),
            mode,
            files,
        })
    }
}

/// Check a coverage target lies in range and on a step boundary
pub fn validate_target_coverage(value: u8) -> Result<u8, RequestError> {
    if (MIN_TARGET_COVERAGE..=MAX_TARGET_COVERAGE).contains(&value)
        && value % TARGET_COVERAGE_STEP == 0
    {
        Ok(value)
    } else {
        Err(RequestError::InvalidCoverage(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_provider_from_str() {
        assert_eq!("azure".parse::<CloudProvider>().ok(), Some(CloudProvider::Azure));
        assert_eq!("gcp".parse::<CloudProvider>().ok(), Some(CloudProvider::Gcp));
        assert_eq!(CloudProvider::Gcp.to_string(), "GCP");
        assert!("aws".parse::<CloudProvider>().is_err());
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!("REAL".parse::<TestMode>().ok(), Some(TestMode::Real));
        assert_eq!(TestMode::Mock.to_string(), "mock");
        assert!(TestMode::Real.label().contains("terraform test"));
    }

    #[test]
    fn test_text_drops_invalid_bytes() {
        let file = TerraformFile::new("main.tf", b"resource \xff\xfe\"x\" {}".to_vec());
        assert_eq!(file.text(), "resource \"x\" {}");
    }

    #[test]
    fn test_allowed_extensions() {
        assert!(TerraformFile::new("main.tf", Vec::new()).has_allowed_extension());
        assert!(TerraformFile::new("prod.TFVARS", Vec::new()).has_allowed_extension());
        assert!(!TerraformFile::new("main.tf.json", Vec::new()).has_allowed_extension());
        assert!(!TerraformFile::new("README", Vec::new()).has_allowed_extension());
    }

    #[test]
    fn test_coverage_validation() {
        assert!(validate_target_coverage(50).is_ok());
        assert!(validate_target_coverage(100).is_ok());
        assert!(validate_target_coverage(85).is_ok());
        assert!(validate_target_coverage(45).is_err());
        assert!(validate_target_coverage(82).is_err());
        assert!(validate_target_coverage(105).is_err());
    }

    #[test]
    fn test_request_rejects_bad_input() {
        let files = vec![TerraformFile::new("main.tf", b"".to_vec())];
        assert!(
            GenerationRequest::new(
                CloudProvider::Azure,
                "AKS",
                80,
                "gpt-4o",
                TestMode::Real,
                files
            )
            .is_ok()
        );

        let err = GenerationRequest::new(
            CloudProvider::Azure,
            "AKS",
            80,
            "gpt-4o",
            TestMode::Real,
            Vec::new(),
        );
        assert!(matches!(err, Err(RequestError::NoFiles)));

        let err = GenerationRequest::new(
            CloudProvider::Other,
            "EC2",
            80,
            "gpt-4o",
            TestMode::Mock,
            vec![TerraformFile::new("notes.txt", b"hi".to_vec())],
        );
        assert!(matches!(err, Err(RequestError::UnsupportedFile(name)) if name == "notes.txt"));
    }

    #[test]
    fn test_request_rejects_path_like_service() {
        for service in ["../escaped", "team/aks", "..\\aks"] {
            let err = GenerationRequest::new(
                CloudProvider::Azure,
                service,
                80,
                "gpt-4o",
                TestMode::Real,
                vec![TerraformFile::new("main.tf", b"".to_vec())],
            );
            assert!(
                matches!(&err, Err(RequestError::InvalidService(name)) if name == service),
                "{service} should be rejected"
            );
        }
    }
}
