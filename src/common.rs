use crate::engines::{DEFAULT_ENGINE, SUPPORTED_ENGINES, is_supported};
use crate::types::{
    CloudProvider, DEFAULT_TARGET_COVERAGE, GenerationRequest, TerraformFile, TestMode,
    validate_target_coverage,
};
use anyhow::{Context, Result, anyhow};
use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Inputs shared by every command that builds a generation request
#[derive(Args, Clone, Debug)]
pub struct GenerationParams {
    /// Cloud provider the module targets
    #[arg(long, default_value = "Azure", help = "Cloud provider (Azure, GCP, Other)")]
    pub provider: CloudProvider,

    /// Service deployed by the module
    #[arg(short, long, help = "Service name (e.g. AKS, GKE, EC2, CloudSQL)")]
    pub service: String,

    /// Target test coverage
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_TARGET_COVERAGE,
        value_parser = coverage_parser,
        help = "Target test coverage percentage (50-100, step 5)"
    )]
    pub coverage: u8,

    /// LLM engine
    #[arg(
        short,
        long,
        default_value = DEFAULT_ENGINE,
        value_parser = engine_parser,
        help = "LLM engine (use 'tftest-gen engines' to list)"
    )]
    pub engine: String,

    /// Test mode
    #[arg(short, long, default_value = "mock", help = "Test mode (mock or real)")]
    pub mode: TestMode,

    /// Terraform files to analyze
    #[arg(required = true, help = "Terraform files (.tf, .tfvars)")]
    pub files: Vec<PathBuf>,
}

impl GenerationParams {
    /// Read the files and build a validated request
    pub fn into_request(self) -> Result<GenerationRequest> {
        let files = self
            .files
            .iter()
            .map(|path| {
                let content = fs::read(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .ok_or_else(|| anyhow!("Invalid file name: {}", path.display()))?;
                Ok(TerraformFile::new(name, content))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(GenerationRequest::new(
            self.provider,
            self.service,
            self.coverage,
            self.engine,
            self.mode,
            files,
        )?)
    }
}

/// Validates a coverage target from the command line
pub fn coverage_parser(s: &str) -> Result<u8, String> {
    let value: u8 = s
        .parse()
        .map_err(|_| format!("Invalid coverage '{s}'. Expected a number from 50 to 100"))?;
    validate_target_coverage(value).map_err(|e| e.to_string())
}

/// Validates that an engine identifier is offered
pub fn engine_parser(s: &str) -> Result<String, String> {
    if is_supported(s) {
        Ok(s.to_string())
    } else {
        Err(format!(
            "Invalid engine '{}'. Available engines: {}",
            s,
            SUPPORTED_ENGINES.join(", ")
        ))
    }
}
