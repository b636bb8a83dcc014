//! Test generation pipeline
//!
//! Request -> prompt -> dispatch -> parse, plus the downloadable artifact.

use crate::llm::Dispatcher;
use crate::parser::{CODE_FALLBACK, parse_result};
use crate::prompt::build_prompt;
use crate::types::{GenerationRequest, LlmResponse, ParsedResult, TestMode};
use crate::{log_debug, log_info};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything produced by one generation
#[derive(Debug, Clone)]
pub struct Generation {
    pub request: GenerationRequest,
    pub response: LlmResponse,
    pub parsed: ParsedResult,
}

impl Generation {
    /// File name for the downloadable test file
    pub fn artifact_name(&self) -> String {
        artifact_file_name(&self.request.service, self.request.mode)
    }

    /// Extracted HCL code, or the raw response when no code could be found
    pub fn artifact_content(&self) -> &str {
        if self.parsed.hcl_code == CODE_FALLBACK {
            &self.response.raw_text
        } else {
            &self.parsed.hcl_code
        }
    }

    /// Write the artifact into `dir`, returning the full path
    pub fn write_artifact(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        let path = dir.join(self.artifact_name());
        fs::write(&path, self.artifact_content())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log_info!("Wrote test file to {}", path.display());
        Ok(path)
    }
}

/// `<service-lowercased>_<mock|real>_test.tftest.hcl`
pub fn artifact_file_name(service: &str, mode: TestMode) -> String {
    format!("{}_{}_test.tftest.hcl", service.to_lowercase(), mode)
}

/// Run one generation end to end. Never fails: dispatch errors arrive as text.
#[tracing::instrument(skip_all, fields(engine = %request.engine, mode = %request.mode))]
pub async fn generate(dispatcher: &Dispatcher, request: GenerationRequest) -> Generation {
    log_debug!(
        "Generating {} tests for {} {} using {}",
        request.mode,
        request.provider,
        request.service,
        request.engine
    );

    let prompt = build_prompt(&request);
    let response = dispatcher.respond(&request.engine, &prompt).await;
    let parsed = parse_result(&response.raw_text);

    log_debug!(
        "Generation finished - coverage {:?}, band {}",
        parsed.coverage_percent,
        parsed.band()
    );

    Generation {
        request,
        response,
        parsed,
    }
}
