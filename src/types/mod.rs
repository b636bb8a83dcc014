//! Core data types for test generation
//!
//! This module consolidates the values that flow through a single generation:
//! - The request collected from the user
//! - The raw response returned by an LLM backend
//! - The parsed result and its coverage band

mod request;
mod result;

// Request types
pub use request::{
    ALLOWED_EXTENSIONS, CloudProvider, DEFAULT_TARGET_COVERAGE, GenerationRequest,
    MAX_TARGET_COVERAGE, MIN_TARGET_COVERAGE, RequestError, TARGET_COVERAGE_STEP, TerraformFile,
    TestMode, validate_target_coverage,
};

// Result types
pub use result::{CoverageBand, LlmResponse, ParsedResult};
