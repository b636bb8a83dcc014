//! Terraform LLM Test Generator
//!
//! Builds prompts from Terraform modules, sends them to one of several LLM
//! backends, and splits the response into generated `.tftest.hcl` code and a
//! coverage report.

#![allow(clippy::uninlined_format_args)] // Style preference
#![allow(clippy::format_push_string)] // Performance improvement but stylistic
#![allow(clippy::return_self_not_must_use)] // Builder pattern is clear enough

pub mod cli;
pub mod common;
pub mod config;
pub mod engines;
pub mod generator;
pub mod llm;
pub mod llm_providers;
pub mod logger;
pub mod parser;
pub mod prompt;
pub mod text;
pub mod types;
pub mod ui;

// Re-export important structs and functions for easier testing
pub use config::Config;
pub use generator::{Generation, generate};
pub use llm::Dispatcher;
pub use parser::parse_result;
pub use prompt::{build_mock_prompt, build_real_prompt};
pub use text::clean_text;
pub use types::{
    CloudProvider, CoverageBand, GenerationRequest, LlmResponse, ParsedResult, TerraformFile,
    TestMode,
};
