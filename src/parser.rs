//! Response Parser
//!
//! Splits the free-form text an LLM returns into the four report sections
//! and the coverage percentage. Parsing never fails: anything that cannot be
//! located keeps a fixed fallback value.

use crate::log_debug;
use crate::types::ParsedResult;
use regex::Regex;
use std::sync::LazyLock;

/// Summary value when the section triple cannot be located
pub const SUMMARY_FALLBACK: &str = "Could not parse summary.";
/// Code value when neither a fenced block nor the code header is present
pub const CODE_FALLBACK: &str = "No HCL code found.";
/// Coverage value when the section triple cannot be located
pub const COVERAGE_FALLBACK: &str = "N/A";
/// Suggestions value when the section triple cannot be located
pub const SUGGESTIONS_FALLBACK: &str = "Could not parse suggestions.";

static HCL_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```hcl\s*(.*?)\s*```").expect("Failed to compile HCL block regex pattern")
});

static CODE_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)#{2,}\s*Generated\s+`?\.tftest\.hcl`?\s+code block\s*(.*?)(?:##|$)")
        .expect("Failed to compile code section regex pattern")
});

static CODE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#{2,}\s*Generated\s+`?\.tftest\.hcl`?\s+code block")
        .expect("Failed to compile code header regex pattern")
});

static SECTIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?is)#{2,}\s*Resource and variable summary\s*(.*?)",
        r"#{2,}\s*Coverage summary\s*(.*?)",
        r"#{2,}\s*Improvement suggestions\s*(.*)",
    ))
    .expect("Failed to compile sections regex pattern")
});

static PERCENTAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,3})%").expect("Failed to compile percentage regex pattern")
});

/// Parse raw LLM output into a fully populated [`ParsedResult`]
pub fn parse_result(text: &str) -> ParsedResult {
    log_debug!("Parsing LLM response - {} chars", text.len());

    let hcl_code = extract_code(text);

    let (summary, coverage_text, suggestions) = extract_sections(text).unwrap_or_else(|| {
        log_debug!("Section headers not found in order, using fallbacks");
        (
            SUMMARY_FALLBACK.to_string(),
            COVERAGE_FALLBACK.to_string(),
            SUGGESTIONS_FALLBACK.to_string(),
        )
    });

    let coverage_percent = extract_percentage(&coverage_text);

    ParsedResult {
        summary,
        hcl_code,
        coverage_text,
        suggestions,
        coverage_percent,
    }
}

/// Locate the generated test code, preferring a fenced `hcl` block
fn extract_code(text: &str) -> String {
    if let Some(caps) = HCL_BLOCK.captures(text) {
        log_debug!("Found fenced HCL block");
        return caps[1].trim().to_string();
    }

    // Some models skip the markdown fence entirely
    if let Some(caps) = CODE_SECTION.captures(text) {
        log_debug!("No fenced HCL block, using code section header");
        return caps[1].trim().to_string();
    }

    CODE_FALLBACK.to_string()
}

/// Capture summary, coverage, and suggestions; all three or nothing
fn extract_sections(text: &str) -> Option<(String, String, String)> {
    let caps = SECTIONS.captures(text)?;

    // The code section sits between the summary and coverage headers
    let summary_span = &caps[1];
    let summary = CODE_HEADER
        .find(summary_span)
        .map_or(summary_span, |m| &summary_span[..m.start()]);

    Some((
        summary.trim().to_string(),
        caps[2].trim().to_string(),
        caps[3].trim().to_string(),
    ))
}

/// First one-to-three digit number directly followed by `%`
fn extract_percentage(coverage: &str) -> Option<u16> {
    PERCENTAGE
        .captures(coverage)
        .and_then(|caps| caps[1].parse().ok())
}
