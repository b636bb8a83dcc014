use tftest_gen::parser::{
    CODE_FALLBACK, COVERAGE_FALLBACK, SUGGESTIONS_FALLBACK, SUMMARY_FALLBACK,
};
use tftest_gen::{CoverageBand, clean_text, parse_result};

#[path = "test_utils.rs"]
mod test_utils;
use test_utils::well_formed_response;

#[test]
fn test_round_trip_scenario() {
    let text = "## Resource and variable summary\nFoo\n## Generated `.tftest.hcl` code block\n```hcl\ntest \"x\" {}\n```\n## Coverage summary\nEstimated 82%\n## Improvement suggestions\nDo Y";
    let parsed = parse_result(text);

    assert_eq!(parsed.summary, "Foo");
    assert_eq!(parsed.hcl_code, "test \"x\" {}");
    assert!(parsed.coverage_text.contains("82%"));
    assert_eq!(parsed.coverage_percent, Some(82));
    assert_eq!(parsed.suggestions, "Do Y");
    assert_eq!(parsed.band(), CoverageBand::Good);
}

#[test]
fn test_missing_header_scenario() {
    let parsed = parse_result("random unstructured text");

    assert_eq!(parsed.summary, SUMMARY_FALLBACK);
    assert_eq!(parsed.hcl_code, CODE_FALLBACK);
    assert_eq!(parsed.coverage_text, COVERAGE_FALLBACK);
    assert_eq!(parsed.coverage_percent, None);
    assert_eq!(parsed.suggestions, SUGGESTIONS_FALLBACK);
    assert_eq!(parsed.band(), CoverageBand::Critical);
}

#[test]
fn test_error_placeholder_degrades_to_fallbacks() {
    let parsed = parse_result("Error with gpt-4o: openai API request failed with status 500");
    assert_eq!(parsed.hcl_code, CODE_FALLBACK);
    assert_eq!(parsed.coverage_percent, None);
}

#[test]
fn test_cleaned_vendor_output() {
    let raw = "## Resource and variable summary\r\nThe \u{201C}aks\u{201D} cluster \u{2014} 1 node pool\r\n## Generated `.tftest.hcl` code block\r\n```hcl\r\nrun \"check\" {\r\n  assert {\r\n    condition     = azurerm_kubernetes_cluster.aks.name == \"aks\"\r\n    error_message = \"wrong name\"\r\n  }\r\n}\r\n```\r\n## Coverage summary\r\n\u{2705} 55% coverage\r\n## Improvement suggestions\r\nTest the node pool";
    let parsed = parse_result(&clean_text(raw));

    assert_eq!(parsed.summary, "The \"aks\" cluster - 1 node pool");
    assert!(parsed.hcl_code.starts_with("run \"check\" {\n  assert {"));
    assert!(!parsed.hcl_code.contains('\r'));
    assert_eq!(parsed.coverage_percent, Some(55));
    assert_eq!(parsed.band(), CoverageBand::Warning);
    assert_eq!(parsed.suggestions, "Test the node pool");
}

#[test]
fn test_band_follows_reported_percentage() {
    for (percent, band) in [
        (100, CoverageBand::Good),
        (75, CoverageBand::Good),
        (74, CoverageBand::Warning),
        (50, CoverageBand::Warning),
        (49, CoverageBand::Critical),
    ] {
        let parsed = parse_result(&well_formed_response(percent));
        assert_eq!(parsed.coverage_percent, Some(percent));
        assert_eq!(parsed.band(), band, "percent {percent}");
    }
}

#[test]
fn test_scrambled_headers_never_partially_populate() {
    let orders = [
        ["Coverage summary", "Resource and variable summary", "Improvement suggestions"],
        ["Improvement suggestions", "Coverage summary", "Resource and variable summary"],
        ["Resource and variable summary", "Improvement suggestions", "Coverage summary"],
    ];
    for order in orders {
        let text = order
            .iter()
            .map(|h| format!("## {h}\nbody 90%\n"))
            .collect::<String>();
        let parsed = parse_result(&text);
        assert_eq!(parsed.summary, SUMMARY_FALLBACK, "{order:?}");
        assert_eq!(parsed.coverage_text, COVERAGE_FALLBACK, "{order:?}");
        assert_eq!(parsed.suggestions, SUGGESTIONS_FALLBACK, "{order:?}");
        assert_eq!(parsed.coverage_percent, None);
    }
}

#[test]
fn test_parse_is_total_on_arbitrary_bytes() {
    let mut state: u32 = 0x1234_5678;
    for _ in 0..64 {
        let bytes: Vec<u8> = (0..256)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state.to_le_bytes()[0]
            })
            .collect();
        let text = String::from_utf8_lossy(&bytes);
        let parsed = parse_result(&text);
        assert!(!parsed.summary.is_empty());
        assert!(!parsed.coverage_text.is_empty());
        assert!(!parsed.suggestions.is_empty());

        let cleaned = clean_text(&text);
        assert_eq!(clean_text(&cleaned), cleaned);
        assert!(cleaned.is_ascii());
    }
}
