//! ASCII normalization for LLM output

/// Normalize model output to plain ASCII with `\n` line endings.
///
/// Curly quotes become straight quotes, en/em dashes become `-`, every other
/// non-ASCII character is dropped, and `\r\n` / `\r` collapse to `\n`.
/// The function is total and idempotent.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let ascii: String = text
        .chars()
        .filter_map(|c| match c {
            '\u{201C}' | '\u{201D}' => Some('"'),
            '\u{2018}' | '\u{2019}' => Some('\''),
            '\u{2013}' | '\u{2014}' => Some('-'),
            c if c.is_ascii() => Some(c),
            _ => None,
        })
        .collect();

    ascii.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_typographic_punctuation() {
        let input = "\u{201C}quoted\u{201D} it\u{2019}s \u{2018}x\u{2019} a\u{2013}b\u{2014}c";
        assert_eq!(clean_text(input), "\"quoted\" it's 'x' a-b-c");
    }

    #[test]
    fn test_drops_other_non_ascii() {
        assert_eq!(clean_text("\u{2705} done \u{1F680}"), " done ");
        assert_eq!(clean_text("caf\u{e9}"), "caf");
    }

    #[test]
    fn test_normalizes_line_endings() {
        assert_eq!(clean_text("a\r\nb\rc\n"), "a\nb\nc\n");
        assert_eq!(clean_text("\r\r\n"), "\n\n");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "plain ascii",
            "\u{201C}mixed\u{201D}\r\n\u{2014}\r",
            "\r\u{00A0}\n",
            "## Coverage summary\r\nEstimated \u{2248} 82%",
            "\u{FFFD}\u{0000}\t\r\r\n\n",
        ];
        for s in samples {
            let once = clean_text(s);
            assert_eq!(clean_text(&once), once, "not idempotent for {s:?}");
        }
    }
}
