//! Whitespace normalization of raw extracted text.

use super::rules::patterns::{BLANK_LINES, WHITESPACE_RUN};

/// Collapse whitespace runs (newlines included) to single spaces and trim.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    let joined = BLANK_LINES.replace_all(&collapsed, "\n");
    joined.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_and_newlines() {
        let raw = "  01 Sep, 2025\n\n\n 12:38 AM\tPaid to   Udemy \r\n ₹399  ";
        assert_eq!(normalize(raw), "01 Sep, 2025 12:38 AM Paid to Udemy ₹399");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            "a\n\nb",
            "x \u{00a0} y\n",
            "01 Sep, 2025 12:38 AM Paid to Udemy ₹399",
            "\n\n  lots   of\t\tspace \n",
        ];

        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(normalize(" \n\t "), "");
    }
}
