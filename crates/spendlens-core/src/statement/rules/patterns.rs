//! Common regex patterns for statement text extraction.
//!
//! Patterns that depend on configuration (currency symbols, transfer rails,
//! description keywords) are compiled by their extractors instead.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Whitespace runs, newlines included
    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    pub static ref BLANK_LINES: Regex = Regex::new(r"\n\s*\n").unwrap();

    // Record anchor: "01 Sep, 2025 12:38 AM". Not word-bounded, extracted
    // text sometimes glues the previous amount onto the day.
    pub static ref ANCHOR: Regex = Regex::new(
        r"\d{1,2}\s+[A-Za-z]{3},\s*\d{4}\s+\d{1,2}:\d{2}\s*[AaPp][Mm]"
    ).unwrap();
}

/// Numeric token after a currency symbol: "12,34,567.89".
pub const AMOUNT_DIGITS: &str = r"\d[\d,]*(?:\.\d{1,2})?";

/// Shortest run of counterparty name characters.
pub const COUNTERPARTY_NAME: &str = r"[A-Za-z0-9\s.]+?";

/// Turn a keyword phrase into a pattern that tolerates any whitespace between words.
pub fn keyword_pattern(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_matches_wallet_timestamp() {
        assert!(ANCHOR.is_match("01 Sep, 2025 12:38 AM"));
        assert!(ANCHOR.is_match("1 Oct, 2024 9:05 pm"));
        assert!(!ANCHOR.is_match("01/09/2025 12:38"));
        assert!(!ANCHOR.is_match("01 Sep 2025 12:38 AM"));
    }

    #[test]
    fn test_anchor_tolerates_tight_spacing() {
        assert_eq!(ANCHOR.find("x 01 Sep,2025 9:05PM y").unwrap().as_str(), "01 Sep,2025 9:05PM");
        assert_eq!(ANCHOR.find("01 SEP, 2025 9:05 pm").unwrap().as_str(), "01 SEP, 2025 9:05 pm");
    }

    #[test]
    fn test_anchor_splits_glued_amount() {
        let m = ANCHOR.find("₹39901 Sep, 2025 12:38 AM").unwrap();
        assert_eq!(m.as_str(), "01 Sep, 2025 12:38 AM");
    }

    #[test]
    fn test_keyword_pattern() {
        assert_eq!(keyword_pattern("Paid  to"), r"Paid\s+to");
        assert_eq!(keyword_pattern("Rs."), r"Rs\.");
    }
}
