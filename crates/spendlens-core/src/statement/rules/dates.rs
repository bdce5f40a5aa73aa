//! Timestamp extraction for statement anchors.

use chrono::NaiveDateTime;

use super::patterns::WHITESPACE_RUN;

/// `01 Sep, 2025 12:38 AM`
pub const ANCHOR_FORMAT: &str = "%d %b, %Y %I:%M %p";

/// Parse an anchor substring such as `01 Sep, 2025 12:38 AM`.
///
/// Spacing around the comma and the meridiem may be missing, and month and
/// meridiem are matched case-insensitively. Returns `None` for unknown month
/// names, days outside the month and malformed clock times.
pub fn parse_anchor(anchor: &str) -> Option<NaiveDateTime> {
    let compact = WHITESPACE_RUN.replace_all(anchor.trim(), " ");
    NaiveDateTime::parse_from_str(&compact, ANCHOR_FORMAT).ok()
}
