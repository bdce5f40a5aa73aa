//! Anchor-based segmentation of normalized statement text.

use std::iter::Peekable;

use regex::Matches;

use super::rules::patterns::ANCHOR;

/// Text of one candidate transaction: its anchor and everything up to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSegment<'a> {
    /// The matched timestamp, e.g. `01 Sep, 2025 12:38 AM`.
    pub anchor: &'a str,
    /// Text after the anchor, trimmed.
    pub body: &'a str,
    /// Byte offset of the anchor in the source text.
    pub offset: usize,
}

/// Lazy iterator over the segments of a text, in textual order.
pub struct Segments<'a> {
    text: &'a str,
    anchors: Peekable<Matches<'static, 'a>>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = RawSegment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let anchor = self.anchors.next()?;
        let end = self
            .anchors
            .peek()
            .map(|next| next.start())
            .unwrap_or(self.text.len());

        Some(RawSegment {
            anchor: anchor.as_str(),
            body: self.text[anchor.end()..end].trim(),
            offset: anchor.start(),
        })
    }
}

/// Split `text` at every timestamp anchor.
///
/// Anchors are found in one left-to-right pass; text before the first anchor
/// is ignored, and text without anchors yields nothing.
pub fn segments(text: &str) -> Segments<'_> {
    Segments {
        text,
        anchors: ANCHOR.find_iter(text).peekable(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_segment() {
        let text = "01 Sep, 2025 12:38 AM Paid to Udemy India LLP ₹399";
        let segs: Vec<_> = segments(text).collect();

        assert_eq!(
            segs,
            vec![RawSegment {
                anchor: "01 Sep, 2025 12:38 AM",
                body: "Paid to Udemy India LLP ₹399",
                offset: 0,
            }]
        );
    }

    #[test]
    fn test_segments_in_textual_order() {
        let text = "Statement header 05 Oct, 2025 9:00 PM first ₹10 \
                    01 Sep, 2025 12:38 AM second ₹20 \
                    15 Sep, 2025 11:11 AM third ₹30";
        let segs: Vec<_> = segments(text).collect();

        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].anchor, "05 Oct, 2025 9:00 PM");
        assert_eq!(segs[0].body, "first ₹10");
        assert_eq!(segs[1].body, "second ₹20");
        assert_eq!(segs[2].body, "third ₹30");
        assert!(segs[0].offset < segs[1].offset && segs[1].offset < segs[2].offset);
    }

    #[test]
    fn test_no_anchor_yields_nothing() {
        assert_eq!(segments("Paid to Someone ₹100 on 01/09/2025").count(), 0);
        assert_eq!(segments("").count(), 0);
    }

    #[test]
    fn test_adjacent_anchors_give_empty_body() {
        let segs: Vec<_> = segments("01 Sep, 2025 12:38 AM 02 Sep, 2025 1:00 PM ₹5").collect();

        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].body, "");
        assert_eq!(segs[1].body, "₹5");
    }
}
