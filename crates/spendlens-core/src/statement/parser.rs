//! Anchored statement parser: segment validation and collection.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::error::{ExtractionError, SegmentDiscard};
use crate::models::config::ExtractionConfig;
use crate::models::transaction::ParsedTransaction;

use super::normalize::normalize;
use super::rules::{parse_anchor, AmountExtractor, DescriptionRules};
use super::segment::{segments, RawSegment};
use super::Result;

/// Counters for one parsing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    /// Anchored segments found.
    pub segments: usize,
    /// Segments that became transactions.
    pub accepted: usize,
    /// Segments dropped for a bad amount or date.
    pub discarded: usize,
}

/// Result of statement extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Transactions in order of appearance.
    pub transactions: Vec<ParsedTransaction>,
    pub stats: ExtractionStats,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Nothing usable was found; usually an unsupported statement layout.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// The transactions, or `NoTransactions` when there are none.
    pub fn require_transactions(self) -> Result<Vec<ParsedTransaction>> {
        if self.transactions.is_empty() {
            return Err(ExtractionError::NoTransactions);
        }
        Ok(self.transactions)
    }
}

/// Trait for statement parsing.
pub trait StatementParser {
    /// Parse statement text into transactions.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;

    /// Parse raw bytes, rejecting anything that is not UTF-8 text.
    fn parse_bytes(&self, data: &[u8]) -> Result<ExtractionResult> {
        let text = std::str::from_utf8(data).map_err(|e| {
            ExtractionError::MalformedInput(format!("statement text is not UTF-8: {}", e))
        })?;
        self.parse(text)
    }
}

/// Parser that splits text at timestamp anchors.
pub struct AnchoredStatementParser {
    amounts: AmountExtractor,
    descriptions: DescriptionRules,
    /// Exclusive lower bound for amounts.
    min_amount: Decimal,
    /// Inclusive upper bound for amounts.
    max_amount: Decimal,
}

impl AnchoredStatementParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        let config = ExtractionConfig::default();
        Self {
            amounts: AmountExtractor::new(),
            descriptions: DescriptionRules::new(),
            min_amount: config.min_amount,
            max_amount: config.max_amount,
        }
    }

    /// Create a parser from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        // A blank symbol list or keyword would compile to a pattern that matches anything.
        if config.currency_symbols.iter().all(|s| s.trim().is_empty()) {
            return Err(ExtractionError::Validation {
                field: "currency_symbols".to_string(),
                reason: "no non-blank currency symbol".to_string(),
            });
        }
        if let Some(i) = config.description_rules.iter().position(|r| r.keyword.trim().is_empty()) {
            return Err(ExtractionError::Validation {
                field: "description_rules".to_string(),
                reason: format!("rule {} has a blank keyword", i + 1),
            });
        }

        let amounts = AmountExtractor::with_symbols(&config.currency_symbols)
            .map_err(|e| invalid_pattern("currency_symbols", e))?;
        let descriptions = DescriptionRules::from_config(config)
            .map_err(|e| invalid_pattern("description_rules", e))?;

        if config.max_amount <= config.min_amount {
            return Err(ExtractionError::Validation {
                field: "max_amount".to_string(),
                reason: format!("{} is not above min_amount {}", config.max_amount, config.min_amount),
            });
        }

        Ok(Self {
            amounts,
            descriptions,
            min_amount: config.min_amount,
            max_amount: config.max_amount,
        })
    }

    /// Turn one segment into a transaction.
    ///
    /// The amount is checked before the date; the first failure decides the
    /// discard reason.
    pub fn extract_segment(&self, segment: &RawSegment<'_>) -> std::result::Result<ParsedTransaction, SegmentDiscard> {
        let token = self
            .amounts
            .find_token(segment.body)
            .ok_or(SegmentDiscard::MissingAmount)?;

        let amount = token.value().ok_or_else(|| SegmentDiscard::InvalidAmount {
            value: token.digits.to_string(),
        })?;

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(SegmentDiscard::NegativeAmount);
        }
        if amount <= self.min_amount || amount > self.max_amount {
            return Err(SegmentDiscard::AmountOutOfRange { amount });
        }

        let date = parse_anchor(segment.anchor).ok_or_else(|| SegmentDiscard::InvalidDate {
            anchor: segment.anchor.to_string(),
        })?;

        let description = self.descriptions.describe(segment.body);

        Ok(ParsedTransaction::new(date, description, amount))
    }
}

impl Default for AnchoredStatementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementParser for AnchoredStatementParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();
        let normalized = normalize(text);

        let mut transactions = Vec::new();
        let mut stats = ExtractionStats::default();

        for segment in segments(&normalized) {
            stats.segments += 1;

            match self.extract_segment(&segment) {
                Ok(transaction) => {
                    trace!(
                        "Segment at {} -> {} {}",
                        segment.offset, transaction.description, transaction.amount
                    );
                    stats.accepted += 1;
                    transactions.push(transaction);
                }
                Err(reason) => {
                    debug!("Discarding segment at {} ({}): {}", segment.offset, segment.anchor, reason);
                    stats.discarded += 1;
                }
            }
        }

        info!(
            "Extracted {} transactions from {} segments ({} discarded)",
            stats.accepted, stats.segments, stats.discarded
        );

        Ok(ExtractionResult {
            transactions,
            stats,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

fn invalid_pattern(field: &str, e: regex::Error) -> ExtractionError {
    ExtractionError::Validation {
        field: field.to_string(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use crate::models::config::DescriptionRuleConfig;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn parse(text: &str) -> ExtractionResult {
        AnchoredStatementParser::new().parse(text).unwrap()
    }

    #[test]
    fn test_single_wallet_entry() {
        let text = "01 Sep, 2025 12:38 AM Paid to Udemy India LLP UPI Transaction ID: 561019228392 Paid by Canara Bank 3900 ₹399";
        let result = parse(text);

        assert_eq!(
            result.transactions,
            vec![ParsedTransaction::new(at(2025, 9, 1, 0, 38), "Paid to Udemy India LLP", dec("399"))]
        );
        assert_eq!(result.stats, ExtractionStats { segments: 1, accepted: 1, discarded: 0 });
    }

    #[test]
    fn test_two_blocks_keep_order() {
        let text = "01 Sep, 2025 12:38 AM Paid to Udemy India LLP UPI Transaction ID: 561019228392 ₹399\n\
                    02 Sep, 2025 6:10 PM Received from Asha Devi NEFT Ref 88231 Credited to Canara Bank ₹1,500.00";
        let result = parse(text);

        assert_eq!(result.transactions.len(), 2);
        assert_eq!(result.transactions[0].description, "Paid to Udemy India LLP");
        assert_eq!(result.transactions[1].description, "Received from Asha Devi");
        assert_eq!(result.transactions[1].amount, dec("1500.00"));
        assert_eq!(result.transactions[1].date, at(2025, 9, 2, 18, 10));
    }

    #[test]
    fn test_zero_amount_dropped_others_kept() {
        let text = "01 Sep, 2025 10:00 AM Paid to A UPI ₹0 \
                    02 Sep, 2025 10:00 AM Paid to B UPI ₹50";
        let result = parse(text);

        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].description, "Paid to B");
        assert_eq!(result.stats.discarded, 1);
    }

    #[test]
    fn test_amount_above_limit_dropped() {
        let text = "01 Sep, 2025 10:00 AM Received from Lottery IMPS ₹10,000,000.01 \
                    02 Sep, 2025 10:00 AM Received from Employer IMPS ₹1,00,00,000";
        let result = parse(text);

        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].amount, dec("10000000"));
    }

    #[test]
    fn test_negative_amount_dropped() {
        let parser = AnchoredStatementParser::new();
        let segs: Vec<_> = segments("01 Sep, 2025 10:00 AM Refund -₹20").collect();

        assert_eq!(parser.extract_segment(&segs[0]), Err(SegmentDiscard::NegativeAmount));
    }

    #[test]
    fn test_no_anchor_is_empty_not_error() {
        let result = parse("Paid to Udemy ₹399 on 01/09/2025");

        assert!(result.is_empty());
        assert_eq!(result.stats.segments, 0);
        assert!(matches!(result.require_transactions(), Err(ExtractionError::NoTransactions)));
    }

    #[test]
    fn test_default_description() {
        let result = parse("03 Sep, 2025 8:00 AM Cashback credited to Canara Bank ₹25");

        assert_eq!(result.transactions[0].description, "Transaction");
        assert_eq!(result.transactions[0].amount, dec("25"));
    }

    #[test]
    fn test_paid_to_wins_over_received_from() {
        let result = parse("03 Sep, 2025 8:00 AM Received from Y UPI Paid to X UPI ₹25");

        assert_eq!(result.transactions[0].description, "Paid to X");
    }

    #[test]
    fn test_invalid_date_dropped() {
        let parser = AnchoredStatementParser::new();
        let segs: Vec<_> = segments("31 Feb, 2025 10:00 AM Paid to A UPI ₹10").collect();

        assert_eq!(
            parser.extract_segment(&segs[0]),
            Err(SegmentDiscard::InvalidDate { anchor: "31 Feb, 2025 10:00 AM".to_string() })
        );
    }

    #[test]
    fn test_amount_checked_before_date() {
        let parser = AnchoredStatementParser::new();
        let segs: Vec<_> = segments("31 Feb, 2025 10:00 AM Paid to A UPI").collect();

        assert_eq!(parser.extract_segment(&segs[0]), Err(SegmentDiscard::MissingAmount));
    }

    #[test]
    fn test_multiline_entry_collapsed() {
        let text = "Transaction statement\n\n01 Sep, 2025\n12:38 AM\nPaid to\nUdemy India LLP\nUPI Transaction ID: 5610\n₹399\n\nPage 1 of 2";
        let result = parse(text);

        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].description, "Paid to Udemy India LLP");
    }

    #[test]
    fn test_parse_bytes_rejects_non_utf8() {
        let parser = AnchoredStatementParser::new();
        let err = parser.parse_bytes(&[0xff, 0xfe, 0x00]).unwrap_err();

        assert!(matches!(err, ExtractionError::MalformedInput(_)));
    }

    #[test]
    fn test_parse_bytes_accepts_text() {
        let parser = AnchoredStatementParser::new();
        let result = parser
            .parse_bytes("01 Sep, 2025 12:38 AM Paid to Udemy UPI ₹399".as_bytes())
            .unwrap();

        assert_eq!(result.transactions.len(), 1);
    }

    #[test]
    fn test_configured_bounds() {
        let config = ExtractionConfig {
            max_amount: dec("100"),
            ..ExtractionConfig::default()
        };
        let parser = AnchoredStatementParser::from_config(&config).unwrap();
        let result = parser
            .parse("01 Sep, 2025 1:00 AM ₹99 02 Sep, 2025 1:00 AM ₹101")
            .unwrap();

        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].amount, dec("99"));
    }

    #[test]
    fn test_from_config_rejects_inverted_bounds() {
        let config = ExtractionConfig {
            max_amount: Decimal::ZERO,
            ..ExtractionConfig::default()
        };

        assert!(matches!(
            AnchoredStatementParser::from_config(&config),
            Err(ExtractionError::Validation { .. })
        ));
    }

    #[test]
    fn test_shared_parser_across_threads() {
        let parser = AnchoredStatementParser::new();
        let text = "01 Sep, 2025 12:38 AM Paid to Udemy UPI ₹399 02 Sep, 2025 9:05 AM Received from Ravi IMPS ₹50";

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| parser.parse(text).unwrap()))
                .collect();

            for handle in handles {
                let result = handle.join().unwrap();
                assert_eq!(result.stats.accepted, 2);
                assert_eq!(result.transactions[1].description, "Received from Ravi");
            }
        });
    }

    #[test]
    fn test_detached_dash_keeps_amount() {
        let result = parse("01 Sep, 2025 12:38 AM Paid to Udemy India LLP UPI Ref 5610 - ₹399");

        assert_eq!(
            result.transactions,
            vec![ParsedTransaction::new(at(2025, 9, 1, 0, 38), "Paid to Udemy India LLP", dec("399"))]
        );
    }

    #[test]
    fn test_tight_anchor_spacing() {
        let result = parse("01 Sep,2025 9:05PM Paid to Ravi UPI ₹50 02 Sep, 2025 7:15 am Received from Asha IMPS ₹75");

        assert_eq!(result.stats.accepted, 2);
        assert_eq!(result.transactions[0].date, at(2025, 9, 1, 21, 5));
        assert_eq!(result.transactions[1].date, at(2025, 9, 2, 7, 15));
    }

    #[test]
    fn test_from_config_rejects_blank_symbols() {
        let config = ExtractionConfig {
            currency_symbols: vec![" ".to_string(), String::new()],
            ..ExtractionConfig::default()
        };

        assert!(matches!(
            AnchoredStatementParser::from_config(&config),
            Err(ExtractionError::Validation { field, .. }) if field == "currency_symbols"
        ));
    }

    #[test]
    fn test_from_config_rejects_blank_keyword() {
        let mut config = ExtractionConfig::default();
        config.description_rules.push(DescriptionRuleConfig::new("  ", "Anything"));

        assert!(matches!(
            AnchoredStatementParser::from_config(&config),
            Err(ExtractionError::Validation { field, .. }) if field == "description_rules"
        ));
    }
}
