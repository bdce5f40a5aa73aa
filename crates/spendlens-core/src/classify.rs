//! Batch classification: prompt building, reply parsing and merging.
//!
//! The classifier itself is an external service. This module only prepares
//! what is sent to it and joins its reply back onto the parsed transactions
//! by 1-based index.

use tracing::{debug, warn};

use crate::error::ClassifyError;
use crate::models::config::ClassificationConfig;
use crate::models::transaction::{
    Classification, ClassifiedTransaction, DescriptionHint, ParsedTransaction, TransactionSource,
};

/// Result type for classification operations.
pub type Result<T> = std::result::Result<T, ClassifyError>;

/// Something that can classify a batch of parsed transactions.
pub trait TransactionClassifier {
    /// One classification per transaction, indexed from 1.
    fn classify_batch(&self, transactions: &[ParsedTransaction]) -> Result<Vec<Classification>>;
}

/// Classifier backed by an already received reply text.
pub struct ReplyClassifier {
    reply: String,
}

impl ReplyClassifier {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

impl TransactionClassifier for ReplyClassifier {
    fn classify_batch(&self, _transactions: &[ParsedTransaction]) -> Result<Vec<Classification>> {
        parse_classifications(&self.reply)
    }
}

/// Numbered transaction list for a batch prompt.
pub fn build_batch_prompt(transactions: &[ParsedTransaction]) -> String {
    transactions
        .iter()
        .enumerate()
        .map(|(i, t)| {
            format!(
                "{}. Date: {}, Description: \"{}\", Amount: {}",
                i + 1,
                t.date.format("%Y-%m-%d %H:%M"),
                t.description,
                t.amount
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The span from the first `[` to the last `]`, if any.
pub fn extract_json_array(reply: &str) -> Option<&str> {
    let start = reply.find('[')?;
    let end = reply.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&reply[start..=end])
}

/// Parse a classifier reply that embeds a JSON array of classifications.
pub fn parse_classifications(reply: &str) -> Result<Vec<Classification>> {
    let json = extract_json_array(reply).ok_or(ClassifyError::NoJson)?;
    let classifications: Vec<Classification> = serde_json::from_str(json)?;
    debug!("Parsed {} classifications", classifications.len());
    Ok(classifications)
}

/// Parse suggested descriptions; any failure falls back to the originals.
pub fn parse_description_hints(reply: &str, transactions: &[ParsedTransaction]) -> Vec<DescriptionHint> {
    let parsed = extract_json_array(reply)
        .ok_or(ClassifyError::NoJson)
        .and_then(|json| serde_json::from_str::<Vec<DescriptionHint>>(json).map_err(ClassifyError::from));

    match parsed {
        Ok(hints) => hints,
        Err(e) => {
            warn!("Keeping original descriptions: {}", e);
            transactions
                .iter()
                .enumerate()
                .map(|(i, t)| DescriptionHint {
                    index: i + 1,
                    description: t.description.clone(),
                })
                .collect()
        }
    }
}

/// Join classifications and description hints onto parsed transactions.
///
/// Transactions the classifier skipped are left out. All merged records
/// share `batch_id`.
pub fn merge(
    transactions: &[ParsedTransaction],
    classifications: &[Classification],
    hints: &[DescriptionHint],
    batch_id: Option<&str>,
    config: &ClassificationConfig,
) -> Vec<ClassifiedTransaction> {
    let mut merged = Vec::with_capacity(transactions.len());

    for (i, parsed) in transactions.iter().enumerate() {
        let index = i + 1;
        let Some(class) = classifications.iter().find(|c| c.index == index) else {
            debug!("No classification for transaction {}", index);
            continue;
        };

        let description = hints
            .iter()
            .find(|h| h.index == index)
            .map(|h| h.description.trim())
            .filter(|d| !d.is_empty() && d.chars().count() < config.max_description_len)
            .unwrap_or(parsed.description.as_str())
            .to_string();

        merged.push(ClassifiedTransaction {
            date: parsed.date,
            description,
            amount: parsed.amount,
            category: class.category,
            kind: class.kind,
            merchant: class.merchant.clone(),
            confidence: clamp_confidence(class.confidence, config.default_confidence),
            ai_note: class.note.clone(),
            source: TransactionSource::PdfExtracted,
            batch_id: batch_id.map(str::to_string),
        });
    }

    merged
}

/// Run a classifier over a batch and merge the result.
pub fn classify_statement<C: TransactionClassifier + ?Sized>(
    classifier: &C,
    transactions: &[ParsedTransaction],
    hints: &[DescriptionHint],
    batch_id: Option<&str>,
    config: &ClassificationConfig,
) -> Result<Vec<ClassifiedTransaction>> {
    let classifications = classifier.classify_batch(transactions)?;
    Ok(merge(transactions, &classifications, hints, batch_id, config))
}

/// A manually entered transaction with a user-supplied classification.
pub fn manual_entry(
    parsed: ParsedTransaction,
    classification: &Classification,
    config: &ClassificationConfig,
) -> ClassifiedTransaction {
    ClassifiedTransaction {
        date: parsed.date,
        description: parsed.description,
        amount: parsed.amount,
        category: classification.category,
        kind: classification.kind,
        merchant: classification.merchant.clone(),
        confidence: clamp_confidence(classification.confidence, config.manual_confidence),
        ai_note: classification.note.clone(),
        source: TransactionSource::Manual,
        batch_id: None,
    }
}

fn clamp_confidence(value: Option<f64>, default: u8) -> u8 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.round().min(100.0) as u8,
        _ => default.min(100),
    }
}
