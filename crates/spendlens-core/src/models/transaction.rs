//! Transaction data models for extracted and classified statement records.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A candidate transaction recovered from statement text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    /// Date and time taken from the record's anchor.
    pub date: NaiveDateTime,

    /// Direction plus counterparty, e.g. "Paid to Udemy India LLP".
    pub description: String,

    /// Positive amount with currency and separators stripped.
    pub amount: Decimal,
}

impl ParsedTransaction {
    pub fn new(date: NaiveDateTime, description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
        }
    }
}

/// Spending category assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Category {
    Food,
    Travel,
    Shopping,
    Bills,
    Entertainment,
    Healthcare,
    Education,
    Investment,
    Salary,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Food,
        Category::Travel,
        Category::Shopping,
        Category::Bills,
        Category::Entertainment,
        Category::Healthcare,
        Category::Education,
        Category::Investment,
        Category::Salary,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
            Category::Investment => "Investment",
            Category::Salary => "Salary",
            Category::Other => "Other",
        }
    }
}

impl From<String> for Category {
    /// Unknown labels fall back to `Other`.
    fn from(s: String) -> Self {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .unwrap_or(Category::Other)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Whether a transaction is a need, a want, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum SpendType {
    Need,
    Want,
    Investment,
    Income,
    Other,
}

impl SpendType {
    pub const ALL: [SpendType; 5] = [
        SpendType::Need,
        SpendType::Want,
        SpendType::Investment,
        SpendType::Income,
        SpendType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpendType::Need => "Need",
            SpendType::Want => "Want",
            SpendType::Investment => "Investment",
            SpendType::Income => "Income",
            SpendType::Other => "Other",
        }
    }
}

impl From<String> for SpendType {
    fn from(s: String) -> Self {
        SpendType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .unwrap_or(SpendType::Other)
    }
}

impl std::fmt::Display for SpendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// How a stored transaction entered the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionSource {
    #[default]
    Manual,
    PdfExtracted,
}

/// One entry of a batch classifier reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// 1-based position in the submitted batch.
    pub index: usize,

    pub category: Category,

    #[serde(rename = "type")]
    pub kind: SpendType,

    #[serde(default)]
    pub merchant: String,

    /// Classifier confidence, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(default)]
    pub note: String,
}

/// A rewritten description suggested for one batch entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionHint {
    /// 1-based position in the submitted batch.
    pub index: usize,
    pub description: String,
}

/// A parsed transaction joined with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTransaction {
    pub date: NaiveDateTime,
    pub description: String,
    pub amount: Decimal,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: SpendType,
    pub merchant: String,
    pub confidence: u8,
    pub ai_note: String,
    pub source: TransactionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_label() {
        assert_eq!(Category::from("food".to_string()), Category::Food);
        assert_eq!(Category::from(" Bills ".to_string()), Category::Bills);
        assert_eq!(Category::from("Groceries".to_string()), Category::Other);
    }

    #[test]
    fn test_classification_deserialize() {
        let json = r#"{"index": 2, "category": "Education", "type": "Need", "merchant": "Udemy", "confidence": 92, "note": "Course"}"#;
        let c: Classification = serde_json::from_str(json).unwrap();

        assert_eq!(c.index, 2);
        assert_eq!(c.category, Category::Education);
        assert_eq!(c.kind, SpendType::Need);
        assert_eq!(c.confidence, Some(92.0));
    }

    #[test]
    fn test_classification_defaults() {
        let json = r#"{"index": 1, "category": "Travel", "type": "Luxury"}"#;
        let c: Classification = serde_json::from_str(json).unwrap();

        assert_eq!(c.kind, SpendType::Other);
        assert!(c.merchant.is_empty());
        assert_eq!(c.confidence, None);
    }

    #[test]
    fn test_source_serializes_kebab_case() {
        let s = serde_json::to_string(&TransactionSource::PdfExtracted).unwrap();
        assert_eq!(s, "\"pdf-extracted\"");
    }
}
