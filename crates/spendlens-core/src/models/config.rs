//! Configuration structures for the extraction pipeline.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpendlensError};

/// Main configuration for the spendlens pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpendlensConfig {
    /// Statement extraction configuration.
    pub extraction: ExtractionConfig,

    /// Classifier reply handling configuration.
    pub classification: ClassificationConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,
}

/// Statement extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Amounts must be strictly greater than this.
    pub min_amount: Decimal,

    /// Amounts must not exceed this.
    pub max_amount: Decimal,

    /// Symbols that may prefix an amount token.
    pub currency_symbols: Vec<String>,

    /// Transfer-rail keywords that terminate a counterparty name.
    pub transfer_rails: Vec<String>,

    /// Directional description rules, tried in order.
    pub description_rules: Vec<DescriptionRuleConfig>,

    /// Description used when no rule matches.
    pub default_description: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_amount: Decimal::ZERO,
            max_amount: Decimal::from(10_000_000),
            currency_symbols: vec![
                "₹".to_string(),
                "Rs.".to_string(),
                "Rs".to_string(),
                "INR".to_string(),
            ],
            transfer_rails: vec!["UPI".to_string(), "NEFT".to_string(), "IMPS".to_string()],
            description_rules: vec![
                DescriptionRuleConfig::new("Paid to", "Paid to"),
                DescriptionRuleConfig::new("Received from", "Received from"),
            ],
            default_description: "Transaction".to_string(),
        }
    }
}

/// A keyword that introduces a counterparty, and the label written before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionRuleConfig {
    /// Phrase searched for in the segment (case-insensitive).
    pub keyword: String,

    /// Prefix of the resulting description.
    pub label: String,
}

impl DescriptionRuleConfig {
    pub fn new(keyword: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            label: label.into(),
        }
    }
}

/// Classifier reply handling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Confidence stored for imported records when the classifier omits it.
    pub default_confidence: u8,

    /// Confidence stored for manually entered records.
    pub manual_confidence: u8,

    /// Descriptions suggested by the classifier longer than this are ignored.
    pub max_description_len: usize,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            default_confidence: 100,
            manual_confidence: 50,
            max_description_len: 100,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Largest accepted file, in bytes.
    pub max_file_size: usize,

    /// Minimum text length to consider the PDF readable.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            min_text_length: 1,
        }
    }
}

impl SpendlensConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| SpendlensError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| SpendlensError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check thresholds for obvious mistakes.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let ex = &self.extraction;

        if ex.min_amount < Decimal::ZERO {
            issues.push("extraction.min_amount must not be negative".to_string());
        }
        if ex.max_amount <= ex.min_amount {
            issues.push("extraction.max_amount must exceed min_amount".to_string());
        }
        if ex.currency_symbols.iter().all(|s| s.trim().is_empty()) {
            issues.push("extraction.currency_symbols is empty".to_string());
        }
        if ex.description_rules.iter().any(|r| r.keyword.trim().is_empty()) {
            issues.push("extraction.description_rules has an empty keyword".to_string());
        }
        if self.classification.default_confidence > 100 || self.classification.manual_confidence > 100 {
            issues.push("classification confidence must be 0-100".to_string());
        }

        issues
    }
}
