//! Data models and configuration.

pub mod config;
pub mod transaction;

pub use config::{ClassificationConfig, DescriptionRuleConfig, ExtractionConfig, PdfConfig, SpendlensConfig};
pub use transaction::{
    Category, Classification, ClassifiedTransaction, DescriptionHint, ParsedTransaction, SpendType,
    TransactionSource,
};
