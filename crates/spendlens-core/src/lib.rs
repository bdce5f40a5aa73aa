//! Core library for bank and wallet statement processing.
//!
//! This crate provides:
//! - PDF text extraction
//! - Statement text normalization and anchor-based segmentation
//! - Transaction field extraction (amount, direction, date)
//! - Classifier reply handling and spending summaries

pub mod classify;
pub mod document;
pub mod error;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod statement;
pub mod summary;

pub use classify::{ReplyClassifier, TransactionClassifier};
pub use document::{extract_statement, StatementFormat};
pub use error::{ClassifyError, ExtractionError, PdfError, Result, SegmentDiscard, SpendlensError};
pub use models::config::SpendlensConfig;
pub use models::transaction::{Category, ClassifiedTransaction, ParsedTransaction, SpendType};
#[cfg(feature = "pdf")]
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor};
pub use statement::{AnchoredStatementParser, ExtractionResult, StatementParser};
pub use summary::{FlowSummary, Summary};
