//! Error types for the spendlens-core library.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the spendlens library.
#[derive(Error, Debug)]
pub enum SpendlensError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Statement extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be read or written.
    #[error("configuration error: {0}")]
    Config(String),

    /// The statement file type is not handled.
    #[error("unsupported statement format: {0}")]
    UnsupportedFormat(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The PDF has no usable text layer (scanned image, empty pages).
    #[error("no text could be extracted from the PDF")]
    NoText,

    /// The file exceeds the configured size limit.
    #[error("PDF is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },
}

/// Errors related to statement extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Input could not be read as statement text.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The statement contained no recognizable transactions.
    #[error("no transactions found")]
    NoTransactions,

    /// Field validation failed.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },
}

/// Reason a single segment was dropped from the output.
///
/// Never surfaced to callers as an error; the pipeline logs it and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentDiscard {
    #[error("no currency amount in segment")]
    MissingAmount,

    #[error("amount is negative")]
    NegativeAmount,

    #[error("amount {amount} outside accepted range")]
    AmountOutOfRange { amount: Decimal },

    #[error("unparseable amount: {value}")]
    InvalidAmount { value: String },

    #[error("unparseable date: {anchor}")]
    InvalidDate { anchor: String },
}

/// Errors related to classifier replies.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The reply held no JSON array.
    #[error("no JSON array in classifier reply")]
    NoJson,

    /// The JSON array did not deserialize.
    #[error("invalid classifier JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The classifier backend failed.
    #[error("classifier failed: {0}")]
    Backend(String),
}

/// Result type for the spendlens library.
pub type Result<T> = std::result::Result<T, SpendlensError>;
