//! Statement text to transaction extraction.
//!
//! Raw text is normalized, split into segments at timestamp anchors, and each
//! segment is turned into a transaction or discarded on its own.

mod normalize;
mod parser;
pub mod rules;
mod segment;

pub use normalize::normalize;
pub use parser::{AnchoredStatementParser, ExtractionResult, ExtractionStats, StatementParser};
pub use segment::{segments, RawSegment, Segments};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
