//! Rule-based field extractors for statement segments.

pub mod amounts;
pub mod dates;
pub mod description;
pub mod patterns;

pub use amounts::{format_amount, parse_amount, AmountExtractor, AmountToken};
pub use dates::{parse_anchor, ANCHOR_FORMAT};
pub use description::{DescriptionRule, DescriptionRules};
pub use patterns::*;
