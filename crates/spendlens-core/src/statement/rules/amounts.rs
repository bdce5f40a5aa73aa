//! Currency amount extraction for statement segments.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::AMOUNT_DIGITS;

const DEFAULT_SYMBOLS: [&str; 4] = ["₹", "Rs.", "Rs", "INR"];

/// A currency-prefixed numeric token as it appears in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountToken<'a> {
    /// Digits and separators, without the currency symbol.
    pub digits: &'a str,
    /// A minus sign touched the symbol (`-₹5`) or the digits (`₹-5`).
    pub negative: bool,
    pub start: usize,
    pub end: usize,
}

impl AmountToken<'_> {
    /// Signed value of the token, `None` if the digits don't form a number.
    pub fn value(&self) -> Option<Decimal> {
        let v = parse_amount(self.digits)?;
        Some(if self.negative { -v } else { v })
    }
}

/// Finds currency-prefixed amounts in segment text.
pub struct AmountExtractor {
    pattern: Regex,
}

impl AmountExtractor {
    /// Extractor for the default symbols (₹, Rs., Rs, INR).
    pub fn new() -> Self {
        let symbols: Vec<String> = DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect();
        Self::with_symbols(&symbols).expect("default currency symbols compile")
    }

    /// Extractor for a custom set of currency symbols.
    pub fn with_symbols(symbols: &[String]) -> Result<Self, regex::Error> {
        let mut symbols: Vec<&str> = symbols
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        // Leftmost-first alternation: "Rs." must be tried before "Rs"
        symbols.sort_by(|a, b| b.len().cmp(&a.len()));
        symbols.dedup();

        let alternatives = symbols
            .iter()
            .map(|s| {
                let escaped = regex::escape(s);
                if s.starts_with(|c: char| c.is_alphanumeric()) {
                    format!(r"\b{}", escaped)
                } else {
                    escaped
                }
            })
            .collect::<Vec<_>>()
            .join("|");

        // A detached dash ("Ref 5610 - ₹399") is a column separator, not a sign.
        let pattern = Regex::new(&format!(
            r"(?P<sign>-)?(?:{})\s?(?P<inner>-)?(?P<digits>{})",
            alternatives, AMOUNT_DIGITS
        ))?;

        Ok(Self { pattern })
    }

    /// First currency token in `text`, left to right.
    pub fn find_token<'a>(&self, text: &'a str) -> Option<AmountToken<'a>> {
        self.tokens(text).next()
    }

    /// Every currency token in `text`, left to right.
    pub fn tokens<'a>(&self, text: &'a str) -> impl Iterator<Item = AmountToken<'a>> {
        self.pattern.captures_iter(text).filter_map(|caps| {
            let full = caps.get(0)?;
            let digits = caps.name("digits")?.as_str();
            Some(AmountToken {
                digits,
                negative: caps.name("sign").is_some() || caps.name("inner").is_some(),
                start: full.start(),
                end: full.end(),
            })
        })
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a numeric token, dropping thousands separators ("12,34,567.89").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

/// Format an amount with comma thousands separators and two decimals.
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    if amount.is_sign_negative() && !amount.is_zero() {
        formatted.push('-');
    }
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    format!("{}.{}", formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount_strips_separators() {
        assert_eq!(parse_amount("12,34,567.89"), Some(dec("1234567.89")));
        assert_eq!(parse_amount("1,500.00"), Some(dec("1500")));
        assert_eq!(parse_amount("399"), Some(dec("399")));
        assert_eq!(parse_amount(","), None);
    }

    #[test]
    fn test_extract_rupee_amount() {
        let extractor = AmountExtractor::new();
        let text = "Paid by Canara Bank 3900 ₹399";

        let token = extractor.find_token(text).unwrap();
        assert_eq!(token.value(), Some(dec("399")));
        assert_eq!(&text[token.start..token.end], "₹399");
    }

    #[test]
    fn test_separator_tolerance() {
        let extractor = AmountExtractor::new();

        let token = extractor.find_token("credited ₹12,34,567.89 today").unwrap();
        assert_eq!(token.value(), Some(dec("1234567.89")));
    }

    #[test]
    fn test_bare_numbers_are_not_amounts() {
        let extractor = AmountExtractor::new();

        assert!(extractor.find_token("UPI Transaction ID: 561019228392").is_none());
    }

    #[test]
    fn test_negative_sign_detected() {
        let extractor = AmountExtractor::new();

        let token = extractor.find_token("refund -₹250.50").unwrap();
        assert!(token.negative);
        assert_eq!(token.value(), Some(dec("-250.50")));

        let token = extractor.find_token("₹-75").unwrap();
        assert!(token.negative);
    }

    #[test]
    fn test_detached_dash_is_not_a_sign() {
        let extractor = AmountExtractor::new();

        let token = extractor.find_token("UPI Ref 5610 - ₹399").unwrap();
        assert!(!token.negative);
        assert_eq!(token.value(), Some(dec("399")));
    }

    #[test]
    fn test_word_symbols() {
        let extractor = AmountExtractor::new();

        assert_eq!(extractor.find_token("Rs. 1,200").unwrap().value(), Some(dec("1200")));
        assert_eq!(extractor.find_token("INR 45.5").unwrap().value(), Some(dec("45.5")));
        // "Rs" inside a word is not a symbol
        assert!(extractor.find_token("Hrs 40").is_none());
    }

    #[test]
    fn test_custom_symbols() {
        let extractor = AmountExtractor::with_symbols(&["$".to_string()]).unwrap();

        assert_eq!(extractor.find_token("total $19.99").unwrap().value(), Some(dec("19.99")));
        assert!(extractor.find_token("₹19").is_none());
    }

    #[test]
    fn test_tokens_in_order() {
        let extractor = AmountExtractor::new();
        let values: Vec<Decimal> = extractor
            .tokens("₹10 then ₹2,000 then Rs 3")
            .filter_map(|t| t.value())
            .collect();

        assert_eq!(values, vec![dec("10"), dec("2000"), dec("3")]);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec("1234567.89")), "1,234,567.89");
        assert_eq!(format_amount(dec("399")), "399.00");
        assert_eq!(format_amount(dec("-1500")), "-1,500.00");
    }
}
