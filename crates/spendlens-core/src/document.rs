//! Statement files: pick a text source by file type and run the parser.

use std::path::Path;

use tracing::debug;

use crate::error::{Result, SpendlensError};
use crate::models::config::SpendlensConfig;
use crate::statement::{ExtractionResult, StatementParser};

/// How a statement file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    /// PDF with an embedded text layer.
    Pdf,
    /// Text already extracted from a statement.
    Text,
}

impl StatementFormat {
    /// Format from the file extension, case-insensitive.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Ok(StatementFormat::Pdf),
            "txt" | "text" => Ok(StatementFormat::Text),
            _ => Err(SpendlensError::UnsupportedFormat(extension)),
        }
    }
}

/// Extract transactions from the raw bytes of a statement file.
pub fn extract_statement<P: StatementParser + ?Sized>(
    data: &[u8],
    format: StatementFormat,
    parser: &P,
    config: &SpendlensConfig,
) -> Result<ExtractionResult> {
    match format {
        StatementFormat::Text => Ok(parser.parse_bytes(data)?),
        #[cfg(feature = "pdf")]
        StatementFormat::Pdf => {
            use crate::error::PdfError;
            use crate::pdf::{PdfExtractor, PdfProcessor};

            let mut extractor = PdfExtractor::with_config(&config.pdf);
            extractor.load(data)?;

            let content = extractor.extract_all()?;
            debug!("PDF has {} pages", content.page_count);

            if !content.has_text(config.pdf.min_text_length) {
                return Err(PdfError::NoText.into());
            }
            Ok(parser.parse(&content.text)?)
        }
        #[cfg(not(feature = "pdf"))]
        StatementFormat::Pdf => {
            let _ = config;
            debug!("PDF input rejected, built without the pdf feature");
            Err(SpendlensError::UnsupportedFormat("pdf".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::statement::AnchoredStatementParser;

    #[test]
    fn test_format_from_path() {
        assert_eq!(StatementFormat::from_path(Path::new("sep.PDF")).unwrap(), StatementFormat::Pdf);
        assert_eq!(StatementFormat::from_path(Path::new("sep.txt")).unwrap(), StatementFormat::Text);
        assert!(matches!(
            StatementFormat::from_path(Path::new("sep.docx")),
            Err(SpendlensError::UnsupportedFormat(ext)) if ext == "docx"
        ));
    }

    #[test]
    fn test_text_statement() {
        let parser = AnchoredStatementParser::new();
        let result = extract_statement(
            "01 Sep, 2025 12:38 AM Paid to Udemy UPI ₹399".as_bytes(),
            StatementFormat::Text,
            &parser,
            &SpendlensConfig::default(),
        )
        .unwrap();

        assert_eq!(result.transactions.len(), 1);
    }

    #[test]
    fn test_non_utf8_text_is_malformed() {
        let parser = AnchoredStatementParser::new();
        let err = extract_statement(&[0xff, 0xfe], StatementFormat::Text, &parser, &SpendlensConfig::default())
            .unwrap_err();

        assert!(matches!(err, SpendlensError::Extraction(ExtractionError::MalformedInput(_))));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_pdf_errors_pass_through() {
        use crate::error::PdfError;

        let parser = AnchoredStatementParser::new();
        let err = extract_statement(b"plain text", StatementFormat::Pdf, &parser, &SpendlensConfig::default())
            .unwrap_err();

        assert!(matches!(err, SpendlensError::Pdf(PdfError::Parse(_))));
    }
}
