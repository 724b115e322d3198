//! Error types for the analysis pipeline

use doc_extract::ExtractionError;
use shared_types::ErrorReport;
use thiserror::Error;

/// Terminal analysis failure; a caller gets either a full report or one of these
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Extracted text is not meaningful: {details}")]
    LowQualityText { details: String },
}

impl AnalysisError {
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::Extraction(err) => err.code(),
            AnalysisError::LowQualityText { .. } => "LOW_QUALITY_TEXT",
        }
    }

    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_errors_keep_their_code() {
        let err: AnalysisError = ExtractionError::Cancelled(250).into();
        assert_eq!(err.code(), "CANCELLED");
        assert_eq!(err.to_string(), "Extraction cancelled after 250ms");
    }

    #[test]
    fn test_low_quality_report() {
        let err = AnalysisError::LowQualityText {
            details: "only 12 characters (minimum 50)".to_string(),
        };
        let report = err.to_report();
        assert_eq!(report.code, "LOW_QUALITY_TEXT");
        assert!(report.message.contains("only 12 characters"));
    }
}
