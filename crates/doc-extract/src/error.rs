use shared_types::ErrorReport;
use thiserror::Error;

/// Terminal extraction failures. None of them are worth retrying: a scanned or
/// corrupted document will fail the same way every time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Document yielded only {chars} characters of text; it is likely a scanned image or corrupted")]
    EmptyOrImageBasedDocument { chars: usize },

    #[error("Extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("Extraction cancelled after {0}ms")]
    Cancelled(u64),
}

impl ExtractionError {
    /// Machine-readable tag
    pub fn code(&self) -> &'static str {
        match self {
            ExtractionError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            ExtractionError::EmptyOrImageBasedDocument { .. } => "EMPTY_OR_IMAGE_BASED_DOCUMENT",
            ExtractionError::ExtractionFailure(_) => "EXTRACTION_FAILURE",
            ExtractionError::Cancelled(_) => "CANCELLED",
        }
    }

    pub fn is_retryable(&self) -> bool {
        false
    }

    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}
