//! Error types for the riskscan CLI

use risk_engine::AnalysisError;
use shared_types::ErrorReport;
use thiserror::Error;

/// Per-file failures; each one is reported in the output stream, not raised
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Cannot read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    InvalidConfig { path: String, message: String },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    pub fn code(&self) -> &'static str {
        match self {
            CliError::ReadFile { .. } => "READ_FAILED",
            CliError::InvalidConfig { .. } => "INVALID_CONFIG",
            CliError::Analysis(err) => err.code(),
            CliError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

impl From<doc_extract::ExtractionError> for CliError {
    fn from(err: doc_extract::ExtractionError) -> Self {
        CliError::Analysis(AnalysisError::Extraction(err))
    }
}
