//! Data model shared by the extraction and risk-analysis crates

pub mod types;

pub use types::{
    ErrorReport, MediaType, RawDocument, RiskCategory, RiskFinding, RiskReport, Severity,
    SeverityCounts, TextPosition, DOCX_MIME, PDF_MIME, PLAIN_TEXT_MIME,
};
