use serde::{Deserialize, Serialize};
use std::fmt;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PLAIN_TEXT_MIME: &str = "text/plain";

/// Declared media type of an ingested document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaType {
    Pdf,
    Docx,
    PlainText,
    /// Anything else; keeps the caller's original string for error reporting
    Unsupported(String),
}

impl MediaType {
    /// Parse a MIME type string. Parameters (`; charset=utf-8`) and case are ignored.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            PDF_MIME => MediaType::Pdf,
            DOCX_MIME => MediaType::Docx,
            PLAIN_TEXT_MIME => MediaType::PlainText,
            _ => MediaType::Unsupported(mime.to_string()),
        }
    }

    /// Guess a media type from a file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => MediaType::Pdf,
            "docx" => MediaType::Docx,
            "txt" | "text" | "md" => MediaType::PlainText,
            other => MediaType::Unsupported(other.to_string()),
        }
    }

    pub fn as_mime(&self) -> &str {
        match self {
            MediaType::Pdf => PDF_MIME,
            MediaType::Docx => DOCX_MIME,
            MediaType::PlainText => PLAIN_TEXT_MIME,
            MediaType::Unsupported(original) => original,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, MediaType::Unsupported(_))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// Raw document bytes as handed over by the caller. Immutable once created.
#[derive(Debug, Clone)]
pub struct RawDocument {
    bytes: Vec<u8>,
    media_type: MediaType,
}

impl RawDocument {
    pub fn new(bytes: impl Into<Vec<u8>>, media_type: MediaType) -> Self {
        Self {
            bytes: bytes.into(),
            media_type,
        }
    }

    pub fn from_mime(bytes: impl Into<Vec<u8>>, mime: &str) -> Self {
        Self::new(bytes, MediaType::from_mime(mime))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }
}

/// Closed set of clause categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskCategory {
    Liability,
    Confidentiality,
    Termination,
    DisputeResolution,
    RestrictiveCovenant,
    Payment,
    GoverningLaw,
    Assignment,
    Amendment,
    Other,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 10] = [
        RiskCategory::Liability,
        RiskCategory::Confidentiality,
        RiskCategory::Termination,
        RiskCategory::DisputeResolution,
        RiskCategory::RestrictiveCovenant,
        RiskCategory::Payment,
        RiskCategory::GoverningLaw,
        RiskCategory::Assignment,
        RiskCategory::Amendment,
        RiskCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Liability => "liability",
            RiskCategory::Confidentiality => "confidentiality",
            RiskCategory::Termination => "termination",
            RiskCategory::DisputeResolution => "dispute-resolution",
            RiskCategory::RestrictiveCovenant => "restrictive-covenant",
            RiskCategory::Payment => "payment",
            RiskCategory::GoverningLaw => "governing-law",
            RiskCategory::Assignment => "assignment",
            RiskCategory::Amendment => "amendment",
            RiskCategory::Other => "other",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// Higher is more severe
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 2,
            Severity::Warning => 1,
            Severity::Info => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextPosition {
    pub start_offset: usize, // Byte offset into the normalized text
    pub end_offset: usize,   // Exclusive end
}

impl TextPosition {
    pub fn new(start_offset: usize, end_offset: usize) -> Self {
        Self {
            start_offset,
            end_offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end_offset.saturating_sub(self.start_offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `other` lies entirely within this span
    pub fn contains(&self, other: &TextPosition) -> bool {
        self.start_offset <= other.start_offset && other.end_offset <= self.end_offset
    }

    pub fn overlaps(&self, other: &TextPosition) -> bool {
        self.start_offset < other.end_offset && other.start_offset < self.end_offset
    }
}

/// A clause matched by one catalog rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFinding {
    pub rule_id: String,
    pub category: RiskCategory,
    pub span: TextPosition,
    pub explanation: String,
    /// Assigned during aggregation; scanner output leaves it unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Ordered by span start, ties broken by rule id
    pub findings: Vec<RiskFinding>,
    pub density_score: f64,
    pub word_count: usize,
    pub catalog_version: String,
    pub analyzed_at: u64,
}

impl RiskReport {
    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for severity in self.findings.iter().filter_map(|f| f.severity) {
            match severity {
                Severity::Critical => counts.critical += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Info => counts.info += 1,
            }
        }
        counts
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.findings
            .iter()
            .filter_map(|f| f.severity)
            .max_by_key(|s| s.rank())
    }

    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
}

/// Error body handed back across process boundaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: String,
    pub message: String,
}
