//! Contract risk analysis
//!
//! Pipeline: extraction (doc-extract) -> quality gate -> normalizer -> clause scanner
//! -> aggregator. Every stage after extraction is pure in-memory text work; the rule
//! catalog is shared read-only behind an `Arc`, so one [`RiskEngine`] can serve any
//! number of concurrent analyses.

pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod quality;
pub mod scanner;

pub use aggregator::{aggregate, density_score, severity_for};
pub use catalog::{default_catalog, shared_default_catalog, RiskRule, RuleCatalog};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use normalizer::{normalize, NormalizeMode, NormalizedText};
pub use quality::{assess_quality, is_meaningful, QualityAssessment, QualityIssue};
pub use scanner::scan;

use std::sync::Arc;

use doc_extract::{ExtractedText, Extractor};
use shared_types::{MediaType, RawDocument, RiskReport};
use tracing::{debug, warn};

/// RiskEngine entry point
#[derive(Clone)]
pub struct RiskEngine {
    config: AnalysisConfig,
    extractor: Extractor,
    catalog: Arc<RuleCatalog>,
}

impl RiskEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            extractor: Extractor::new(),
            catalog: shared_default_catalog(),
        }
    }

    /// Use a different rule catalog
    pub fn with_catalog(mut self, catalog: impl Into<Arc<RuleCatalog>>) -> Self {
        let catalog = catalog.into();
        for issue in catalog.validate() {
            warn!(version = catalog.version(), ?issue, "rule catalog issue");
        }
        self.catalog = catalog;
        self
    }

    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Run the full pipeline on a raw document
    pub fn analyze(&self, raw: &RawDocument) -> Result<RiskReport, AnalysisError> {
        let extracted = self.extractor.extract(raw)?;
        self.analyze_extracted(&extracted)
    }

    /// Same as [`analyze`](Self::analyze), but extraction runs on the blocking pool and
    /// is abandoned once the configured timeout elapses
    pub async fn analyze_with_timeout(&self, raw: RawDocument) -> Result<RiskReport, AnalysisError> {
        let extracted = self
            .extractor
            .extract_with_timeout(raw, self.config.extraction_timeout())
            .await?;
        self.analyze_extracted(&extracted)
    }

    /// Analyze text that was already extracted elsewhere
    pub fn analyze_text(&self, text: &str) -> Result<RiskReport, AnalysisError> {
        let extracted = ExtractedText::new(text.to_string(), MediaType::PlainText);
        self.analyze_extracted(&extracted)
    }

    pub fn check_quality(&self, text: &str) -> QualityAssessment {
        assess_quality(text)
    }

    fn analyze_extracted(&self, extracted: &ExtractedText) -> Result<RiskReport, AnalysisError> {
        self.quality_gate(extracted.text())?;

        let normalized = normalize(extracted.text(), extracted.source(), self.config.normalize_mode);
        debug!(
            source = %extracted.source(),
            bytes = normalized.len(),
            "normalized text"
        );

        let findings = scan(&normalized, &self.catalog);
        let report = aggregate(findings, &normalized, &self.catalog);
        debug!(
            findings = report.findings.len(),
            density = report.density_score,
            "analysis complete"
        );
        Ok(report)
    }

    fn quality_gate(&self, text: &str) -> Result<(), AnalysisError> {
        let assessment = assess_quality(text);
        if assessment.is_meaningful() {
            return Ok(());
        }

        if self.config.allow_low_quality {
            warn!(details = %assessment.details(), "analyzing low-quality text");
            Ok(())
        } else {
            Err(AnalysisError::LowQualityText {
                details: assessment.details(),
            })
        }
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}
