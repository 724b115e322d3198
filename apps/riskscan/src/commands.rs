//! Subcommand handlers
//!
//! - analyze: full pipeline over many files, one JSON object per file
//! - quality: quality-gate measurements for one file
//! - catalog: the built-in rule table

use std::path::Path;
use std::sync::Arc;

use doc_extract::Extractor;
use risk_engine::catalog::ProximityWindow;
use risk_engine::{default_catalog, AnalysisConfig, NormalizeMode, QualityAssessment, RiskEngine};
use serde::Serialize;
use shared_types::{ErrorReport, MediaType, RawDocument, RiskCategory, RiskReport};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::error::CliError;
use crate::{AnalyzeArgs, QualityArgs};

/// Outcome for a single input file
#[derive(Debug, Serialize)]
pub struct FileOutcome {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<RiskReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

impl FileOutcome {
    fn from_result(file: &str, result: Result<RiskReport, CliError>) -> Self {
        match result {
            Ok(report) => Self {
                file: file.to_string(),
                report: Some(report),
                error: None,
            },
            Err(err) => Self {
                file: file.to_string(),
                report: None,
                error: Some(err.to_report()),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Quality measurements for one file
#[derive(Debug, Serialize)]
pub struct QualityOutcome {
    pub file: String,
    pub meaningful: bool,
    pub details: String,
    pub assessment: QualityAssessment,
}

/// One row of the catalog listing
#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub category: RiskCategory,
    pub window: ProximityWindow,
    pub explanation: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CatalogListing {
    pub version: String,
    pub rules: Vec<CatalogEntry>,
    pub count: usize,
}

/// Media type for a path: an explicit MIME type wins, otherwise the extension decides
pub fn resolve_media_type(path: &Path, override_mime: Option<&str>) -> MediaType {
    if let Some(mime) = override_mime {
        return MediaType::from_mime(mime);
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => MediaType::from_extension(ext),
        None => MediaType::Unsupported("application/octet-stream".to_string()),
    }
}

/// Build the analysis config: file first, then command-line flags on top
pub fn build_config(args: &AnalyzeArgs) -> Result<AnalysisConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AnalysisConfig::default(),
    };

    if args.allow_low_quality {
        config.allow_low_quality = true;
    }
    if args.paragraphs {
        config.normalize_mode = NormalizeMode::Paragraphs;
    }
    if let Some(ms) = args.timeout_ms {
        config.extraction_timeout_ms = ms;
    }

    Ok(config)
}

fn load_config(path: &Path) -> Result<AnalysisConfig, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|e| CliError::InvalidConfig {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

async fn read_document(path: &Path, override_mime: Option<&str>) -> Result<RawDocument, CliError> {
    let media_type = resolve_media_type(path, override_mime);
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CliError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
    Ok(RawDocument::new(bytes, media_type))
}

async fn analyze_file(
    engine: &RiskEngine,
    path: &Path,
    override_mime: Option<&str>,
) -> Result<RiskReport, CliError> {
    let raw = read_document(path, override_mime).await?;
    debug!(file = %path.display(), media_type = %raw.media_type(), "analyzing");
    Ok(engine.analyze_with_timeout(raw).await?)
}

/// Analyze every file as an independent task, at most `concurrency` at a time.
///
/// Outcomes come back in input order.
pub async fn analyze_files(engine: RiskEngine, args: &AnalyzeArgs) -> Vec<FileOutcome> {
    let engine = Arc::new(engine);
    let semaphore = Arc::new(Semaphore::new(args.concurrency.max(1)));
    let override_mime: Option<Arc<str>> = args.media_type.as_deref().map(Arc::from);

    let handles: Vec<_> = args
        .files
        .iter()
        .cloned()
        .map(|path| {
            let engine = Arc::clone(&engine);
            let semaphore = Arc::clone(&semaphore);
            let override_mime = override_mime.clone();
            tokio::spawn(async move {
                let display = path.display().to_string();
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => analyze_file(&engine, &path, override_mime.as_deref()).await,
                    Err(e) => Err(CliError::Internal(e.to_string())),
                };
                FileOutcome::from_result(&display, result)
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (handle, path) in handles.into_iter().zip(&args.files) {
        let display = path.display().to_string();
        let outcome = handle.await.unwrap_or_else(|e| {
            FileOutcome::from_result(&display, Err(CliError::Internal(e.to_string())))
        });
        if let Some(error) = &outcome.error {
            warn!(file = %outcome.file, code = %error.code, "analysis failed");
        }
        outcomes.push(outcome);
    }
    outcomes
}

/// Handler: riskscan analyze
pub async fn run_analyze(args: AnalyzeArgs) -> anyhow::Result<bool> {
    let config = build_config(&args)?;
    info!(
        files = args.files.len(),
        concurrency = args.concurrency,
        timeout_ms = config.extraction_timeout_ms,
        "starting analysis"
    );

    let outcomes = analyze_files(RiskEngine::new(config), &args).await;
    for outcome in &outcomes {
        println!("{}", to_json(outcome, args.pretty)?);
    }

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    info!(succeeded = outcomes.len() - failed, failed, "analysis finished");
    Ok(failed == 0)
}

/// Handler: riskscan quality
pub async fn run_quality(args: QualityArgs) -> anyhow::Result<bool> {
    let raw = read_document(&args.file, args.media_type.as_deref()).await?;
    let extracted = Extractor::new().extract(&raw).map_err(CliError::from)?;
    let engine = RiskEngine::default();
    let assessment = engine.check_quality(extracted.text());

    let outcome = QualityOutcome {
        file: args.file.display().to_string(),
        meaningful: assessment.is_meaningful(),
        details: assessment.details(),
        assessment,
    };
    println!("{}", to_json(&outcome, true)?);
    Ok(outcome.meaningful)
}

/// Handler: riskscan catalog
pub fn run_catalog() -> anyhow::Result<bool> {
    println!("{}", to_json(&catalog_listing(), true)?);
    Ok(true)
}

pub fn catalog_listing() -> CatalogListing {
    let catalog = default_catalog();
    let rules: Vec<CatalogEntry> = catalog
        .rules()
        .iter()
        .map(|rule| CatalogEntry {
            id: rule.id,
            category: rule.category,
            window: rule.signature.window,
            explanation: rule.explanation,
        })
        .collect();

    CatalogListing {
        version: catalog.version().to_string(),
        count: rules.len(),
        rules,
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
