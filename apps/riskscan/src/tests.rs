//! Tests for the riskscan CLI
//!
//! Argument parsing, config layering, media type resolution and the per-file output
//! contract, plus property tests over the resolution rules.

use std::path::{Path, PathBuf};

use clap::Parser;
use pretty_assertions::assert_eq;
use risk_engine::{AnalysisConfig, NormalizeMode, RiskEngine};
use shared_types::MediaType;
use tempfile::TempDir;

use crate::commands::{analyze_files, build_config, catalog_listing, resolve_media_type};
use crate::{AnalyzeArgs, Cli, Command};

const INDEMNITY: &str = "The Contractor shall indemnify and hold harmless the Client from all liability and damages arising under this Agreement.";

/// Scratch directory, removed when the returned guard drops
fn scratch_dir() -> TempDir {
    tempfile::Builder::new().prefix("riskscan-").tempdir().unwrap()
}

/// Write a file into a scratch directory and return its path
fn scratch_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn analyze_args(files: Vec<PathBuf>) -> AnalyzeArgs {
    AnalyzeArgs {
        files,
        media_type: None,
        allow_low_quality: false,
        paragraphs: false,
        timeout_ms: None,
        concurrency: 2,
        config: None,
        pretty: false,
    }
}

// ============================================================================
// Argument parsing
// ============================================================================

#[test]
fn test_parse_analyze_args() {
    let cli = Cli::try_parse_from([
        "riskscan",
        "analyze",
        "lease.pdf",
        "nda.docx",
        "--paragraphs",
        "--timeout-ms",
        "500",
        "--concurrency",
        "8",
        "-v",
    ])
    .unwrap();

    assert!(cli.verbose);
    match cli.command {
        Command::Analyze(args) => {
            assert_eq!(
                args.files,
                vec![PathBuf::from("lease.pdf"), PathBuf::from("nda.docx")]
            );
            assert!(args.paragraphs);
            assert_eq!(args.timeout_ms, Some(500));
            assert_eq!(args.concurrency, 8);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_analyze_requires_files() {
    assert!(Cli::try_parse_from(["riskscan", "analyze"]).is_err());
}

#[test]
fn test_parse_catalog() {
    let cli = Cli::try_parse_from(["riskscan", "catalog"]).unwrap();
    assert!(matches!(cli.command, Command::Catalog));
}

// ============================================================================
// Config layering
// ============================================================================

#[test]
fn test_flags_override_defaults() {
    let mut args = analyze_args(vec![]);
    args.allow_low_quality = true;
    args.paragraphs = true;
    args.timeout_ms = Some(1200);

    let config = build_config(&args).unwrap();
    assert_eq!(
        config,
        AnalysisConfig {
            normalize_mode: NormalizeMode::Paragraphs,
            allow_low_quality: true,
            extraction_timeout_ms: 1200,
        }
    );
}

#[test]
fn test_flags_override_config_file() {
    let dir = scratch_dir();
    let path = scratch_file(
        &dir,
        "config.json",
        br#"{"normalize_mode": "paragraphs", "extraction_timeout_ms": 9000}"#,
    );
    let mut args = analyze_args(vec![]);
    args.config = Some(path);
    args.timeout_ms = Some(100);

    let config = build_config(&args).unwrap();
    assert_eq!(config.normalize_mode, NormalizeMode::Paragraphs);
    assert_eq!(config.extraction_timeout_ms, 100);
    assert!(!config.allow_low_quality);
}

#[test]
fn test_invalid_config_file() {
    let dir = scratch_dir();
    let path = scratch_file(&dir, "config.json", b"{ not json");
    let mut args = analyze_args(vec![]);
    args.config = Some(path);

    let err = build_config(&args).unwrap_err();
    assert_eq!(err.code(), "INVALID_CONFIG");
}

// ============================================================================
// Media types
// ============================================================================

#[test]
fn test_media_type_from_extension() {
    assert_eq!(resolve_media_type(Path::new("a/lease.PDF"), None), MediaType::Pdf);
    assert_eq!(resolve_media_type(Path::new("nda.docx"), None), MediaType::Docx);
    assert_eq!(resolve_media_type(Path::new("terms.txt"), None), MediaType::PlainText);
    assert!(!resolve_media_type(Path::new("scan.png"), None).is_supported());
    assert!(!resolve_media_type(Path::new("README"), None).is_supported());
}

#[test]
fn test_explicit_media_type_wins() {
    assert_eq!(
        resolve_media_type(Path::new("upload.bin"), Some("application/pdf")),
        MediaType::Pdf
    );
}

// ============================================================================
// Analysis output
// ============================================================================

#[tokio::test]
async fn test_outcomes_keep_input_order() {
    let dir = scratch_dir();
    let good = scratch_file(&dir, "contract.txt", INDEMNITY.as_bytes());
    let short = scratch_file(&dir, "note.txt", b"Pay on time.");
    let image = scratch_file(&dir, "scan.png", b"\x89PNG\r\n\x1a\n");
    let missing = good.with_file_name("missing.txt");

    let args = analyze_args(vec![good, short, image, missing]);
    let outcomes = analyze_files(RiskEngine::default(), &args).await;

    let codes: Vec<_> = outcomes
        .iter()
        .map(|o| o.error.as_ref().map(|e| e.code.as_str()))
        .collect();
    assert_eq!(
        codes,
        vec![
            None,
            Some("LOW_QUALITY_TEXT"),
            Some("UNSUPPORTED_FORMAT"),
            Some("READ_FAILED"),
        ]
    );
    assert!(outcomes[0].file.ends_with("contract.txt"));
    assert_eq!(outcomes[0].report.as_ref().unwrap().findings.len(), 1);
}

#[test]
fn test_scratch_dir_is_removed_on_drop() {
    let dir = scratch_dir();
    let path = scratch_file(&dir, "contract.txt", INDEMNITY.as_bytes());
    let root = dir.path().to_path_buf();
    assert!(path.exists());

    drop(dir);
    assert!(!root.exists());
}

#[tokio::test]
async fn test_outcome_json_shape() {
    let dir = scratch_dir();
    let path = scratch_file(&dir, "contract.txt", INDEMNITY.as_bytes());
    let outcomes = analyze_files(RiskEngine::default(), &analyze_args(vec![path])).await;

    let json = serde_json::to_value(&outcomes[0]).unwrap();
    assert!(json.get("error").is_none());
    let finding = &json["report"]["findings"][0];
    assert_eq!(finding["category"], "liability");
    assert_eq!(finding["severity"], "Critical");
    assert!(finding["span"]["start_offset"].is_u64());
}

#[test]
fn test_catalog_listing() {
    let listing = catalog_listing();
    assert_eq!(listing.count, listing.rules.len());
    assert!(listing.rules.iter().any(|r| r.id == "indemnification"));
}

// ============================================================================
// Property tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Unknown extensions never resolve to a supported type
        #[test]
        fn unknown_extensions_are_unsupported(ext in "[a-z]{1,5}".prop_filter(
            "known extension",
            |e| !matches!(e.as_str(), "pdf" | "docx" | "txt" | "text" | "md")
        )) {
            let path = PathBuf::from(format!("upload.{}", ext));
            prop_assert!(!resolve_media_type(&path, None).is_supported());
        }

        /// Extension case does not matter
        #[test]
        fn extension_case_is_ignored(upper in proptest::bool::ANY) {
            let name = if upper { "LEASE.PDF" } else { "lease.pdf" };
            prop_assert_eq!(resolve_media_type(Path::new(name), None), MediaType::Pdf);
        }

        /// A MIME override applies regardless of the file name
        #[test]
        fn mime_override_ignores_name(name in "[a-z]{1,8}\\.[a-z]{1,4}") {
            prop_assert_eq!(
                resolve_media_type(Path::new(&name), Some("text/plain; charset=utf-8")),
                MediaType::PlainText
            );
        }

        /// Concurrency flag accepts any positive value
        #[test]
        fn concurrency_parses(n in 1usize..64) {
            let n_str = n.to_string();
            let cli = Cli::try_parse_from(["riskscan", "analyze", "a.txt", "--concurrency", &n_str]);
            prop_assert!(cli.is_ok());
        }
    }
}
