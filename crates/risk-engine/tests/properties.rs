//! Property-based tests for the analysis stages
//!
//! Generated text mixes risk vocabulary with filler so that rules actually fire.

use proptest::prelude::*;
use risk_engine::{
    aggregate, default_catalog, density_score, is_meaningful, normalize, scan, NormalizeMode,
};
use shared_types::MediaType;
use std::collections::HashMap;

// ============================================================================
// Strategies
// ============================================================================

fn media_type() -> impl Strategy<Value = MediaType> {
    prop_oneof![
        Just(MediaType::Pdf),
        Just(MediaType::Docx),
        Just(MediaType::PlainText),
    ]
}

fn normalize_mode() -> impl Strategy<Value = NormalizeMode> {
    prop_oneof![Just(NormalizeMode::Flat), Just(NormalizeMode::Paragraphs)]
}

/// Risk vocabulary and page artifacts the normalizer and catalog care about
const VOCABULARY: &[&str] = &[
    "indemnify",
    "Hold Harmless",
    "liability",
    "damages",
    "terminate",
    "at any time",
    "arbitration",
    "final",
    "waive",
    "jury",
    "Page 2 of 9",
    "\n",
    "\n\n\n",
    "  \t ",
    "17",
    "é",
];

/// Tokens that exercise the normalizer and the catalog together
fn contract_token() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(VOCABULARY).prop_map(str::to_string),
        "[a-zA-Z]{1,12}",
        "[ -~]{0,6}",
    ]
}

fn contract_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(contract_token(), 0..60).prop_map(|tokens| tokens.join(" "))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Normalizing twice is the same as normalizing once
    #[test]
    fn normalization_is_idempotent(
        text in contract_text(),
        source in media_type(),
        mode in normalize_mode(),
    ) {
        let once = normalize(&text, &source, mode);
        let twice = normalize(once.as_str(), &source, mode);
        prop_assert_eq!(once, twice);
    }

    /// Arbitrary unicode input is idempotent too
    #[test]
    fn normalization_is_idempotent_on_any_text(text in "\\PC{0,200}", mode in normalize_mode()) {
        let once = normalize(&text, &MediaType::PlainText, mode);
        let twice = normalize(once.as_str(), &MediaType::PlainText, mode);
        prop_assert_eq!(once, twice);
    }

    /// Normalized text never keeps three line breaks in a row or doubled spaces
    #[test]
    fn normalized_text_has_no_whitespace_runs(
        text in contract_text(),
        source in media_type(),
        mode in normalize_mode(),
    ) {
        let normalized = normalize(&text, &source, mode);
        prop_assert!(!normalized.as_str().contains("\n\n\n"));
        prop_assert!(!normalized.as_str().contains("  "));
    }

    /// Nothing under 50 characters passes the quality gate
    #[test]
    fn short_text_is_never_meaningful(text in "\\PC{0,49}") {
        prop_assume!(text.chars().count() < 50);
        prop_assert!(!is_meaningful(&text));
    }

    /// Text without any trigger terms yields no findings and no panic
    #[test]
    fn scanner_is_total_on_filler(words in proptest::collection::vec("[xyzq]{1,8}", 0..80)) {
        let normalized = normalize(&words.join(" "), &MediaType::PlainText, NormalizeMode::Flat);
        prop_assert!(scan(&normalized, default_catalog()).is_empty());
    }

    /// Findings of one rule never overlap and every span is in bounds
    #[test]
    fn findings_of_one_rule_do_not_overlap(text in contract_text(), source in media_type()) {
        let normalized = normalize(&text, &source, NormalizeMode::Flat);
        let findings = scan(&normalized, default_catalog());

        let mut by_rule: HashMap<&str, Vec<_>> = HashMap::new();
        for finding in &findings {
            prop_assert!(finding.span.start_offset < finding.span.end_offset);
            prop_assert!(normalized
                .slice(finding.span.start_offset, finding.span.end_offset)
                .is_some());
            by_rule.entry(finding.rule_id.as_str()).or_default().push(finding.span);
        }

        for spans in by_rule.values() {
            for (i, a) in spans.iter().enumerate() {
                for b in &spans[i + 1..] {
                    prop_assert!(a.end_offset <= b.start_offset || b.end_offset <= a.start_offset);
                }
            }
        }
    }

    /// Reports are ordered by span start, ties by rule id
    #[test]
    fn report_findings_are_ordered(text in contract_text(), mode in normalize_mode()) {
        let normalized = normalize(&text, &MediaType::PlainText, mode);
        let report = aggregate(scan(&normalized, default_catalog()), &normalized, default_catalog());

        for pair in report.findings.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(
                a.span.start_offset < b.span.start_offset
                    || (a.span.start_offset == b.span.start_offset && a.rule_id <= b.rule_id)
            );
        }
    }

    /// Density is finite and non-negative whenever there are words
    #[test]
    fn density_is_bounded(text in contract_text()) {
        let normalized = normalize(&text, &MediaType::PlainText, NormalizeMode::Flat);
        let density = density_score(normalized.as_str(), default_catalog().risk_keywords());
        prop_assert!(density >= 0.0);
        prop_assert!(density.is_finite());
        if normalized.word_count() == 0 {
            prop_assert_eq!(density, 0.0);
        }
    }
}
