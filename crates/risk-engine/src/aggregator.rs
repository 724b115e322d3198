//! Risk aggregator - dedupes scanner output, assigns severity, scores density

use crate::catalog::RuleCatalog;
use crate::normalizer::NormalizedText;
use shared_types::{RiskCategory, RiskFinding, RiskReport, Severity};
use tracing::debug;

/// Severity implied by a finding's category
pub fn severity_for(category: RiskCategory) -> Severity {
    match category {
        RiskCategory::Liability
        | RiskCategory::DisputeResolution
        | RiskCategory::RestrictiveCovenant => Severity::Critical,
        RiskCategory::Termination
        | RiskCategory::Payment
        | RiskCategory::Confidentiality
        | RiskCategory::Assignment
        | RiskCategory::Amendment => Severity::Warning,
        RiskCategory::GoverningLaw | RiskCategory::Other => Severity::Info,
    }
}

/// Risk-keyword occurrences per word.
///
/// Occurrences are counted as case-insensitive substrings, overlaps included, so
/// "liquidated damages" also counts once for "damages". Text with no words scores 0.
pub fn density_score(text: &str, keywords: &[&str]) -> f64 {
    let words = text.split_whitespace().count();
    if words == 0 {
        return 0.0;
    }

    let haystack = text.to_ascii_lowercase();
    let occurrences: usize = keywords
        .iter()
        .filter(|k| !k.is_empty())
        .map(|k| count_overlapping(&haystack, &k.to_ascii_lowercase()))
        .sum();

    occurrences as f64 / words as f64
}

fn count_overlapping(haystack: &str, needle: &str) -> usize {
    let mut count = 0;
    let mut from = 0;
    while let Some(offset) = haystack.get(from..).and_then(|tail| tail.find(needle)) {
        count += 1;
        let start = from + offset;
        // Step one char past the match start so overlapping occurrences are seen
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    count
}

/// Drop findings whose span contains, or is contained in, the span of an earlier
/// finding with the same category
fn dedupe(mut findings: Vec<RiskFinding>) -> Vec<RiskFinding> {
    findings.sort_by(|a, b| {
        a.span
            .start_offset
            .cmp(&b.span.start_offset)
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });

    let mut kept: Vec<RiskFinding> = Vec::with_capacity(findings.len());
    for finding in findings {
        let duplicate = kept.iter().any(|k| {
            k.category == finding.category
                && (k.span.contains(&finding.span) || finding.span.contains(&k.span))
        });
        if duplicate {
            debug!(rule = %finding.rule_id, "dropping duplicate finding");
        } else {
            kept.push(finding);
        }
    }
    kept
}

/// Build the final report from raw scanner findings
pub fn aggregate(
    findings: Vec<RiskFinding>,
    text: &NormalizedText,
    catalog: &RuleCatalog,
) -> RiskReport {
    let findings = dedupe(findings)
        .into_iter()
        .map(|mut finding| {
            finding.severity = Some(severity_for(finding.category));
            finding
        })
        .collect();

    RiskReport {
        findings,
        density_score: density_score(text.as_str(), catalog.risk_keywords()),
        word_count: text.word_count(),
        catalog_version: catalog.version().to_string(),
        analyzed_at: chrono::Utc::now().timestamp() as u64,
    }
}
