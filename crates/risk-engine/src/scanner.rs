//! Clause scanner
//!
//! Bounded-window ordered substring search: for every rule, find a group-A term,
//! then look forward for a group-B term whose start falls inside the rule's window.
//! Matching is ASCII case-insensitive and ignores word boundaries.
//!
//! Each rule is scanned in time linear in the text: group-A occurrences are cached
//! per term and only searched again once the cursor moves past them, and group-B
//! searches only look at the bytes a window can reach.

use crate::catalog::{ProximityPattern, RiskRule, RuleCatalog};
use crate::normalizer::NormalizedText;
use shared_types::{RiskFinding, TextPosition};
use tracing::trace;

/// A single term occurrence, in byte offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TermMatch {
    start: usize,
    end: usize,
}

/// Apply every catalog rule to the text.
///
/// Findings come back sorted by span start, ties broken by rule id. A rule may
/// match several times, but each new match starts at or after the end of the
/// previous one, so findings of one rule never overlap.
pub fn scan(text: &NormalizedText, catalog: &RuleCatalog) -> Vec<RiskFinding> {
    let original = text.as_str();
    // ASCII lowering keeps every byte offset valid for the original text
    let haystack = original.to_ascii_lowercase();

    let mut findings: Vec<RiskFinding> = catalog
        .rules()
        .iter()
        .flat_map(|rule| scan_rule(original, &haystack, rule))
        .collect();

    findings.sort_by(|a, b| {
        a.span
            .start_offset
            .cmp(&b.span.start_offset)
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });
    findings
}

/// Lowercase a term group the same way the haystack is lowered, dropping empty terms
fn lowered_terms(terms: &[&str]) -> Vec<String> {
    terms
        .iter()
        .filter(|term| !term.is_empty())
        .map(|term| term.to_ascii_lowercase())
        .collect()
}

fn scan_rule(original: &str, haystack: &str, rule: &RiskRule) -> Vec<RiskFinding> {
    let group_b = lowered_terms(rule.signature.group_b);
    let mut triggers = TriggerCursor::new(lowered_terms(rule.signature.group_a));
    let mut findings = Vec::new();
    let mut cursor = 0;

    while let Some(trigger) = triggers.next_from(haystack, cursor) {
        match window_match(haystack, &rule.signature, &group_b, trigger) {
            Some(target) => {
                trace!(rule = rule.id, start = trigger.start, end = target.end, "rule matched");
                findings.push(RiskFinding {
                    rule_id: rule.id.to_string(),
                    category: rule.category,
                    span: TextPosition::new(trigger.start, target.end),
                    explanation: rule.render_explanation(&original[trigger.start..trigger.end]),
                    severity: None,
                });
                cursor = target.end;
            }
            None => cursor = next_char_boundary(haystack, trigger.start),
        }
    }

    findings
}

/// Group-A terms with the next known occurrence of each.
///
/// The scan cursor only moves forward, so a cached occurrence at or after the
/// cursor is still the earliest one for its term. A term with no occurrence left
/// is never searched again.
struct TriggerCursor {
    terms: Vec<String>,
    next: Vec<Option<TermMatch>>,
    searched_from: Vec<Option<usize>>,
}

impl TriggerCursor {
    fn new(terms: Vec<String>) -> Self {
        let count = terms.len();
        Self {
            terms,
            next: vec![None; count],
            searched_from: vec![None; count],
        }
    }

    /// Earliest group-A occurrence starting at or after `from`; on a tie the longer
    /// term wins
    fn next_from(&mut self, haystack: &str, from: usize) -> Option<TermMatch> {
        let mut best: Option<TermMatch> = None;

        for (i, term) in self.terms.iter().enumerate() {
            let stale = match (self.searched_from[i], self.next[i]) {
                (None, _) => true,
                (Some(_), Some(found)) => found.start < from,
                // Exhausted: nothing at or after an earlier cursor, so nothing now
                (Some(_), None) => false,
            };
            if stale {
                self.searched_from[i] = Some(from);
                self.next[i] = find_term(haystack, term, from, haystack.len());
            }

            if let Some(found) = self.next[i] {
                let better = match best {
                    None => true,
                    Some(current) => {
                        found.start < current.start
                            || (found.start == current.start && found.end > current.end)
                    }
                };
                if better {
                    best = Some(found);
                }
            }
        }

        best
    }
}

/// First occurrence of `term` starting in `[from, latest_start]`
fn find_term(haystack: &str, term: &str, from: usize, latest_start: usize) -> Option<TermMatch> {
    // A match that starts by `latest_start` ends by `latest_start + term.len()`
    let end = floor_char_boundary(haystack, latest_start.saturating_add(term.len()));
    let region = haystack.get(from..end)?;

    region
        .find(term)
        .map(|offset| TermMatch {
            start: from + offset,
            end: from + offset + term.len(),
        })
        .filter(|m| m.start <= latest_start)
}

/// Group-B match whose start lies `min_gap..=max_gap` characters after the trigger;
/// on a tie the longer term wins
fn window_match(
    haystack: &str,
    pattern: &ProximityPattern,
    group_b: &[String],
    trigger: TermMatch,
) -> Option<TermMatch> {
    let lo = advance_chars(haystack, trigger.end, pattern.window.min_gap);
    let hi = advance_chars(haystack, trigger.end, pattern.window.max_gap);
    if lo > hi || lo >= haystack.len() {
        return None;
    }

    group_b
        .iter()
        .filter_map(|term| find_term(haystack, term, lo, hi))
        .min_by(|a, b| a.start.cmp(&b.start).then_with(|| b.end.cmp(&a.end)))
}

/// Byte offset reached after stepping `chars` characters forward from `from`,
/// clamped to the end of the text
fn advance_chars(text: &str, from: usize, chars: usize) -> usize {
    match text.get(from..) {
        Some(tail) => tail
            .char_indices()
            .nth(chars)
            .map(|(offset, _)| from + offset)
            .unwrap_or(text.len()),
        None => text.len(),
    }
}

/// Largest char boundary at or below `index`, clamped to the end of the text
fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn next_char_boundary(text: &str, from: usize) -> usize {
    text.get(from..)
        .and_then(|tail| tail.chars().next())
        .map(|c| from + c.len_utf8())
        .unwrap_or(text.len() + 1)
}
