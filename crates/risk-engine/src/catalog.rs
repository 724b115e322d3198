//! Clause pattern catalog
//!
//! Risk rules are plain data: two term groups, a proximity window and an
//! explanation. The scanner never special-cases a rule, so extending the catalog
//! is a data change only.

use lazy_static::lazy_static;
use serde::Serialize;
use shared_types::RiskCategory;
use std::collections::HashSet;
use std::sync::Arc;

pub const BUILTIN_CATALOG_VERSION: &str = "2024.1";

/// Placeholder in explanation templates, replaced by the matched group-A text
pub const TRIGGER_PLACEHOLDER: &str = "{trigger}";

/// Allowed gap, in characters, between the end of a group-A match and the start of
/// a group-B match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProximityWindow {
    pub min_gap: usize,
    pub max_gap: usize,
}

impl ProximityWindow {
    pub const fn new(min_gap: usize, max_gap: usize) -> Self {
        Self { min_gap, max_gap }
    }
}

// Windows are fixed per rule; they are not derived from one another.
pub const INDEMNIFICATION_WINDOW: ProximityWindow = ProximityWindow::new(10, 200);
pub const LIABILITY_CAP_WINDOW: ProximityWindow = ProximityWindow::new(0, 150);
pub const TERMINATION_AT_WILL_WINDOW: ProximityWindow = ProximityWindow::new(0, 100);
pub const AUTO_RENEWAL_WINDOW: ProximityWindow = ProximityWindow::new(0, 150);
pub const CONFIDENTIALITY_TERM_WINDOW: ProximityWindow = ProximityWindow::new(10, 200);
pub const ARBITRATION_WINDOW: ProximityWindow = ProximityWindow::new(0, 120);
pub const JURY_WAIVER_WINDOW: ProximityWindow = ProximityWindow::new(0, 80);
pub const NON_COMPETE_WINDOW: ProximityWindow = ProximityWindow::new(0, 150);
pub const NON_SOLICIT_WINDOW: ProximityWindow = ProximityWindow::new(0, 120);
pub const LATE_PAYMENT_WINDOW: ProximityWindow = ProximityWindow::new(0, 150);
pub const NON_REFUNDABLE_WINDOW: ProximityWindow = ProximityWindow::new(0, 100);
pub const GOVERNING_LAW_WINDOW: ProximityWindow = ProximityWindow::new(0, 120);
pub const ASSIGNMENT_WINDOW: ProximityWindow = ProximityWindow::new(0, 120);
pub const AMENDMENT_WINDOW: ProximityWindow = ProximityWindow::new(0, 120);
pub const WARRANTY_DISCLAIMER_WINDOW: ProximityWindow = ProximityWindow::new(0, 150);

/// Ordered two-group proximity signature; terms are matched as ASCII
/// case-insensitive substrings, whatever case they are written in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProximityPattern {
    pub group_a: &'static [&'static str],
    pub group_b: &'static [&'static str],
    pub window: ProximityWindow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskRule {
    pub id: &'static str,
    pub category: RiskCategory,
    pub signature: ProximityPattern,
    pub explanation: &'static str,
}

impl RiskRule {
    /// Fill in the explanation template for a concrete match
    pub fn render_explanation(&self, trigger: &str) -> String {
        self.explanation.replace(TRIGGER_PLACEHOLDER, trigger)
    }
}

/// Problems found by [`RuleCatalog::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    DuplicateId(&'static str),
    EmptyGroup { rule: &'static str },
    EmptyTerm { rule: &'static str },
    InvertedWindow { rule: &'static str },
    EmptyKeyword,
}

// ============================================================================
// BUILT-IN TERM GROUPS
// ============================================================================

/// Indemnity trigger terms
pub const INDEMNITY_TERMS: &[&str] = &["indemnify", "indemnification", "hold harmless"];

/// Loss and exposure terms
pub const EXPOSURE_TERMS: &[&str] = &["liability", "damages", "losses"];

pub const LIABILITY_CAP_TERMS: &[&str] = &[
    "limitation of liability",
    "limit its liability",
    "in no event",
];

pub const REMOTE_DAMAGES_TERMS: &[&str] = &["consequential", "indirect", "incidental", "punitive"];

pub const TERMINATION_TERMS: &[&str] = &["terminate", "termination"];

/// Conditions that let a party act alone
pub const UNILATERAL_TERMS: &[&str] = &[
    "at any time",
    "without cause",
    "for convenience",
    "sole discretion",
];

pub const RENEWAL_TERMS: &[&str] = &["automatically renew", "auto-renew", "automatic renewal"];

pub const RENEWAL_ESCAPE_TERMS: &[&str] = &["unless", "notice"];

pub const CONFIDENTIALITY_TERMS: &[&str] = &["confidential", "non-disclosure", "nondisclosure"];

pub const PERPETUITY_TERMS: &[&str] = &["perpetual", "indefinitely", "survive"];

pub const ARBITRATION_TERMS: &[&str] = &["arbitration", "arbitrate"];

pub const FINALITY_TERMS: &[&str] = &["binding", "final"];

pub const WAIVER_TERMS: &[&str] = &["waive", "waiver"];

pub const TRIAL_TERMS: &[&str] = &["jury", "class action", "class-action"];

pub const NON_COMPETE_TERMS: &[&str] = &[
    "non-compete",
    "noncompete",
    "not compete",
    "shall not engage",
];

pub const COMPETITION_SCOPE_TERMS: &[&str] = &["competing", "competitive", "years", "months"];

pub const SOLICITATION_TERMS: &[&str] = &["non-solicitation", "not solicit"];

pub const SOLICITATION_TARGET_TERMS: &[&str] = &["employees", "customers", "clients"];

pub const LATE_PAYMENT_TERMS: &[&str] = &["late fee", "late payment", "overdue"];

pub const PENALTY_TERMS: &[&str] = &["interest", "penalty", "per month", "percent", "%"];

pub const NON_REFUNDABLE_TERMS: &[&str] = &["non-refundable", "nonrefundable", "no refund"];

pub const PAYMENT_TERMS: &[&str] = &["fee", "deposit", "payment", "amount"];

pub const GOVERNING_LAW_TERMS: &[&str] = &[
    "governed by",
    "construed in accordance with",
    "governing law",
];

pub const JURISDICTION_TERMS: &[&str] = &["laws of", "jurisdiction", "courts of"];

pub const ASSIGNMENT_TERMS: &[&str] = &["assign", "transfer"];

pub const WITHOUT_CONSENT_TERMS: &[&str] = &[
    "without consent",
    "without the consent",
    "without prior",
    "without the prior",
    "without notice",
    "sole discretion",
];

pub const AMENDMENT_TERMS: &[&str] = &["amend", "modify", "change"];

pub const UNILATERAL_CHANGE_TERMS: &[&str] = &["at any time", "sole discretion", "without notice"];

pub const AS_IS_TERMS: &[&str] = &["as is", "as-is", "without warranty"];

pub const WARRANTY_TERMS: &[&str] = &["warrant", "merchantability", "fitness"];

/// Flat keyword list behind the density score; independent of the rules
pub const RISK_KEYWORDS: &[&str] = &[
    "indemnify",
    "indemnification",
    "hold harmless",
    "liability",
    "damages",
    "liquidated damages",
    "terminate",
    "termination",
    "penalty",
    "forfeit",
    "arbitration",
    "waive",
    "non-compete",
    "confidential",
    "exclusive",
    "perpetual",
    "irrevocable",
    "sole discretion",
    "without notice",
    "governing law",
];

lazy_static! {
    static ref BUILTIN_CATALOG: Arc<RuleCatalog> = Arc::new(RuleCatalog::builtin());
}

/// Process-wide built-in catalog, built on first use and never mutated
pub fn default_catalog() -> &'static RuleCatalog {
    &BUILTIN_CATALOG
}

/// Shared handle to the built-in catalog
pub fn shared_default_catalog() -> Arc<RuleCatalog> {
    Arc::clone(&*BUILTIN_CATALOG)
}

/// Versioned, read-only rule set
#[derive(Debug, Clone, Serialize)]
pub struct RuleCatalog {
    version: String,
    rules: Vec<RiskRule>,
    risk_keywords: Vec<&'static str>,
}

impl RuleCatalog {
    pub fn new(
        version: impl Into<String>,
        rules: Vec<RiskRule>,
        risk_keywords: Vec<&'static str>,
    ) -> Self {
        Self {
            version: version.into(),
            rules,
            risk_keywords,
        }
    }

    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_CATALOG_VERSION,
            builtin_rules(),
            RISK_KEYWORDS.to_vec(),
        )
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn rules(&self) -> &[RiskRule] {
        &self.rules
    }

    pub fn rule(&self, id: &str) -> Option<&RiskRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn risk_keywords(&self) -> &[&'static str] {
        &self.risk_keywords
    }

    /// Check the catalog for malformed rules; an empty result means it is usable
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for rule in &self.rules {
            if !seen.insert(rule.id) {
                issues.push(CatalogIssue::DuplicateId(rule.id));
            }

            let signature = &rule.signature;
            if signature.group_a.is_empty() || signature.group_b.is_empty() {
                issues.push(CatalogIssue::EmptyGroup { rule: rule.id });
            }

            for term in signature.group_a.iter().chain(signature.group_b.iter()) {
                if term.trim().is_empty() {
                    issues.push(CatalogIssue::EmptyTerm { rule: rule.id });
                }
            }

            if signature.window.min_gap > signature.window.max_gap {
                issues.push(CatalogIssue::InvertedWindow { rule: rule.id });
            }
        }

        if self.risk_keywords.iter().any(|k| k.is_empty()) {
            issues.push(CatalogIssue::EmptyKeyword);
        }

        issues
    }
}

fn rule(
    id: &'static str,
    category: RiskCategory,
    group_a: &'static [&'static str],
    group_b: &'static [&'static str],
    window: ProximityWindow,
    explanation: &'static str,
) -> RiskRule {
    RiskRule {
        id,
        category,
        signature: ProximityPattern {
            group_a,
            group_b,
            window,
        },
        explanation,
    }
}

fn builtin_rules() -> Vec<RiskRule> {
    vec![
        rule(
            "indemnification",
            RiskCategory::Liability,
            INDEMNITY_TERMS,
            EXPOSURE_TERMS,
            INDEMNIFICATION_WINDOW,
            "This indemnification clause may transfer significant liability to you.",
        ),
        rule(
            "limitation-of-liability",
            RiskCategory::Liability,
            LIABILITY_CAP_TERMS,
            REMOTE_DAMAGES_TERMS,
            LIABILITY_CAP_WINDOW,
            "Liability caps may leave you without recourse for indirect or consequential losses.",
        ),
        rule(
            "termination-at-will",
            RiskCategory::Termination,
            TERMINATION_TERMS,
            UNILATERAL_TERMS,
            TERMINATION_AT_WILL_WINDOW,
            "The other party may be able to end this agreement without cause or notice.",
        ),
        rule(
            "automatic-renewal",
            RiskCategory::Termination,
            RENEWAL_TERMS,
            RENEWAL_ESCAPE_TERMS,
            AUTO_RENEWAL_WINDOW,
            "The agreement may renew automatically unless you cancel within a specific window.",
        ),
        rule(
            "perpetual-confidentiality",
            RiskCategory::Confidentiality,
            CONFIDENTIALITY_TERMS,
            PERPETUITY_TERMS,
            CONFIDENTIALITY_TERM_WINDOW,
            "Confidentiality obligations may continue indefinitely, even after the agreement ends.",
        ),
        rule(
            "binding-arbitration",
            RiskCategory::DisputeResolution,
            ARBITRATION_TERMS,
            FINALITY_TERMS,
            ARBITRATION_WINDOW,
            "Disputes may be forced into binding arbitration, limiting your access to the courts.",
        ),
        rule(
            "jury-trial-waiver",
            RiskCategory::DisputeResolution,
            WAIVER_TERMS,
            TRIAL_TERMS,
            JURY_WAIVER_WINDOW,
            "You may be giving up your right to a jury trial or to join a class action.",
        ),
        rule(
            "non-compete",
            RiskCategory::RestrictiveCovenant,
            NON_COMPETE_TERMS,
            COMPETITION_SCOPE_TERMS,
            NON_COMPETE_WINDOW,
            "This non-compete clause may restrict your ability to work in your field after the agreement ends.",
        ),
        rule(
            "non-solicitation",
            RiskCategory::RestrictiveCovenant,
            SOLICITATION_TERMS,
            SOLICITATION_TARGET_TERMS,
            NON_SOLICIT_WINDOW,
            "You may be barred from soliciting the other party's employees or customers.",
        ),
        rule(
            "late-payment-penalty",
            RiskCategory::Payment,
            LATE_PAYMENT_TERMS,
            PENALTY_TERMS,
            LATE_PAYMENT_WINDOW,
            "Late payments may trigger penalties or interest charges that add up quickly.",
        ),
        rule(
            "non-refundable-payment",
            RiskCategory::Payment,
            NON_REFUNDABLE_TERMS,
            PAYMENT_TERMS,
            NON_REFUNDABLE_WINDOW,
            "Some payments under this agreement may not be refundable.",
        ),
        rule(
            "governing-law",
            RiskCategory::GoverningLaw,
            GOVERNING_LAW_TERMS,
            JURISDICTION_TERMS,
            GOVERNING_LAW_WINDOW,
            "Disputes will be decided under a specific jurisdiction's law, which may be unfamiliar or inconvenient for you.",
        ),
        rule(
            "assignment-without-consent",
            RiskCategory::Assignment,
            ASSIGNMENT_TERMS,
            WITHOUT_CONSENT_TERMS,
            ASSIGNMENT_WINDOW,
            "The other party may transfer this agreement to someone else without your consent.",
        ),
        rule(
            "unilateral-amendment",
            RiskCategory::Amendment,
            AMENDMENT_TERMS,
            UNILATERAL_CHANGE_TERMS,
            AMENDMENT_WINDOW,
            "Terms may be changed unilaterally without your agreement.",
        ),
        rule(
            "warranty-disclaimer",
            RiskCategory::Other,
            AS_IS_TERMS,
            WARRANTY_TERMS,
            WARRANTY_DISCLAIMER_WINDOW,
            "The \"{trigger}\" language disclaims warranties, leaving you to bear the risk of defects.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        assert_eq!(default_catalog().validate(), vec![]);
    }

    #[test]
    fn test_default_catalog_is_shared() {
        assert!(std::ptr::eq(default_catalog(), default_catalog()));
        assert!(std::ptr::eq(&*shared_default_catalog(), default_catalog()));
        assert_eq!(default_catalog().version(), BUILTIN_CATALOG_VERSION);
    }

    #[test]
    fn test_rule_lookup() {
        let rule = default_catalog().rule("indemnification").unwrap();
        assert_eq!(rule.category, RiskCategory::Liability);
        assert_eq!(rule.signature.window, INDEMNIFICATION_WINDOW);
        assert!(default_catalog().rule("no-such-rule").is_none());
    }

    #[test]
    fn test_windows_fall_in_expected_range() {
        for rule in default_catalog().rules() {
            let window = rule.signature.window;
            assert!(window.max_gap >= 10 && window.max_gap <= 200, "{}", rule.id);
        }
    }

    #[test]
    fn test_render_explanation_template() {
        let rule = default_catalog().rule("warranty-disclaimer").unwrap();
        assert_eq!(
            rule.render_explanation("AS IS"),
            "The \"AS IS\" language disclaims warranties, leaving you to bear the risk of defects."
        );

        let plain = default_catalog().rule("indemnification").unwrap();
        assert_eq!(plain.render_explanation("indemnify"), plain.explanation);
    }

    #[test]
    fn test_validate_reports_problems() {
        let bad = RiskRule {
            id: "dup",
            category: RiskCategory::Other,
            signature: ProximityPattern {
                group_a: &["Upper", " "],
                group_b: &[],
                window: ProximityWindow::new(50, 10),
            },
            explanation: "",
        };
        let catalog = RuleCatalog::new("test", vec![bad.clone(), bad], vec![""]);
        let issues = catalog.validate();

        assert!(issues.contains(&CatalogIssue::DuplicateId("dup")));
        assert!(issues.contains(&CatalogIssue::EmptyGroup { rule: "dup" }));
        // Mixed case is fine; only the blank term is reported, once per copy of the rule
        let empty_terms = issues
            .iter()
            .filter(|issue| matches!(issue, CatalogIssue::EmptyTerm { .. }))
            .count();
        assert_eq!(empty_terms, 2);
        assert!(issues.contains(&CatalogIssue::InvertedWindow { rule: "dup" }));
        assert!(issues.contains(&CatalogIssue::EmptyKeyword));
    }

    #[test]
    fn test_every_category_has_a_rule() {
        for category in RiskCategory::ALL {
            assert!(
                default_catalog().rules().iter().any(|r| r.category == category),
                "no rule for {}",
                category
            );
        }
    }
}
