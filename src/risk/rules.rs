use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{Finding, RiskType, Severity};

lazy_static! {
    /// An explicit interval such as "30 days" or "1 year".
    static ref NOTICE_INTERVAL: Regex = Regex::new(r"\d+ (day|month|year)s?").unwrap();

    /// A two-or-more-digit percentage or a dollar amount of three or more digits.
    static ref LARGE_AMOUNT: Regex = Regex::new(r"\d{2,}%|\$\d{3,}").unwrap();
}

/// Words that mark a clause as governing the parties' relationship.
pub const GOVERNANCE_KEYWORDS: &[&str] =
    &["agreement", "obligation", "responsibility", "party", "condition"];

/// A single keyword/regex heuristic.
///
/// Rules receive the lowercased clause and are independent of one another:
/// every registered rule runs on every clause.
pub trait Rule {
    fn name(&self) -> &'static str;
    fn check(&self, clause_lower: &str) -> Vec<Finding>;
}

/// Termination is mentioned with no "<number> day/month/year" interval.
pub struct TerminationRule;

impl Rule for TerminationRule {
    fn name(&self) -> &'static str {
        "termination-ambiguity"
    }

    fn check(&self, clause_lower: &str) -> Vec<Finding> {
        if clause_lower.contains("termination") && !NOTICE_INTERVAL.is_match(clause_lower) {
            vec![Finding {
                message: "Unclear Termination: No clear notice period or timeline specified.",
                severity: Severity::Medium,
                risk_type: RiskType::Termination,
            }]
        } else {
            Vec::new()
        }
    }
}

/// A penalty paired with a large percentage or dollar figure.
pub struct PenaltyRule;

impl Rule for PenaltyRule {
    fn name(&self) -> &'static str {
        "excessive-penalty"
    }

    fn check(&self, clause_lower: &str) -> Vec<Finding> {
        if clause_lower.contains("penalty") && LARGE_AMOUNT.is_match(clause_lower) {
            vec![Finding {
                message: "High Penalty: Financial penalty amount seems unusually high.",
                severity: Severity::High,
                risk_type: RiskType::Penalty,
            }]
        } else {
            Vec::new()
        }
    }
}

/// Arbitration left to one side's "sole discretion".
pub struct ArbitrationRule;

impl Rule for ArbitrationRule {
    fn name(&self) -> &'static str {
        "biased-arbitration"
    }

    fn check(&self, clause_lower: &str) -> Vec<Finding> {
        if clause_lower.contains("arbitration") && clause_lower.contains("sole discretion") {
            vec![Finding {
                message: "Biased Arbitration: Arbitration terms appear to favor one party.",
                severity: Severity::High,
                risk_type: RiskType::Arbitration,
            }]
        } else {
            Vec::new()
        }
    }
}

struct ProtectiveTerm {
    term: &'static str,
    risk_type: RiskType,
    message: &'static str,
}

const PROTECTIVE_TERMS: &[ProtectiveTerm] = &[
    ProtectiveTerm {
        term: "indemnity",
        risk_type: RiskType::Indemnity,
        message: "Missing Indemnity Clause: Document may lack protection against third-party claims.",
    },
    ProtectiveTerm {
        term: "liability",
        risk_type: RiskType::Liability,
        message: "Missing Liability Clause: Absence of liability limits could be risky.",
    },
    ProtectiveTerm {
        term: "confidentiality",
        risk_type: RiskType::Confidentiality,
        message: "Missing Confidentiality Clause: Sensitive information might not be protected.",
    },
];

/// Governance clauses that never mention indemnity, liability or confidentiality.
///
/// Only clauses containing one of [`GOVERNANCE_KEYWORDS`] are considered; each
/// absent term yields its own finding.
pub struct MissingClauseRule;

impl Rule for MissingClauseRule {
    fn name(&self) -> &'static str {
        "missing-protective-clause"
    }

    fn check(&self, clause_lower: &str) -> Vec<Finding> {
        if !GOVERNANCE_KEYWORDS.iter().any(|k| clause_lower.contains(k)) {
            return Vec::new();
        }

        PROTECTIVE_TERMS
            .iter()
            .filter(|p| !clause_lower.contains(p.term))
            .map(|p| Finding {
                message: p.message,
                severity: Severity::Medium,
                risk_type: p.risk_type,
            })
            .collect()
    }
}

/// The built-in rule set, in evaluation order.
pub fn default_rules() -> Vec<Box<dyn Rule + Send + Sync>> {
    vec![
        Box::new(TerminationRule),
        Box::new(PenaltyRule),
        Box::new(ArbitrationRule),
        Box::new(MissingClauseRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(findings: &[Finding]) -> Vec<RiskType> {
        findings.iter().map(|f| f.risk_type).collect()
    }

    #[test]
    fn test_termination_without_interval() {
        let findings = TerminationRule.check("termination requires notice.");
        assert_eq!(types(&findings), vec![RiskType::Termination]);
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_termination_with_interval() {
        assert!(TerminationRule
            .check("termination requires 30 days notice.")
            .is_empty());
        assert!(TerminationRule.check("termination after 1 year.").is_empty());
        assert!(TerminationRule
            .check("termination within 6 months.")
            .is_empty());
    }

    #[test]
    fn test_termination_interval_needs_single_space() {
        // "30-day" does not match "<number> day"
        assert_eq!(
            TerminationRule.check("termination on 30-day notice.").len(),
            1
        );
    }

    #[test]
    fn test_penalty_thresholds() {
        assert_eq!(
            types(&PenaltyRule.check("a penalty of $5000 applies.")),
            vec![RiskType::Penalty]
        );
        assert_eq!(
            types(&PenaltyRule.check("a late penalty of 25% applies.")),
            vec![RiskType::Penalty]
        );
        assert!(PenaltyRule.check("a penalty of $50 applies.").is_empty());
        assert!(PenaltyRule.check("a penalty of 5% applies.").is_empty());
        assert!(PenaltyRule.check("a fee of $5000 applies.").is_empty());
    }

    #[test]
    fn test_penalty_is_high() {
        let findings = PenaltyRule.check("penalty: $900");
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_arbitration_needs_sole_discretion() {
        assert_eq!(
            types(&ArbitrationRule.check("arbitration is at the company's sole discretion.")),
            vec![RiskType::Arbitration]
        );
        assert!(ArbitrationRule
            .check("disputes go to binding arbitration.")
            .is_empty());
        assert!(ArbitrationRule
            .check("at the sole discretion of the board.")
            .is_empty());
    }

    #[test]
    fn test_missing_clause_requires_governance_word() {
        assert!(MissingClauseRule
            .check("the rent is due on the first of the month.")
            .is_empty());
    }

    #[test]
    fn test_missing_clause_all_three() {
        let findings = MissingClauseRule.check("this agreement is binding.");
        assert_eq!(
            types(&findings),
            vec![
                RiskType::Indemnity,
                RiskType::Liability,
                RiskType::Confidentiality
            ]
        );
        assert!(findings.iter().all(|f| f.severity == Severity::Medium));
    }

    #[test]
    fn test_missing_clause_none_when_all_present() {
        assert!(MissingClauseRule
            .check("this agreement covers indemnity, liability and confidentiality.")
            .is_empty());
    }

    #[test]
    fn test_missing_clause_partial() {
        assert_eq!(
            types(&MissingClauseRule.check("each party accepts liability.")),
            vec![RiskType::Indemnity, RiskType::Confidentiality]
        );
    }

    #[test]
    fn test_default_rule_names_are_unique() {
        let rules = default_rules();
        let mut names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 4);
    }
}
