use tracing::{debug, trace};

use crate::models::{AnalysisResult, Clause, ClauseAnalysis, Finding};
use crate::risk::rules::{default_rules, Rule};
use crate::risk::segmenter::split_into_clauses;

/// Evaluates clauses against a registered rule set.
///
/// The engine holds no per-document state; one instance can analyse any
/// number of documents and always returns the same output for the same text.
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule + Send + Sync>>,
}

impl RuleEngine {
    /// Create an engine with the built-in rules.
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule + Send + Sync>>) -> Self {
        Self { rules }
    }

    /// All findings for one clause. Every rule runs; none short-circuits another.
    pub fn check_clause(&self, clause: &str) -> Vec<Finding> {
        let lower = clause.to_lowercase();
        self.rules
            .iter()
            .flat_map(|rule| {
                let findings = rule.check(&lower);
                if !findings.is_empty() {
                    trace!(rule = rule.name(), findings = findings.len(), "rule fired");
                }
                findings
            })
            .collect()
    }

    /// Run every rule over `clauses`, keeping only those with findings.
    pub fn analyze_clauses(&self, clauses: &[Clause]) -> AnalysisResult {
        clauses
            .iter()
            .filter_map(|clause| {
                let risks = self.check_clause(&clause.text);
                if risks.is_empty() {
                    None
                } else {
                    Some(ClauseAnalysis {
                        index: clause.index,
                        clause: clause.text.clone(),
                        risks,
                    })
                }
            })
            .collect()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Segment `text` into numbered clauses.
pub fn segment(text: &str) -> Vec<Clause> {
    let clauses: Vec<Clause> = split_into_clauses(text)
        .into_iter()
        .enumerate()
        .map(|(i, text)| Clause { index: i + 1, text })
        .collect();
    debug!(clauses = clauses.len(), "segmented document");
    clauses
}
