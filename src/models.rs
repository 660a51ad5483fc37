use std::path::PathBuf;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A segmented unit of document text with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(alias = "high")]
    High,
    #[serde(alias = "medium")]
    Medium,
}

impl Severity {
    /// Ordering used by `--fail-on`: Medium < High.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Medium => 1,
            Severity::High => 2,
        }
    }

    pub fn all() -> Vec<Severity> {
        vec![Severity::High, Severity::Medium]
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::High => write!(f, "High"),
            Severity::Medium => write!(f, "Medium"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskType {
    Termination,
    Penalty,
    Arbitration,
    Indemnity,
    Liability,
    Confidentiality,
}

impl RiskType {
    pub const ALL: [RiskType; 6] = [
        RiskType::Termination,
        RiskType::Penalty,
        RiskType::Arbitration,
        RiskType::Indemnity,
        RiskType::Liability,
        RiskType::Confidentiality,
    ];
}

impl std::fmt::Display for RiskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskType::Termination => write!(f, "Termination"),
            RiskType::Penalty => write!(f, "Penalty"),
            RiskType::Arbitration => write!(f, "Arbitration"),
            RiskType::Indemnity => write!(f, "Indemnity"),
            RiskType::Liability => write!(f, "Liability"),
            RiskType::Confidentiality => write!(f, "Confidentiality"),
        }
    }
}

/// One rule's positive detection on one clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    #[serde(rename = "risk")]
    pub message: &'static str,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub risk_type: RiskType,
}

/// A clause that produced at least one finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClauseAnalysis {
    pub index: usize,
    pub clause: String,
    pub risks: Vec<Finding>,
}

/// Ordered per-clause findings; clauses without findings are absent.
pub type AnalysisResult = Vec<ClauseAnalysis>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedEntry {
    pub clause: String,
    pub risk: &'static str,
    pub severity: Severity,
    pub index: usize,
}

/// Findings keyed by risk type.
///
/// Keys keep first-seen order and entries keep clause order, so the report
/// serializes as a JSON object whose layout matches the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedReport {
    groups: Vec<(RiskType, Vec<GroupedEntry>)>,
}

impl GroupedReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry under `risk_type`, creating the group on first use.
    pub fn push(&mut self, risk_type: RiskType, entry: GroupedEntry) {
        match self.groups.iter_mut().find(|(t, _)| *t == risk_type) {
            Some((_, entries)) => entries.push(entry),
            None => self.groups.push((risk_type, vec![entry])),
        }
    }

    pub fn get(&self, risk_type: RiskType) -> Option<&[GroupedEntry]> {
        self.groups
            .iter()
            .find(|(t, _)| *t == risk_type)
            .map(|(_, entries)| entries.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (RiskType, &[GroupedEntry])> {
        self.groups.iter().map(|(t, entries)| (*t, entries.as_slice()))
    }

    pub fn risk_types(&self) -> Vec<RiskType> {
        self.groups.iter().map(|(t, _)| *t).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of entries across all groups.
    pub fn finding_count(&self) -> usize {
        self.groups.iter().map(|(_, entries)| entries.len()).sum()
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.groups
            .iter()
            .flat_map(|(_, entries)| entries)
            .filter(|e| e.severity == severity)
            .count()
    }
}

impl Serialize for GroupedReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (risk_type, entries) in &self.groups {
            map.serialize_entry(risk_type, entries)?;
        }
        map.end()
    }
}

/// Supported input document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "PDF"),
            DocumentFormat::Docx => write!(f, "DOCX"),
        }
    }
}

/// Everything produced for one analysed document.
#[derive(Debug, Clone)]
pub struct DocumentScan {
    pub name: String,
    pub path: PathBuf,
    pub format: DocumentFormat,
    /// Number of clauses produced by the segmenter, flagged or not.
    pub clauses_scanned: usize,
    pub results: AnalysisResult,
    pub grouped: GroupedReport,
}
