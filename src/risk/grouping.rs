use crate::models::{AnalysisResult, GroupedEntry, GroupedReport, Severity};

/// Flatten an analysis result by risk type, preserving clause order per group.
pub fn group_risks(results: &AnalysisResult) -> GroupedReport {
    results
        .iter()
        .flat_map(|item| {
            item.risks.iter().map(move |finding| {
                (
                    finding.risk_type,
                    GroupedEntry {
                        clause: item.clause.clone(),
                        risk: finding.message,
                        severity: finding.severity,
                        index: item.index,
                    },
                )
            })
        })
        .fold(GroupedReport::new(), |mut report, (risk_type, entry)| {
            report.push(risk_type, entry);
            report
        })
}

impl GroupedReport {
    /// A copy restricted to `severities`. Groups left empty are omitted.
    pub fn filter_by_severity(&self, severities: &[Severity]) -> GroupedReport {
        let mut filtered = GroupedReport::new();
        for (risk_type, entries) in self.iter() {
            for entry in entries.iter().filter(|e| severities.contains(&e.severity)) {
                filtered.push(risk_type, entry.clone());
            }
        }
        filtered
    }

    /// Whether any entry is at or above `threshold`.
    pub fn has_severity_at_least(&self, threshold: Severity) -> bool {
        self.iter()
            .flat_map(|(_, entries)| entries)
            .any(|e| e.severity.rank() >= threshold.rank())
    }
}
