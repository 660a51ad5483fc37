use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{DocumentScan, GroupedReport, Severity};

/// The downloadable risk report for one document.
///
/// `summary` is the full grouped report; `filtered_by` records which
/// severities the rendered views were restricted to.
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub summary: &'a GroupedReport,
    pub filtered_by: Vec<Severity>,
    pub total_clauses: usize,
}

impl<'a> ExportDocument<'a> {
    pub fn new(scan: &'a DocumentScan, filtered_by: &[Severity]) -> Self {
        Self {
            summary: &scan.grouped,
            filtered_by: filtered_by.to_vec(),
            total_clauses: scan.results.len(),
        }
    }
}

/// An export tagged with its document, used when several files are analysed.
#[derive(Debug, Serialize)]
struct NamedExport<'a> {
    document: &'a str,
    #[serde(flatten)]
    export: ExportDocument<'a>,
}

/// Serialize one export document, or an array of tagged ones for several scans.
pub fn to_json(scans: &[DocumentScan], filtered_by: &[Severity]) -> Result<String> {
    let json = match scans {
        [scan] => serde_json::to_string_pretty(&ExportDocument::new(scan, filtered_by))?,
        _ => {
            let exports: Vec<NamedExport> = scans
                .iter()
                .map(|scan| NamedExport {
                    document: &scan.name,
                    export: ExportDocument::new(scan, filtered_by),
                })
                .collect();
            serde_json::to_string_pretty(&exports)?
        }
    };
    Ok(json)
}

pub fn render(scans: &[DocumentScan], filtered_by: &[Severity]) -> Result<()> {
    println!("{}", to_json(scans, filtered_by)?);
    Ok(())
}

pub fn write(scans: &[DocumentScan], filtered_by: &[Severity], output_path: &Path) -> Result<()> {
    let json = to_json(scans, filtered_by)?;
    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;
    tracing::info!(path = %output_path.display(), "wrote JSON export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::models::DocumentFormat;
    use crate::risk::engine::{segment, RuleEngine};
    use crate::risk::grouping::group_risks;

    fn scan(name: &str, text: &str) -> DocumentScan {
        let engine = RuleEngine::new();
        let results = engine.analyze_clauses(&segment(text));
        let grouped = group_risks(&results);
        DocumentScan {
            name: name.to_string(),
            path: PathBuf::from(name),
            format: DocumentFormat::Pdf,
            clauses_scanned: 0,
            results,
            grouped,
        }
    }

    const TEXT: &str = "The arbitration clause is at the Company's sole discretion. \
                        Termination requires notice. The weather is fine today in town.";

    #[test]
    fn test_single_document_shape() {
        let scans = vec![scan("lease.pdf", TEXT)];
        let value: serde_json::Value =
            serde_json::from_str(&to_json(&scans, &[Severity::High]).unwrap()).unwrap();

        assert_eq!(value["total_clauses"], 2);
        assert_eq!(value["filtered_by"], serde_json::json!(["High"]));
        // summary is unfiltered
        assert_eq!(value["summary"]["Termination"][0]["severity"], "Medium");
        assert_eq!(value["summary"]["Arbitration"][0]["index"], 1);
        assert!(value.get("document").is_none());
    }

    #[test]
    fn test_multiple_documents_are_tagged() {
        let scans = vec![scan("a.pdf", TEXT), scan("b.docx", "")];
        let value: serde_json::Value =
            serde_json::from_str(&to_json(&scans, &Severity::all()).unwrap()).unwrap();

        let arr = value.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["document"], "a.pdf");
        assert_eq!(arr[1]["total_clauses"], 0);
        assert_eq!(arr[1]["summary"], serde_json::json!({}));
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("risk_report.json");
        write(&[scan("a.pdf", TEXT)], &Severity::all(), &out).unwrap();
        let content = std::fs::read_to_string(&out).unwrap();
        assert!(content.contains("\"total_clauses\": 2"));
    }
}
