//! `legal-risk` — scan contracts for risky or missing clauses.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and install logging ([`logging`]).
//! 2. Load config ([`config::load_config`]).
//! 3. Check every input's format before touching any file ([`detector::detect_format`]).
//! 4. Extract plain text from each PDF/DOCX ([`extractor`]).
//! 5. Segment into clauses and run the rule engine ([`risk`]).
//! 6. Group findings by risk type and apply the severity filter ([`risk::grouping`]).
//! 7. Render the requested report and optional JSON export ([`report`]).
//! 8. Exit `0`, or `1` when a shown finding meets `--fail-on`.

mod cli;
mod config;
mod detector;
mod error;
mod extractor;
mod logging;
mod models;
mod report;
mod risk;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use cli::{Cli, ReportFormat};
use config::load_config;
use detector::detect_format;
use extractor::extract_text;
use models::{DocumentFormat, DocumentScan, Severity};
use risk::engine::{segment, RuleEngine};
use risk::grouping::group_risks;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = load_config(&cwd, cli.config.as_deref())?;

    let severities = dedup_severities(if cli.severity.is_empty() {
        config.report.severities.clone()
    } else {
        cli.severity.iter().map(Into::into).collect()
    });
    let fail_on: Option<Severity> = cli.fail_on.as_ref().map(Into::into).or(config.policy.fail_on);

    let outcome = scan_documents(&cli.files, cli.preview, cli.quiet)?;
    let scans = outcome.scans;
    debug!(
        analysed = scans.len(),
        skipped = outcome.skipped.len(),
        "scan finished"
    );

    if scans.is_empty() {
        return Ok(());
    }

    // --pdf implies PDF format
    let report_format = match &cli.pdf {
        Some(_) => ReportFormat::Pdf,
        None => cli.report,
    };
    let pdf_path = cli
        .pdf
        .unwrap_or_else(|| PathBuf::from("legal-risk-report.pdf"));

    if matches!(report_format, ReportFormat::Pdf) {
        ensure_not_input(&pdf_path, &cli.files)?;
    }
    if let Some(export_path) = &cli.export {
        ensure_not_input(export_path, &cli.files)?;
    }

    match report_format {
        ReportFormat::Terminal => {
            if !cli.quiet {
                report::terminal::render_banner();
                println!();
            }
            for (name, text) in &outcome.previews {
                report::terminal::render_preview(name, text, config.report.preview_chars);
            }
            for scan in &scans {
                let filtered = scan.grouped.filter_by_severity(&severities);
                report::terminal::render(scan, &filtered, cli.verbose, cli.quiet)?;
            }
        }
        ReportFormat::Json | ReportFormat::Pdf => {
            // stdout carries the JSON document
            for (name, text) in &outcome.previews {
                eprintln!(
                    "{}",
                    report::terminal::format_preview(name, text, config.report.preview_chars)
                );
            }
            if matches!(report_format, ReportFormat::Json) {
                report::json::render(&scans, &severities)?;
            } else {
                report::pdf::render(&scans, &severities, &pdf_path)?;
            }
        }
    }

    if let Some(export_path) = &cli.export {
        report::json::write(&scans, &severities, export_path)?;
        if !cli.quiet && !matches!(report_format, ReportFormat::Json) {
            println!("JSON report written to: {}", export_path.display());
        }
    }

    // Exit code: 1 if a shown finding reaches the fail-on threshold
    if let Some(threshold) = fail_on {
        let failed = scans.iter().any(|scan| {
            scan.grouped
                .filter_by_severity(&severities)
                .has_severity_at_least(threshold)
        });
        if failed {
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Analysed documents, plus the inputs that yielded no text.
struct ScanOutcome {
    scans: Vec<DocumentScan>,
    skipped: Vec<String>,
    previews: Vec<(String, String)>,
}

/// Detect, extract and analyse every input in order.
///
/// All formats are checked before any file is read. A document whose text is
/// blank is reported as a warning and skipped; any other extraction failure
/// aborts the run.
fn scan_documents(files: &[PathBuf], keep_text: bool, quiet: bool) -> Result<ScanOutcome> {
    let inputs: Vec<(PathBuf, DocumentFormat)> = files
        .iter()
        .map(|path| detect_format(path).map(|format| (path.clone(), format)))
        .collect::<Result<_, _>>()?;

    let engine = RuleEngine::new();
    let pb = progress_bar(inputs.len(), quiet);

    let mut outcome = ScanOutcome {
        scans: Vec::new(),
        skipped: Vec::new(),
        previews: Vec::new(),
    };

    for (path, format) in &inputs {
        let name = display_name(path);
        if let Some(pb) = &pb {
            pb.set_message(name.clone());
        }

        let text = extract_text(path, *format)?;

        if text.trim().is_empty() {
            warn!(path = %path.display(), "no text extracted");
            let line = format!(
                "No text could be extracted from {}. It might be scanned or encrypted.",
                name
            );
            match &pb {
                Some(pb) => {
                    pb.println(format!(" {} {}", "[WARN]".yellow().bold(), line));
                    pb.inc(1);
                }
                None => eprintln!(" {} {}", "[WARN]".yellow().bold(), line),
            }
            outcome.skipped.push(name);
            continue;
        }

        if keep_text {
            outcome.previews.push((name.clone(), text.clone()));
        }

        let clauses = segment(&text);
        let results = engine.analyze_clauses(&clauses);
        let grouped = group_risks(&results);
        debug!(
            document = %name,
            clauses = clauses.len(),
            flagged = results.len(),
            findings = grouped.finding_count(),
            types = ?grouped.risk_types(),
            "analysed document"
        );

        outcome.scans.push(DocumentScan {
            name,
            path: path.clone(),
            format: *format,
            clauses_scanned: clauses.len(),
            results,
            grouped,
        });

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    Ok(outcome)
}

/// Refuse to write a report over one of the documents being analysed.
fn ensure_not_input(output: &Path, inputs: &[PathBuf]) -> Result<()> {
    let output_canon = std::fs::canonicalize(output).ok();
    for input in inputs {
        let same = input == output
            || matches!(
                (&output_canon, std::fs::canonicalize(input).ok()),
                (Some(a), Some(b)) if *a == b
            );
        if same {
            bail!(
                "Refusing to write report to {}: it is one of the input documents",
                output.display()
            );
        }
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

fn dedup_severities(severities: Vec<Severity>) -> Vec<Severity> {
    let mut unique = Vec::with_capacity(severities.len());
    for s in severities {
        if !unique.contains(&s) {
            unique.push(s);
        }
    }
    unique
}

fn progress_bar(len: usize, quiet: bool) -> Option<ProgressBar> {
    if quiet || len < 2 {
        return None;
    }
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    Some(pb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_severities_keeps_order() {
        assert_eq!(
            dedup_severities(vec![Severity::Medium, Severity::High, Severity::Medium]),
            vec![Severity::Medium, Severity::High]
        );
    }

    fn write_docx(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::io::Write;

        let path = dir.join(name);
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        let xml = format!(
            r#"<w:document xmlns:w="w"><w:body>{}</w:body></w:document>"#,
            body
        );
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
        path
    }

    const CONTRACT: &str = "<w:p><w:r><w:t>This Agreement binds each party to the terms below. \
                            Termination requires notice from the landlord.</w:t></w:r></w:p>";

    #[test]
    fn test_unsupported_input_rejected_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let lease = write_docx(dir.path(), "lease.docx", CONTRACT);
        // Never created: reading it would fail with an IO error instead
        let missing = dir.path().join("missing.docx");
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "plain text").unwrap();

        let err = scan_documents(&[missing, lease, notes], false, true)
            .err()
            .unwrap();
        assert!(matches!(
            err.downcast_ref::<error::ExtractError>(),
            Some(error::ExtractError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_blank_document_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let empty = write_docx(dir.path(), "empty.docx", "<w:p/><w:p></w:p>");
        let lease = write_docx(dir.path(), "lease.docx", CONTRACT);

        let outcome = scan_documents(&[empty, lease], true, true).unwrap();
        assert_eq!(outcome.skipped, vec!["empty.docx".to_string()]);
        assert_eq!(outcome.scans.len(), 1);
        assert_eq!(outcome.scans[0].name, "lease.docx");
        assert_eq!(outcome.scans[0].clauses_scanned, 2);
        assert!(!outcome.scans[0].grouped.is_empty());
        assert_eq!(outcome.previews.len(), 1);
    }

    #[test]
    fn test_extraction_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.docx");
        std::fs::write(&broken, b"not a zip").unwrap();

        let err = scan_documents(&[broken], false, true).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<error::ExtractError>(),
            Some(error::ExtractError::Docx { .. })
        ));
    }

    #[test]
    fn test_output_may_not_overwrite_input() {
        let dir = tempfile::tempdir().unwrap();
        let lease = write_docx(dir.path(), "lease.docx", CONTRACT);
        let inputs = vec![lease.clone()];

        assert!(ensure_not_input(&lease, &inputs).is_err());
        assert!(ensure_not_input(&dir.path().join("./lease.docx"), &inputs).is_err());
        assert!(ensure_not_input(&dir.path().join("risk_report.json"), &inputs).is_ok());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/tmp/docs/lease.pdf")), "lease.pdf");
    }
}
