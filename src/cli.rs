use std::path::PathBuf;

use clap::Parser;

use crate::models::Severity;

#[derive(Parser, Debug)]
#[command(
    name = "legal-risk",
    about = "Scan legal documents (PDF/DOCX) for risky or missing contract clauses",
    version
)]
pub struct Cli {
    /// Documents to analyse (.pdf or .docx)
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Config file [default: ./.legal-risk/config.toml, fallback ~/.config/legal-risk/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// PDF output path (`--pdf=FILE`); use without value to default to legal-risk-report.pdf
    #[arg(long, value_name = "FILE", num_args = 0..=1, require_equals = true, default_missing_value = "legal-risk-report.pdf")]
    pub pdf: Option<PathBuf>,

    /// Also write the JSON export (`--export=FILE`); use without value to default to risk_report.json
    #[arg(long, value_name = "FILE", num_args = 0..=1, require_equals = true, default_missing_value = "risk_report.json")]
    pub export: Option<PathBuf>,

    /// Only show findings of this severity (repeatable) [default: from config, else all]
    #[arg(long = "severity", value_name = "LEVEL")]
    pub severity: Vec<SeverityArg>,

    /// Exit with status 1 if a shown finding is at or above this severity
    #[arg(long = "fail-on", value_name = "LEVEL")]
    pub fail_on: Option<SeverityArg>,

    /// Print a preview of the extracted text (to stderr with --report json|pdf)
    #[arg(long)]
    pub preview: bool,

    /// Show full clause text and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print a summary line per document
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Pdf,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum SeverityArg {
    High,
    Medium,
}

impl From<&SeverityArg> for Severity {
    fn from(arg: &SeverityArg) -> Self {
        match arg {
            SeverityArg::High => Severity::High,
            SeverityArg::Medium => Severity::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["legal-risk", "contract.pdf"]).unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("contract.pdf")]);
        assert!(matches!(cli.report, ReportFormat::Terminal));
        assert!(cli.severity.is_empty());
        assert!(cli.pdf.is_none());
        assert!(cli.export.is_none());
    }

    #[test]
    fn test_files_required() {
        assert!(Cli::try_parse_from(["legal-risk"]).is_err());
    }

    #[test]
    fn test_repeatable_severity_and_bare_export() {
        let cli = Cli::try_parse_from([
            "legal-risk",
            "--severity",
            "high",
            "--severity",
            "medium",
            "--export",
            "--",
            "a.docx",
            "b.pdf",
        ])
        .unwrap();
        let severities: Vec<Severity> = cli.severity.iter().map(Into::into).collect();
        assert_eq!(severities, vec![Severity::High, Severity::Medium]);
        assert_eq!(cli.export, Some(PathBuf::from("risk_report.json")));
        assert_eq!(cli.files.len(), 2);
    }

    #[test]
    fn test_bare_output_flags_do_not_take_documents() {
        let cli =
            Cli::try_parse_from(["legal-risk", "--export", "contract.pdf", "other.docx"]).unwrap();
        assert_eq!(cli.export, Some(PathBuf::from("risk_report.json")));
        assert_eq!(
            cli.files,
            vec![PathBuf::from("contract.pdf"), PathBuf::from("other.docx")]
        );

        let cli = Cli::try_parse_from(["legal-risk", "--pdf", "lease.docx"]).unwrap();
        assert_eq!(cli.pdf, Some(PathBuf::from("legal-risk-report.pdf")));
        assert_eq!(cli.files, vec![PathBuf::from("lease.docx")]);
    }

    #[test]
    fn test_output_paths_with_equals() {
        let cli = Cli::try_parse_from([
            "legal-risk",
            "--export=out/report.json",
            "--pdf=out/report.pdf",
            "lease.docx",
        ])
        .unwrap();
        assert_eq!(cli.export, Some(PathBuf::from("out/report.json")));
        assert_eq!(cli.pdf, Some(PathBuf::from("out/report.pdf")));
    }

    #[test]
    fn test_fail_on() {
        let cli = Cli::try_parse_from(["legal-risk", "--fail-on", "high", "x.pdf"]).unwrap();
        assert!(matches!(cli.fail_on, Some(SeverityArg::High)));
    }
}
