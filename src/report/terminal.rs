use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{DocumentScan, GroupedEntry, GroupedReport, RiskType, Severity};

const CLAUSE_PREVIEW_CHARS: usize = 120;

/// Print the tool banner once per run.
pub fn render_banner() {
    println!(
        "\n {} v{}",
        "legal-risk".bold(),
        env!("CARGO_PKG_VERSION")
    );
}

/// The first `max_chars` characters of the extracted text, indented.
pub fn format_preview(scan_name: &str, text: &str, max_chars: usize) -> String {
    let mut out = format!(
        " {} Extracted text preview — {}\n\n",
        "[TEXT]".cyan().bold(),
        scan_name
    );
    let preview: String = text.chars().take(max_chars).collect();
    for line in preview.lines() {
        out.push_str(&format!("   {}\n", line.dimmed()));
    }
    if text.chars().count() > max_chars {
        out.push_str(&format!("   {}\n", "…".dimmed()));
    }
    out
}

pub fn render_preview(scan_name: &str, text: &str, max_chars: usize) {
    println!("{}", format_preview(scan_name, text, max_chars));
}

/// Render one document's risk report, restricted to `filtered`.
pub fn render(scan: &DocumentScan, filtered: &GroupedReport, verbose: bool, quiet: bool) -> Result<()> {
    let high_count = filtered.count_by_severity(Severity::High);
    let medium_count = filtered.count_by_severity(Severity::Medium);

    if quiet {
        println!(
            "{}: Flagged clauses: {}  High: {}  Medium: {}",
            scan.name,
            scan.results.len(),
            high_count.to_string().red(),
            medium_count.to_string().yellow(),
        );
        return Ok(());
    }

    println!(" Document: {} ({})\n", scan.path.display(), scan.format);

    if scan.results.is_empty() {
        println!(
            " {} No major risks detected in the document.\n",
            "✓".green().bold()
        );
        return Ok(());
    }

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "RISK SUMMARY".bold());
    println!(
        " │  {:<48} │",
        format!("Clauses scanned : {}", scan.clauses_scanned)
    );
    println!(
        " │  {:<48} │",
        format!("Flagged clauses : {}", scan.results.len())
    );
    println!(
        " │  {:<48} │",
        format!("{}  High          : {:>4}", "✗".red(), high_count)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Medium        : {:>4}", "⚠".yellow(), medium_count)
    );
    println!(" │  {:<48} │", summarize_types(filtered));
    println!(" └────────────────────────────────────────────────────┘\n");

    if filtered.is_empty() {
        println!(" No findings match the selected severities.\n");
        return Ok(());
    }

    for (risk_type, entries) in filtered.iter() {
        println!(" {} {} Risks\n", type_marker(risk_type), risk_type.to_string().bold());
        render_table(entries, verbose);
        println!();
    }

    Ok(())
}

fn render_table(entries: &[GroupedEntry], verbose: bool) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Clause #").add_attribute(Attribute::Bold),
            Cell::new("Clause").add_attribute(Attribute::Bold),
            Cell::new("Finding").add_attribute(Attribute::Bold),
            Cell::new("Severity").add_attribute(Attribute::Bold),
        ]);

    for entry in entries {
        let (severity_str, severity_color) = match entry.severity {
            Severity::High => ("✗ High", Color::Red),
            Severity::Medium => ("⚠ Medium", Color::Yellow),
        };

        let clause = if verbose {
            entry.clause.clone()
        } else {
            truncate(&entry.clause, CLAUSE_PREVIEW_CHARS)
        };

        table.add_row(vec![
            Cell::new(entry.index).set_alignment(CellAlignment::Right),
            Cell::new(clause),
            Cell::new(entry.risk),
            Cell::new(severity_str)
                .fg(severity_color)
                .set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{}", table);
}

fn type_marker(risk_type: RiskType) -> ColoredString {
    let label = format!("[{}]", risk_type.to_string().to_uppercase());
    match risk_type {
        RiskType::Penalty | RiskType::Arbitration => label.red().bold(),
        RiskType::Termination => label.yellow().bold(),
        RiskType::Indemnity | RiskType::Liability | RiskType::Confidentiality => {
            label.cyan().bold()
        }
    }
}

/// Up to three most frequent risk types, e.g. `[Liability (4), Penalty (1)]`.
fn summarize_types(report: &GroupedReport) -> String {
    let mut pairs: Vec<(RiskType, usize)> = report
        .iter()
        .map(|(risk_type, entries)| (risk_type, entries.len()))
        .collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(t, cnt)| format!("{} ({})", t, cnt))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}

fn truncate(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max {
        format!("{}…", chars[..max - 1].iter().collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: usize) -> GroupedEntry {
        GroupedEntry {
            clause: "c".to_string(),
            risk: "r",
            severity: Severity::Medium,
            index,
        }
    }

    #[test]
    fn test_summarize_types_orders_by_count() {
        let mut report = GroupedReport::new();
        report.push(RiskType::Penalty, entry(1));
        report.push(RiskType::Liability, entry(2));
        report.push(RiskType::Liability, entry(3));
        assert_eq!(summarize_types(&report), "[Liability (2), Penalty (1)]");
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize_types(&GroupedReport::new()), "");
    }

    #[test]
    fn test_format_preview_limits_chars() {
        colored::control::set_override(false);
        let preview = format_preview("lease.docx", "First line\nSecond line", 8);
        assert!(preview.contains("lease.docx"));
        assert!(preview.contains("   First li\n"));
        assert!(!preview.contains("Second"));
        assert!(preview.ends_with("   …\n"));

        let full = format_preview("lease.docx", "Short", 100);
        assert!(!full.contains('…'));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 5), "abcd…");
    }
}
