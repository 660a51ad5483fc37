use std::path::Path;

use anyhow::{Context, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Polygon, Rgb,
};

use crate::models::{DocumentScan, GroupedReport, RiskType, Severity};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const COVER_HDR_H: f32 = 72.0;

// ── Palette ───────────────────────────────────────────────────────────────────
const BG:           (f32, f32, f32) = (1.00, 1.00, 1.00);
const PANEL:        (f32, f32, f32) = (1.00, 1.00, 1.00);
const PANEL_ALT:    (f32, f32, f32) = (0.96, 0.96, 0.98);
const PANEL_BORDER: (f32, f32, f32) = (0.85, 0.87, 0.92);
const ACCENT_NAVY:  (f32, f32, f32) = (0.12, 0.20, 0.42);
const ACCENT_TEAL:  (f32, f32, f32) = (0.10, 0.48, 0.55);
const TEXT_PRI:     (f32, f32, f32) = (0.07, 0.08, 0.14);
const TEXT_SEC:     (f32, f32, f32) = (0.36, 0.40, 0.52);
const TEXT_MUT:     (f32, f32, f32) = (0.58, 0.63, 0.72);
const WHITE:        (f32, f32, f32) = (1.00, 1.00, 1.00);
const WHITE_DIM:    (f32, f32, f32) = (0.84, 0.90, 0.96);

const HIGH_BG: (f32, f32, f32) = (1.00, 0.91, 0.91);
const HIGH_FG: (f32, f32, f32) = (0.76, 0.09, 0.13);
const MED_BG:  (f32, f32, f32) = (1.00, 0.95, 0.87);
const MED_FG:  (f32, f32, f32) = (0.70, 0.40, 0.02);
const PROT_BG: (f32, f32, f32) = (0.91, 0.93, 1.00);
const PROT_FG: (f32, f32, f32) = (0.20, 0.34, 0.82);

const R_PANEL: f32 = 2.5;
const R_BADGE: f32 = 1.5;

// ── Risk-type summary layout ──────────────────────────────────────────────────
const C1_X: f32 = MARGIN;
const C2_X: f32 = MARGIN + 44.0;
const C3_X: f32 = MARGIN + 118.0;
const T_END: f32 = PAGE_W - MARGIN;

const HDR_H: f32 = 9.0;
const LINE_H: f32 = 4.8;
const ROW_PAD: f32 = 4.5;

const BADGE_W: f32 = 37.0;
const BADGE_H: f32 = 6.5;
const DOT_SIZE: f32 = 2.5;

const DESC_WRAP: usize = 36;
const INDEX_WRAP: usize = 28;
const INDEX_MAX_LINES: usize = 4;

/// Render `scans` to a PDF restricted to `severities`.
///
/// One document: cover → risk-type summary → findings table.
/// Several documents: batch cover, then summary and findings per document.
pub fn render(scans: &[DocumentScan], severities: &[Severity], output_path: &Path) -> Result<()> {
    let doc = PdfDocument::empty("Contract Risk Report");

    match scans {
        [scan] => {
            let filtered = scan.grouped.filter_by_severity(severities);
            add_cover_page(&doc, scan, &filtered, severities)?;
            add_type_summary_page(&doc, &filtered, None)?;
            add_findings_pages(&doc, &filtered, None)?;
        }
        _ => {
            add_batch_cover_page(&doc, scans, severities)?;
            for scan in scans {
                let filtered = scan.grouped.filter_by_severity(severities);
                add_type_summary_page(&doc, &filtered, Some(&scan.name))?;
                add_findings_pages(&doc, &filtered, Some(&scan.name))?;
            }
        }
    }

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

    println!("PDF report written to: {}", output_path.display());
    Ok(())
}

// ── Cover pages ───────────────────────────────────────────────────────────────

fn add_cover_header(
    layer: &PdfLayerReference,
    subtitle: &str,
    font_r: &IndirectFontRef,
    font_b: &IndirectFontRef,
) {
    fill_rect(layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    let hdr_bot = PAGE_H - COVER_HDR_H;
    fill_gradient_h(layer, 0.0, hdr_bot, PAGE_W, COVER_HDR_H, ACCENT_NAVY, ACCENT_TEAL, 28);

    set_color(layer, WHITE_DIM);
    layer.use_text(
        format!("legal-risk v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(PAGE_W - MARGIN - 36.0), Mm(PAGE_H - 10.5), font_r,
    );

    set_color(layer, WHITE);
    layer.use_text("Contract Risk", 28.0, Mm(MARGIN), Mm(PAGE_H - 26.0), font_b);
    set_color(layer, WHITE_DIM);
    layer.use_text(subtitle, 28.0, Mm(MARGIN), Mm(PAGE_H - 41.0), font_b);
}

fn draw_chip(
    layer: &PdfLayerReference,
    y: f32,
    label: &str,
    value: &str,
    font_b: &IndirectFontRef,
) {
    let chip_h = 12.0f32;
    let chip_w = 106.0f32;
    fill_rounded_rect(layer, MARGIN, y, chip_w, chip_h, R_BADGE, PANEL);
    stroke_rounded_rect(layer, MARGIN, y, chip_w, chip_h, R_BADGE, PANEL_BORDER);
    fill_rect(layer, MARGIN, y, 2.5, chip_h, ACCENT_TEAL);

    set_color(layer, TEXT_MUT);
    layer.use_text(label, 6.0, Mm(MARGIN + 5.0), Mm(y + chip_h - 3.8), font_b);
    set_color(layer, TEXT_PRI);
    layer.use_text(truncate(value, 34), 9.5, Mm(MARGIN + 5.0), Mm(y + 2.8), font_b);
}

fn draw_footer(layer: &PdfLayerReference, font_r: &IndirectFontRef) {
    draw_hline(layer, MARGIN, PAGE_W - MARGIN, 22.0, PANEL_BORDER);
    set_color(layer, TEXT_MUT);
    layer.use_text(
        format!("Generated by legal-risk v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(MARGIN), Mm(15.0), font_r,
    );
    layer.use_text(today(), 7.5, Mm(PAGE_W - MARGIN - 22.0), Mm(15.0), font_r);
}

fn add_cover_page(
    doc: &PdfDocumentReference,
    scan: &DocumentScan,
    filtered: &GroupedReport,
    severities: &[Severity],
) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Cover");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    add_cover_header(&layer, "Report", &font_r, &font_b);

    let chip_y = PAGE_H - COVER_HDR_H - 18.0;
    draw_chip(&layer, chip_y, "DOCUMENT", &scan.name, &font_b);

    set_color(&layer, TEXT_SEC);
    layer.use_text(
        format!("Analysed  {}    Showing  {}", today(), severity_list(severities)),
        9.0, Mm(MARGIN), Mm(chip_y - 8.0), &font_r,
    );

    let rule_y = chip_y - 16.5;
    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, rule_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("OVERVIEW", 6.5, Mm(MARGIN), Mm(rule_y - 7.0), &font_b);

    let card_y  = rule_y - 42.0;
    let card_h  = 26.0f32;
    let gap     = 4.0f32;
    let card_w  = (T_END - MARGIN - gap * 3.0) / 4.0;

    let cards: [(&str, String, (f32, f32, f32)); 4] = [
        ("CLAUSES SCANNED", scan.clauses_scanned.to_string(), ACCENT_NAVY),
        ("FLAGGED", scan.results.len().to_string(), ACCENT_TEAL),
        ("HIGH", filtered.count_by_severity(Severity::High).to_string(), HIGH_FG),
        ("MEDIUM", filtered.count_by_severity(Severity::Medium).to_string(), MED_FG),
    ];

    for (i, (label, value, accent)) in cards.iter().enumerate() {
        let cx = MARGIN + (card_w + gap) * i as f32;
        draw_stat_card(&layer, cx, card_y, card_w, card_h, label, value, *accent,
                       &font_r, &font_b);
    }

    let bullet_y = card_y - 13.0;
    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, bullet_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("WHAT'S IN THIS REPORT", 6.5, Mm(MARGIN), Mm(bullet_y - 7.5), &font_b);

    let bullets = [
        "Risk types: what each category means and which clauses raised it",
        "Findings: every flagged clause with its message and severity",
    ];
    for (i, text) in bullets.iter().enumerate() {
        let y = bullet_y - 14.5 - i as f32 * 6.0;
        fill_rounded_rect(&layer, MARGIN, y, 2.0, 2.0, 1.0, ACCENT_TEAL);
        set_color(&layer, TEXT_SEC);
        layer.use_text(*text, 8.0, Mm(MARGIN + 5.0), Mm(y), &font_r);
    }

    if filtered.is_empty() {
        set_color(&layer, TEXT_PRI);
        layer.use_text(
            "No major risks detected in the document.",
            11.0, Mm(MARGIN), Mm(bullet_y - 34.0), &font_b,
        );
    }

    draw_footer(&layer, &font_r);
    Ok(())
}

fn add_batch_cover_page(
    doc: &PdfDocumentReference,
    scans: &[DocumentScan],
    severities: &[Severity],
) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Cover");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    add_cover_header(&layer, "Batch Report", &font_r, &font_b);

    let chip_y = PAGE_H - COVER_HDR_H - 18.0;
    draw_chip(
        &layer,
        chip_y,
        "DOCUMENTS",
        &format!("{} document{}", scans.len(), if scans.len() == 1 { "" } else { "s" }),
        &font_b,
    );

    set_color(&layer, TEXT_SEC);
    layer.use_text(
        format!("Analysed  {}    Showing  {}", today(), severity_list(severities)),
        9.0, Mm(MARGIN), Mm(chip_y - 8.0), &font_r,
    );

    let filtered: Vec<GroupedReport> = scans
        .iter()
        .map(|s| s.grouped.filter_by_severity(severities))
        .collect();
    let flagged: usize = scans.iter().map(|s| s.results.len()).sum();
    let high: usize = filtered.iter().map(|f| f.count_by_severity(Severity::High)).sum();
    let medium: usize = filtered.iter().map(|f| f.count_by_severity(Severity::Medium)).sum();

    let rule_y = chip_y - 16.5;
    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, rule_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("OVERVIEW", 6.5, Mm(MARGIN), Mm(rule_y - 7.0), &font_b);

    let card_y  = rule_y - 42.0;
    let card_h  = 26.0f32;
    let gap     = 4.0f32;
    let card_w  = (T_END - MARGIN - gap * 3.0) / 4.0;

    let cards: [(&str, String, (f32, f32, f32)); 4] = [
        ("DOCUMENTS", scans.len().to_string(), ACCENT_NAVY),
        ("FLAGGED", flagged.to_string(), ACCENT_TEAL),
        ("HIGH", high.to_string(), HIGH_FG),
        ("MEDIUM", medium.to_string(), MED_FG),
    ];

    for (i, (label, value, accent)) in cards.iter().enumerate() {
        let cx = MARGIN + (card_w + gap) * i as f32;
        draw_stat_card(&layer, cx, card_y, card_w, card_h, label, value, *accent,
                       &font_r, &font_b);
    }

    let section_y = card_y - 13.0;
    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, section_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("DOCUMENTS ANALYSED", 6.5, Mm(MARGIN), Mm(section_y - 7.5), &font_b);

    let tbl_hdr_y = section_y - 14.0;
    let col_doc  = MARGIN + 2.0;
    let col_flag = MARGIN + 106.0;
    let col_high = MARGIN + 126.0;
    let col_med  = MARGIN + 146.0;

    set_color(&layer, TEXT_MUT);
    layer.use_text("DOCUMENT", 6.5, Mm(col_doc),  Mm(tbl_hdr_y), &font_b);
    layer.use_text("FLAGGED",  6.5, Mm(col_flag), Mm(tbl_hdr_y), &font_b);
    layer.use_text("HIGH",     6.5, Mm(col_high), Mm(tbl_hdr_y), &font_b);
    layer.use_text("MEDIUM",   6.5, Mm(col_med),  Mm(tbl_hdr_y), &font_b);
    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, tbl_hdr_y - 2.0, PANEL_BORDER);

    const MAX_ROWS: usize = 12;
    let show = scans.len().min(MAX_ROWS);

    for (i, (scan, report)) in scans.iter().zip(&filtered).take(show).enumerate() {
        let row_y = tbl_hdr_y - 7.5 - i as f32 * 6.5;
        let d_high = report.count_by_severity(Severity::High);

        if i % 2 == 0 {
            fill_rect(&layer, MARGIN, row_y - 1.5, T_END - MARGIN, 6.5, PANEL_ALT);
        }

        set_color(&layer, TEXT_PRI);
        layer.use_text(truncate(&scan.name, 44), 8.0, Mm(col_doc), Mm(row_y), &font_r);
        set_color(&layer, TEXT_SEC);
        layer.use_text(scan.results.len().to_string(), 8.0, Mm(col_flag), Mm(row_y), &font_r);

        if d_high > 0 {
            fill_rounded_rect(&layer, col_high - 0.5, row_y - 1.2, 14.0, 4.5, R_BADGE, HIGH_BG);
            set_color(&layer, HIGH_FG);
            layer.use_text(d_high.to_string(), 8.0, Mm(col_high + 1.0), Mm(row_y), &font_b);
        } else {
            set_color(&layer, TEXT_MUT);
            layer.use_text("0", 8.0, Mm(col_high), Mm(row_y), &font_r);
        }

        set_color(&layer, TEXT_SEC);
        layer.use_text(
            report.count_by_severity(Severity::Medium).to_string(),
            8.0, Mm(col_med), Mm(row_y), &font_r,
        );
    }

    if scans.len() > MAX_ROWS {
        let more_y = tbl_hdr_y - 7.5 - show as f32 * 6.5;
        set_color(&layer, TEXT_MUT);
        layer.use_text(
            format!("+ {} more…", scans.len() - MAX_ROWS),
            7.5, Mm(col_doc), Mm(more_y), &font_r,
        );
    }

    draw_footer(&layer, &font_r);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_stat_card(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    label: &str,
    value: &str,
    accent: (f32, f32, f32),
    font_r: &IndirectFontRef,
    font_b: &IndirectFontRef,
) {
    fill_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL);
    stroke_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL_BORDER);
    fill_rect(layer, x, y + h - 2.0, w, 2.0, accent);

    set_color(layer, accent);
    layer.use_text(value, 20.0, Mm(x + 5.0), Mm(y + h * 0.38), font_b);

    set_color(layer, TEXT_MUT);
    layer.use_text(label, 6.5, Mm(x + 5.0), Mm(y + 3.5), font_r);
}

// ── Risk-type summary page ────────────────────────────────────────────────────

struct TypeRow {
    name: String,
    bg: (f32, f32, f32),
    fg: (f32, f32, f32),
    desc_lines: Vec<String>,
    index_lines: Vec<String>,
    height: f32,
}

fn type_description(risk_type: RiskType) -> &'static str {
    match risk_type {
        RiskType::Termination => "Termination is mentioned without a concrete notice period or timeline.",
        RiskType::Penalty => "A penalty is paired with a large percentage or dollar amount.",
        RiskType::Arbitration => "Arbitration is left to one side's sole discretion.",
        RiskType::Indemnity => "Governance language with no indemnity protection against third-party claims.",
        RiskType::Liability => "Governance language with no limit or allocation of liability.",
        RiskType::Confidentiality => "Governance language with no confidentiality protection.",
    }
}

fn type_colors(risk_type: RiskType) -> ((f32, f32, f32), (f32, f32, f32)) {
    match risk_type {
        RiskType::Penalty | RiskType::Arbitration => (HIGH_BG, HIGH_FG),
        RiskType::Termination => (MED_BG, MED_FG),
        RiskType::Indemnity | RiskType::Liability | RiskType::Confidentiality => (PROT_BG, PROT_FG),
    }
}

fn add_type_summary_page(
    doc: &PdfDocumentReference,
    report: &GroupedReport,
    document_label: Option<&str>,
) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Risk Types");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    fill_gradient_h(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_NAVY, ACCENT_TEAL, 21);

    let rows: Vec<TypeRow> = RiskType::ALL.iter().map(|&risk_type| {
        let indices: Vec<usize> = report
            .get(risk_type)
            .map(|entries| entries.iter().map(|e| e.index).collect())
            .unwrap_or_default();
        let desc_lines = wrap_text(type_description(risk_type), DESC_WRAP);
        let index_lines = {
            let mut lines = format_index_list(&indices, INDEX_WRAP);
            if lines.len() > INDEX_MAX_LINES {
                let count_line = lines.last().cloned().unwrap_or_default();
                lines.truncate(INDEX_MAX_LINES - 1);
                lines.push(count_line);
            }
            lines
        };
        let (bg, fg) = type_colors(risk_type);
        let n = desc_lines.len().max(index_lines.len()).max(2) as f32;
        TypeRow {
            name: risk_type.to_string(),
            bg, fg, desc_lines, index_lines,
            height: n * LINE_H + ROW_PAD * 2.0,
        }
    }).collect();

    const TABLE_TOP: f32 = 258.0;
    let total_h = HDR_H + rows.iter().map(|r| r.height).sum::<f32>();
    let table_bot = TABLE_TOP - total_h;
    let table_w = T_END - C1_X;

    set_color(&layer, TEXT_PRI);
    let heading = match document_label {
        Some(name) => format!("Risk Types — {}", name),
        None => "Risk Types".to_string(),
    };
    layer.use_text(truncate(&heading, 44), 20.0, Mm(MARGIN), Mm(278.5), &font_b);
    set_color(&layer, TEXT_SEC);
    layer.use_text(
        "Flagged clauses grouped by risk type",
        9.0, Mm(MARGIN), Mm(271.5), &font_r,
    );
    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, 267.5, PANEL_BORDER);

    fill_rounded_rect(&layer, C1_X, table_bot, table_w, total_h, R_PANEL, PANEL);
    stroke_rounded_rect(&layer, C1_X, table_bot, table_w, total_h, R_PANEL, PANEL_BORDER);

    set_color(&layer, TEXT_SEC);
    layer.use_text("RISK TYPE",     7.0, Mm(C1_X + 4.0), Mm(TABLE_TOP - 6.2), &font_b);
    layer.use_text("WHAT IT MEANS", 7.0, Mm(C2_X + 2.0), Mm(TABLE_TOP - 6.2), &font_b);
    layer.use_text("CLAUSES",       7.0, Mm(C3_X + 2.0), Mm(TABLE_TOP - 6.2), &font_b);
    draw_hline(&layer, C1_X + R_PANEL, T_END - R_PANEL, TABLE_TOP - HDR_H, PANEL_BORDER);

    let mut y_top = TABLE_TOP - HDR_H;

    for (i, row) in rows.iter().enumerate() {
        let y_bot = y_top - row.height;

        if i % 2 == 1 {
            fill_rect(&layer, C1_X, y_bot, table_w, row.height, PANEL_ALT);
        }

        let badge_x = C1_X + 3.0;
        let badge_y = y_top - ROW_PAD - BADGE_H;
        fill_rounded_rect(&layer, badge_x, badge_y, BADGE_W, BADGE_H, R_BADGE, row.bg);
        fill_rounded_rect(&layer,
            badge_x + 2.5, badge_y + (BADGE_H - DOT_SIZE) / 2.0,
            DOT_SIZE, DOT_SIZE, DOT_SIZE / 2.0, row.fg);

        set_color(&layer, row.fg);
        layer.use_text(row.name.as_str(), 8.0, Mm(badge_x + 7.5), Mm(badge_y + 1.5), &font_b);

        set_color(&layer, TEXT_SEC);
        for (j, line) in row.desc_lines.iter().enumerate() {
            let ly = y_top - ROW_PAD - (j as f32 + 0.9) * LINE_H;
            layer.use_text(line.as_str(), 8.0, Mm(C2_X + 2.0), Mm(ly), &font_r);
        }

        // Clause numbers first (muted), finding count last (bold)
        let last_idx = row.index_lines.len().saturating_sub(1);
        for (j, line) in row.index_lines.iter().enumerate() {
            let ly = y_top - ROW_PAD - (j as f32 + 0.9) * LINE_H;
            if j == last_idx {
                set_color(&layer, TEXT_PRI);
                layer.use_text(line.as_str(), 9.0, Mm(C3_X + 2.0), Mm(ly), &font_b);
            } else {
                set_color(&layer, TEXT_MUT);
                layer.use_text(line.as_str(), 7.0, Mm(C3_X + 2.0), Mm(ly), &font_r);
            }
        }

        if i < rows.len() - 1 {
            draw_hline(&layer, C1_X + R_PANEL, T_END - R_PANEL, y_bot, PANEL_BORDER);
        }
        y_top = y_bot;
    }

    draw_footer(&layer, &font_r);
    Ok(())
}

// ── Findings table pages ──────────────────────────────────────────────────────

fn add_findings_pages(
    doc: &PdfDocumentReference,
    report: &GroupedReport,
    document_label: Option<&str>,
) -> Result<()> {
    if report.is_empty() {
        return Ok(());
    }

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    const BASE_ROW_H: f32 = 7.0;
    const EXTRA_LINE_H: f32 = 3.5;
    const CLAUSE_LINE_H: f32 = 3.2;
    const HDR_Y: f32 = 268.5;
    const FIRST_Y: f32 = 259.5;
    const BOT_MARGIN: f32 = 25.0;
    const FINDING_WRAP: usize = 52;
    const CLAUSE_WRAP: usize = 110;
    const CLAUSE_MAX_LINES: usize = 3;

    //  CLAUSE   TYPE        FINDING            SEVERITY
    //  18…34    34…66       66…152             152…192  (mm)
    let col_x = [MARGIN, MARGIN + 16.0, MARGIN + 48.0, MARGIN + 152.0];
    let headers = ["CLAUSE", "TYPE", "FINDING", "SEVERITY"];

    let rows: Vec<_> = report
        .iter()
        .flat_map(|(risk_type, entries)| entries.iter().map(move |e| (risk_type, e)))
        .map(|(risk_type, entry)| {
            let finding_lines = wrap_text(entry.risk, FINDING_WRAP);
            let mut clause_lines = wrap_text(&entry.clause, CLAUSE_WRAP);
            if clause_lines.len() > CLAUSE_MAX_LINES {
                clause_lines.truncate(CLAUSE_MAX_LINES);
                if let Some(last) = clause_lines.last_mut() {
                    last.push('…');
                }
            }
            let h = BASE_ROW_H
                + finding_lines.len().saturating_sub(1) as f32 * EXTRA_LINE_H
                + clause_lines.len() as f32 * CLAUSE_LINE_H;
            (risk_type, entry, finding_lines, clause_lines, h)
        })
        .collect();

    let mut cur_y = FIRST_Y;
    let mut page_state: Option<(PdfPageIndex, PdfLayerIndex)> = None;
    let mut page_num: u32 = 0;

    for (row_idx, (risk_type, entry, finding_lines, clause_lines, row_h)) in rows.iter().enumerate() {
        let row_h = *row_h;

        let (pi, li) = match page_state.filter(|_| cur_y - row_h >= BOT_MARGIN) {
            Some(state) => state,
            None => {
                page_num += 1;
                let (pi, li) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Findings");
                let layer = doc.get_page(pi).get_layer(li);

                fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
                fill_gradient_h(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_NAVY, ACCENT_TEAL, 21);

                set_color(&layer, TEXT_PRI);
                let heading = match document_label {
                    Some(name) => format!("Findings — {}", name),
                    None => "Findings".to_string(),
                };
                layer.use_text(truncate(&heading, 46), 14.0, Mm(MARGIN), Mm(282.5), &font_b);
                set_color(&layer, TEXT_MUT);
                layer.use_text(
                    format!("Page {}", page_num),
                    8.0, Mm(PAGE_W - MARGIN - 14.0), Mm(283.0), &font_r,
                );
                draw_hline(&layer, MARGIN, PAGE_W - MARGIN, 277.5, PANEL_BORDER);

                fill_rounded_rect(&layer, MARGIN, HDR_Y - 7.5, PAGE_W - 2.0 * MARGIN, 9.5, R_BADGE, PANEL);
                stroke_rounded_rect(&layer, MARGIN, HDR_Y - 7.5, PAGE_W - 2.0 * MARGIN, 9.5, R_BADGE, PANEL_BORDER);
                set_color(&layer, TEXT_MUT);
                for (i, h) in headers.iter().enumerate() {
                    layer.use_text(*h, 7.0, Mm(col_x[i] + 1.5), Mm(HDR_Y - 4.0), &font_b);
                }

                draw_footer(&layer, &font_r);

                cur_y = FIRST_Y;
                page_state = Some((pi, li));
                (pi, li)
            }
        };
        let layer = doc.get_page(pi).get_layer(li);

        let (severity_str, severity_fg, severity_bg) = match entry.severity {
            Severity::High   => ("HIGH",   HIGH_FG, HIGH_BG),
            Severity::Medium => ("MEDIUM", MED_FG,  MED_BG),
        };

        if row_idx % 2 == 0 {
            fill_rect(&layer, MARGIN, cur_y - row_h + 1.5, PAGE_W - 2.0 * MARGIN, row_h, PANEL_ALT);
        }

        let text_y = cur_y - 4.0;

        set_color(&layer, TEXT_PRI);
        layer.use_text(entry.index.to_string(), 8.0, Mm(col_x[0] + 1.5), Mm(text_y), &font_b);
        set_color(&layer, TEXT_SEC);
        layer.use_text(risk_type.to_string(), 8.0, Mm(col_x[1] + 1.5), Mm(text_y), &font_r);

        set_color(&layer, TEXT_PRI);
        for (j, line) in finding_lines.iter().enumerate() {
            let line_y = text_y - j as f32 * EXTRA_LINE_H;
            layer.use_text(line.as_str(), 8.0, Mm(col_x[2] + 1.5), Mm(line_y), &font_r);
        }

        // Clause text under the row, full width
        let clause_top = text_y - finding_lines.len() as f32 * EXTRA_LINE_H - 0.5;
        set_color(&layer, TEXT_MUT);
        for (j, line) in clause_lines.iter().enumerate() {
            let line_y = clause_top - j as f32 * CLAUSE_LINE_H;
            layer.use_text(line.as_str(), 6.5, Mm(col_x[1] + 1.5), Mm(line_y), &font_r);
        }

        let badge_x = col_x[3] + 1.5;
        let badge_y = cur_y - 6.0;
        fill_rounded_rect(&layer, badge_x, badge_y, 20.0, 4.8, R_BADGE, severity_bg);
        set_color(&layer, severity_fg);
        layer.use_text(severity_str, 7.0, Mm(badge_x + 3.0), Mm(badge_y + 1.1), &font_b);

        draw_hline(&layer, MARGIN, T_END, cur_y - row_h + 1.5, PANEL_BORDER);

        cur_y -= row_h;
    }

    Ok(())
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb { r, g, b, icc_profile: None })
}

fn set_color(layer: &PdfLayerReference, color: (f32, f32, f32)) {
    layer.set_fill_color(rgb(color));
}

fn reset_colors(layer: &PdfLayerReference) {
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
             color: (f32, f32, f32)) {
    layer.set_fill_color(rgb(color));
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(Mm(x),     Mm(y)),     false),
            (Point::new(Mm(x + w), Mm(y)),     false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x),     Mm(y + h)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    reset_colors(layer);
}

/// Clockwise polygon ring approximating a rounded rectangle.
fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> Vec<(Point, bool)> {
    let r = r.min(w / 2.0).min(h / 2.0);
    const SEGS: usize = 8;
    let mut pts = Vec::with_capacity(4 * (SEGS + 1));

    let corners = [
        (x + w - r, y + r,     270.0f32, 360.0f32),
        (x + w - r, y + h - r, 0.0f32,   90.0f32),
        (x + r,     y + h - r, 90.0f32,  180.0f32),
        (x + r,     y + r,     180.0f32, 270.0f32),
    ];

    for (cx, cy, start, end) in &corners {
        for i in 0..=SEGS {
            let t = i as f32 / SEGS as f32;
            let angle = (start + (end - start) * t).to_radians();
            pts.push((
                Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())),
                false,
            ));
        }
    }
    pts
}

fn fill_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
                     r: f32, color: (f32, f32, f32)) {
    layer.set_fill_color(rgb(color));
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    reset_colors(layer);
}

fn stroke_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
                       r: f32, color: (f32, f32, f32)) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.4);
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Stroke,
        winding_order: WindingOrder::NonZero,
    });
    reset_colors(layer);
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32,
              color: (f32, f32, f32)) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
    reset_colors(layer);
}

/// Left-to-right gradient drawn as `steps` vertical strips.
#[allow(clippy::too_many_arguments)]
fn fill_gradient_h(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    from: (f32, f32, f32),
    to: (f32, f32, f32),
    steps: usize,
) {
    let step_w = w / steps as f32;
    for i in 0..steps {
        let t = i as f32 / (steps - 1).max(1) as f32;
        let color = (
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
            from.2 + (to.2 - from.2) * t,
        );
        // Overlap strips slightly to prevent rounding gaps
        fill_rect(layer, x + i as f32 * step_w, y, step_w + 0.6, h, color);
    }
}

// ── Text helpers ──────────────────────────────────────────────────────────────

fn truncate(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max {
        format!("{}…", chars[..max - 1].iter().collect::<String>())
    } else {
        s.to_string()
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Clause numbers wrapped into lines, then "<N> finding(s)" as the final line.
fn format_index_list(indices: &[usize], max_chars: usize) -> Vec<String> {
    if indices.is_empty() {
        return vec!["—".to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for index in indices {
        let sep = if current.is_empty() { "" } else { ", " };
        let candidate = format!("{}#{}", sep, index);
        if !current.is_empty() && current.len() + candidate.len() > max_chars {
            lines.push(std::mem::take(&mut current));
            current = format!("#{}", index);
        } else {
            current.push_str(&candidate);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.push(format!(
        "{} finding{}",
        indices.len(),
        if indices.len() == 1 { "" } else { "s" }
    ));
    lines
}

fn severity_list(severities: &[Severity]) -> String {
    if severities.is_empty() {
        return "none".to_string();
    }
    severities
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Current UTC date as `YYYY-MM-DD`.
fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
