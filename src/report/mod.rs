//! Report renderers for analysed documents.
//!
//! - [`terminal`] — coloured per-risk-type tables with a summary box; respects `--verbose` / `--quiet`.
//! - [`json`] — the `{summary, filtered_by, total_clauses}` export document.
//! - [`pdf`] — cover page, risk-type summary and a paginated findings table.

pub mod json;
pub mod pdf;
pub mod terminal;
