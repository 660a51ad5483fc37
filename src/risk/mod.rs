//! Clause segmentation and keyword/regex risk evaluation.
//!
//! - [`segmenter`] — splits raw text into clauses at sentence boundaries.
//! - [`rules`] — the independent [`rules::Rule`] heuristics.
//! - [`engine`] — runs every rule over every clause and keeps flagged clauses.
//! - [`grouping`] — folds findings into a [`GroupedReport`](crate::models::GroupedReport)
//!   and filters it by severity.

pub mod engine;
pub mod grouping;
pub mod rules;
pub mod segmenter;
