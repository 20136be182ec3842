//! Side-car metadata — the examination identity attached to each source PDF.
//!
//! The fetcher deposits `<basename>.pdf` plus `<basename>.json` next to it.
//! The JSON carries identity fields that never appear in the document body
//! (program code, result date, download URL). Fields the register itself can
//! supply (title, month, year, declaration date) are optional here and are
//! filled from extraction when absent.

use serde::{Deserialize, Serialize};

/// The side-car JSON written by the fetcher, one per register PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamMetadata {
  pub program_code:     String,
  pub program_name:     String,
  #[serde(default)]
  pub semester:         Option<String>,
  #[serde(default)]
  pub exam_type:        Option<String>,
  #[serde(default)]
  pub result_date:      Option<String>,
  #[serde(default)]
  pub declaration_date: Option<String>,
  #[serde(default)]
  pub pdf_url:          Option<String>,
  #[serde(default)]
  pub exam_title:       Option<String>,
  #[serde(default)]
  pub exam_month:       Option<String>,
  #[serde(default)]
  pub exam_year:        Option<i64>,
}
