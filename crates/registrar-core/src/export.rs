//! The denormalized export row — one flat record per exam record.
//!
//! A pure read-only projection of the store: exam-identity fields and
//! per-student fields inlined, regenerated in full on every export. Never a
//! source of truth.

use serde::{Deserialize, Serialize};

use crate::entity::{Ern, ExamResult, Gender, StudentStatus};

/// One row of `students.json`: the natural join of all four tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRecord {
  pub ern:              Ern,
  pub name:             String,
  pub gender:           Option<Gender>,
  pub seat_no:          String,
  pub college_code:     Option<String>,
  pub college_name:     Option<String>,
  pub status:           Option<StudentStatus>,
  pub result:           Option<ExamResult>,
  pub exam_id:          i64,
  pub exam_title:       Option<String>,
  pub semester:         Option<String>,
  pub exam_type:        Option<String>,
  pub exam_month:       Option<String>,
  pub exam_year:        Option<i64>,
  pub result_date:      Option<String>,
  pub declaration_date: Option<String>,
  pub page_number:      i64,
  pub pdf_file:         Option<String>,
}

/// Pass/fail roll-up for one examination, shown in the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct ExamStatistics {
  pub exam_id:         i64,
  pub exam_title:      Option<String>,
  pub semester:        Option<String>,
  pub exam_type:       Option<String>,
  pub total_students:  i64,
  pub passed:          i64,
  pub failed:          i64,
  pub pass_percentage: f64,
}
