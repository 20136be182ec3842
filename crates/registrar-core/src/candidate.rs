//! Candidate rows — the strongly-typed product of text extraction.
//!
//! A candidate row carries everything parsed from one student's block of
//! register text, before cropping and persistence. Identity fields (seat
//! number, ERN) are guaranteed present and well-formed; every other field
//! is optional, with a low-confidence flag recorded when parsing failed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{Ern, ExamResult, Gender, NewExamRecord, StudentStatus};

/// A non-identity field of a candidate row, used in low-confidence flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowField {
  Gender,
  Status,
  Result,
  College,
}

impl fmt::Display for RowField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Gender => "gender",
      Self::Status => "status",
      Self::Result => "result",
      Self::College => "college",
    };
    f.write_str(s)
  }
}

/// One student's parsed fields from a register page.
#[derive(Debug, Clone)]
pub struct CandidateRow {
  /// 1-indexed page number in the source PDF.
  pub page_number:    u32,
  /// 0-based position of this student within the page's fixed layout.
  pub ordinal:        usize,
  pub seat_no:        String,
  pub ern:            Ern,
  pub name:           String,
  pub first_name:     Option<String>,
  pub gender:         Option<Gender>,
  pub status:         Option<StudentStatus>,
  pub result:         Option<ExamResult>,
  pub college_code:   Option<String>,
  pub college_name:   Option<String>,
  /// Fields that could not be unambiguously parsed and were left `None`.
  pub low_confidence: Vec<RowField>,
}

impl CandidateRow {
  pub fn is_low_confidence(&self) -> bool {
    !self.low_confidence.is_empty()
  }

  /// Pair this row with its crop artifact path (or `None` if the crop
  /// failed) to form a record ready for ingestion.
  pub fn into_record(self, pdf_file: Option<String>) -> NewExamRecord {
    NewExamRecord {
      ern:          self.ern,
      name:         self.name,
      first_name:   self.first_name,
      gender:       self.gender,
      seat_no:      self.seat_no,
      college_code: self.college_code,
      college_name: self.college_name,
      status:       self.status,
      result:       self.result,
      page_number:  self.page_number as i64,
      pdf_file,
    }
  }
}
