//! Entities persisted by the relational store.
//!
//! Four tables: programs, examinations, students, student_exam_records.
//! Programs and students are append-only and deduplicated by natural key;
//! examinations are keyed by source PDF filename for re-run identity;
//! exam records carry the (student, examination) fact row.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Enrollment number ───────────────────────────────────────────────────────

/// A university enrollment number: `MU` followed by exactly 7 digits.
///
/// The student's natural key. Constructed only through [`Ern::parse`], so a
/// held `Ern` is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ern(String);

impl Ern {
  pub fn parse(raw: &str) -> Result<Self> {
    let rest = raw
      .strip_prefix("MU")
      .ok_or_else(|| Error::InvalidErn(raw.to_string()))?;
    if rest.len() == 7 && rest.bytes().all(|b| b.is_ascii_digit()) {
      Ok(Self(raw.to_string()))
    } else {
      Err(Error::InvalidErn(raw.to_string()))
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Ern {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Register vocabulary ─────────────────────────────────────────────────────

/// The attempt status printed beside a student's name on the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudentStatus {
  Regular,
  Repeater,
  #[serde(rename = "ATKT")]
  Atkt,
  #[serde(rename = "Ex-Student")]
  ExStudent,
}

impl StudentStatus {
  /// The literal token as printed on the register (and stored in SQLite).
  pub fn as_token(self) -> &'static str {
    match self {
      Self::Regular => "Regular",
      Self::Repeater => "Repeater",
      Self::Atkt => "ATKT",
      Self::ExStudent => "Ex-Student",
    }
  }

  pub fn from_token(token: &str) -> Result<Self> {
    match token {
      "Regular" => Ok(Self::Regular),
      "Repeater" => Ok(Self::Repeater),
      "ATKT" => Ok(Self::Atkt),
      "Ex-Student" => Ok(Self::ExStudent),
      other => Err(Error::UnknownStatus(other.to_string())),
    }
  }
}

/// Overall outcome of the examination sitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExamResult {
  Pass,
  Fail,
}

impl ExamResult {
  pub fn as_token(self) -> &'static str {
    match self {
      Self::Pass => "PASS",
      Self::Fail => "FAIL",
    }
  }

  pub fn from_token(token: &str) -> Result<Self> {
    match token {
      "PASS" => Ok(Self::Pass),
      "FAIL" => Ok(Self::Fail),
      other => Err(Error::UnknownResult(other.to_string())),
    }
  }
}

/// Stored as the single letter `M` / `F` (original register prints the
/// full word; the store keeps the initial).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
  #[serde(rename = "M")]
  Male,
  #[serde(rename = "F")]
  Female,
}

impl Gender {
  pub fn as_letter(self) -> &'static str {
    match self {
      Self::Male => "M",
      Self::Female => "F",
    }
  }

  pub fn from_letter(letter: &str) -> Result<Self> {
    match letter {
      "M" => Ok(Self::Male),
      "F" => Ok(Self::Female),
      other => Err(Error::UnknownGender(other.to_string())),
    }
  }
}

// ─── Programs ────────────────────────────────────────────────────────────────

/// An academic program. Created on first sight, reused thereafter; never
/// mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
  pub program_code: String,
  pub program_name: String,
}

// ─── Examinations ────────────────────────────────────────────────────────────

/// One examination session, corresponding to one source register PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Examination {
  pub id:               i64,
  pub program_code:     String,
  pub semester:         Option<String>,
  pub exam_type:        Option<String>,
  pub exam_title:       Option<String>,
  pub exam_month:       Option<String>,
  pub exam_year:        Option<i64>,
  pub result_date:      Option<String>,
  pub declaration_date: Option<String>,
  /// Basename of the source register PDF — the re-run identity key.
  pub pdf_filename:     String,
  pub pdf_url:          Option<String>,
}

/// An examination about to be persisted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewExamination {
  pub program_code:     String,
  pub semester:         Option<String>,
  pub exam_type:        Option<String>,
  pub exam_title:       Option<String>,
  pub exam_month:       Option<String>,
  pub exam_year:        Option<i64>,
  pub result_date:      Option<String>,
  pub declaration_date: Option<String>,
  pub pdf_filename:     String,
  pub pdf_url:          Option<String>,
}

// ─── Students ────────────────────────────────────────────────────────────────

/// Student identity row, keyed by ERN. First occurrence creates it; later
/// occurrences across examinations never overwrite name or gender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
  pub ern:        Ern,
  pub name:       String,
  pub first_name: Option<String>,
  pub gender:     Option<Gender>,
}

// ─── Exam records ────────────────────────────────────────────────────────────

/// The fact row: one per (student, examination), enforced by a unique key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentExamRecord {
  pub id:           i64,
  pub student_ern:  Ern,
  pub exam_id:      i64,
  pub seat_no:      String,
  pub college_code: Option<String>,
  pub college_name: Option<String>,
  pub status:       Option<StudentStatus>,
  pub result:       Option<ExamResult>,
  pub page_number:  i64,
  /// Path to the cropped single-student PDF, if the crop succeeded.
  pub pdf_file:     Option<String>,
}

/// A fully resolved row ready for ingestion: student identity plus the
/// per-examination fields and the crop artifact path (if any).
#[derive(Debug, Clone)]
pub struct NewExamRecord {
  pub ern:          Ern,
  pub name:         String,
  pub first_name:   Option<String>,
  pub gender:       Option<Gender>,
  pub seat_no:      String,
  pub college_code: Option<String>,
  pub college_name: Option<String>,
  pub status:       Option<StudentStatus>,
  pub result:       Option<ExamResult>,
  pub page_number:  i64,
  pub pdf_file:     Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ern_accepts_mu_plus_seven_digits() {
    let ern = Ern::parse("MU1234567").unwrap();
    assert_eq!(ern.as_str(), "MU1234567");
  }

  #[test]
  fn ern_rejects_wrong_shapes() {
    assert!(Ern::parse("MU123456").is_err()); // six digits
    assert!(Ern::parse("MU12345678").is_err()); // eight digits
    assert!(Ern::parse("XX1234567").is_err()); // wrong prefix
    assert!(Ern::parse("MU12345A7").is_err()); // non-digit
  }

  #[test]
  fn status_tokens_round_trip() {
    for status in [
      StudentStatus::Regular,
      StudentStatus::Repeater,
      StudentStatus::Atkt,
      StudentStatus::ExStudent,
    ] {
      assert_eq!(StudentStatus::from_token(status.as_token()).unwrap(), status);
    }
    assert!(StudentStatus::from_token("Visiting").is_err());
  }
}
