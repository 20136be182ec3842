//! Row encoding/decoding between SQLite text columns and domain types.
//!
//! Enums are stored as their register tokens (`Regular`, `PASS`, `M`), so
//! the database stays readable with plain `sqlite3`. Decoding goes through
//! intermediate `Raw*` structs because `rusqlite` row closures cannot
//! return domain parse errors directly.

use registrar_core::{
  entity::{Ern, ExamResult, Examination, Gender, NewExamRecord, StudentStatus},
  export::ExportRecord,
};

use crate::Result;

// ─── Encoding ────────────────────────────────────────────────────────────────

/// The text-column image of a [`NewExamRecord`], precomputed so the whole
/// batch can move into the connection closure.
pub struct EncodedRecord {
  pub ern:          String,
  pub name:         String,
  pub first_name:   Option<String>,
  pub gender:       Option<&'static str>,
  pub seat_no:      String,
  pub college_code: Option<String>,
  pub college_name: Option<String>,
  pub status:       Option<&'static str>,
  pub result:       Option<&'static str>,
  pub page_number:  i64,
  pub pdf_file:     Option<String>,
}

impl From<NewExamRecord> for EncodedRecord {
  fn from(row: NewExamRecord) -> Self {
    Self {
      ern:          row.ern.as_str().to_owned(),
      name:         row.name,
      first_name:   row.first_name,
      gender:       row.gender.map(Gender::as_letter),
      seat_no:      row.seat_no,
      college_code: row.college_code,
      college_name: row.college_name,
      status:       row.status.map(StudentStatus::as_token),
      result:       row.result.map(ExamResult::as_token),
      page_number:  row.page_number,
      pdf_file:     row.pdf_file,
    }
  }
}

// ─── Decoding ────────────────────────────────────────────────────────────────

pub struct RawExamination {
  pub id:               i64,
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

impl From<RawExamination> for Examination {
  fn from(raw: RawExamination) -> Self {
    Self {
      id:               raw.id,
      program_code:     raw.program_code,
      semester:         raw.semester,
      exam_type:        raw.exam_type,
      exam_title:       raw.exam_title,
      exam_month:       raw.exam_month,
      exam_year:        raw.exam_year,
      result_date:      raw.result_date,
      declaration_date: raw.declaration_date,
      pdf_filename:     raw.pdf_filename,
      pdf_url:          raw.pdf_url,
    }
  }
}

pub struct RawExportRecord {
  pub ern:              String,
  pub name:             String,
  pub gender:           Option<String>,
  pub seat_no:          String,
  pub college_code:     Option<String>,
  pub college_name:     Option<String>,
  pub status:           Option<String>,
  pub result:           Option<String>,
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

impl RawExportRecord {
  pub fn into_record(self) -> Result<ExportRecord> {
    Ok(ExportRecord {
      ern:              Ern::parse(&self.ern)?,
      name:             self.name,
      gender:           self.gender.as_deref().map(Gender::from_letter).transpose()?,
      seat_no:          self.seat_no,
      college_code:     self.college_code,
      college_name:     self.college_name,
      status:           self
        .status
        .as_deref()
        .map(StudentStatus::from_token)
        .transpose()?,
      result:           self
        .result
        .as_deref()
        .map(ExamResult::from_token)
        .transpose()?,
      exam_id:          self.exam_id,
      exam_title:       self.exam_title,
      semester:         self.semester,
      exam_type:        self.exam_type,
      exam_month:       self.exam_month,
      exam_year:        self.exam_year,
      result_date:      self.result_date,
      declaration_date: self.declaration_date,
      page_number:      self.page_number,
      pdf_file:         self.pdf_file,
    })
  }
}
