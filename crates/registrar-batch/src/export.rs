//! JSON export writer.
//!
//! `students.json` is a derived view: regenerated in full from the store's
//! export query on every run, never appended to or patched.

use std::path::Path;

use registrar_core::export::ExportRecord;

use crate::error::Result;

/// Write the full export to `path`, replacing any previous file.
pub fn write_export(path: &Path, records: &[ExportRecord]) -> Result<()> {
  let json = serde_json::to_string_pretty(records)?;
  std::fs::write(path, json)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use registrar_core::entity::{Ern, ExamResult};

  use super::*;

  fn sample(ern: &str) -> ExportRecord {
    ExportRecord {
      ern:              Ern::parse(ern).unwrap(),
      name:             "SHARMA ANIL KUMAR".into(),
      gender:           None,
      seat_no:          "123456701".into(),
      college_code:     Some("MU-117".into()),
      college_name:     None,
      status:           None,
      result:           Some(ExamResult::Pass),
      exam_id:          1,
      exam_title:       None,
      semester:         Some("V".into()),
      exam_type:        None,
      exam_month:       None,
      exam_year:        None,
      result_date:      Some("2024-01-08".into()),
      declaration_date: None,
      page_number:      1,
      pdf_file:         None,
    }
  }

  #[test]
  fn export_overwrites_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.json");

    write_export(&path, &[sample("MU1000001"), sample("MU1000002")]).unwrap();
    write_export(&path, &[sample("MU1000003")]).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let records: Vec<ExportRecord> = serde_json::from_str(&raw).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ern.as_str(), "MU1000003");
    assert_eq!(records[0].result, Some(ExamResult::Pass));
  }
}
