//! [`BatchOrchestrator`] — drives the whole pipeline over a directory of
//! register PDFs.
//!
//! Failure isolation is layered: a rejected row is counted and dropped, a
//! failed crop leaves the record without an artifact, and a failed document
//! is skipped without touching the rest of the run. Only an unreachable
//! store is fatal, and that is the caller's problem (the handle is opened
//! before the run starts).

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use registrar_core::{
  candidate::CandidateRow,
  dates::normalize_date,
  entity::{NewExamination, Program},
  metadata::ExamMetadata,
  store::ResultStore,
};
use registrar_extract::{
  RegisterMetadata, RowOutcome, extract_page_rows, extract_register_metadata,
};
use registrar_pdf::{RegionCropper, RegisterPdf, artifact_filename};

use crate::{
  error::{Error, Result},
  metadata::MetadataLoader,
};

// ─── Run statistics ──────────────────────────────────────────────────────────

/// Counters accumulated over one batch run, reported in the final summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
  pub documents_processed: u64,
  pub documents_skipped:   u64,
  pub rows_ingested:       u64,
  pub duplicate_rows:      u64,
  pub rows_rejected:       u64,
  pub low_confidence_rows: u64,
  pub crop_failures:       u64,
}

// ─── Directory enumeration ───────────────────────────────────────────────────

/// All `*.pdf` files directly under `dir`, sorted by file name so runs are
/// deterministic.
pub fn enumerate_registers(dir: &Path) -> Result<Vec<PathBuf>> {
  let mut pdfs: Vec<PathBuf> = std::fs::read_dir(dir)?
    .filter_map(|entry| entry.ok())
    .map(|entry| entry.path())
    .filter(|path| {
      path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    })
    .collect();
  pdfs.sort();
  Ok(pdfs)
}

// ─── Examination assembly ────────────────────────────────────────────────────

/// Combine side-car metadata with what the register's cover page says.
/// The side-car wins wherever both speak; register extraction fills gaps.
fn assemble_examination(
  meta: ExamMetadata,
  register: RegisterMetadata,
  pdf_filename: String,
) -> NewExamination {
  NewExamination {
    program_code: meta.program_code,
    semester: meta.semester,
    exam_type: meta.exam_type,
    exam_title: meta.exam_title.or(register.exam_title),
    exam_month: meta.exam_month.or(register.exam_month),
    exam_year: meta.exam_year.or(register.exam_year),
    result_date: meta.result_date.as_deref().map(normalize_date),
    declaration_date: meta
      .declaration_date
      .or(register.declaration_date)
      .as_deref()
      .map(normalize_date),
    pdf_filename,
    pdf_url: meta.pdf_url,
  }
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

pub struct BatchOrchestrator<S> {
  store:      S,
  metadata:   MetadataLoader,
  cropper:    RegionCropper,
  output_dir: PathBuf,
}

impl<S: ResultStore> BatchOrchestrator<S> {
  pub fn new(
    store: S,
    metadata: MetadataLoader,
    cropper: RegionCropper,
    output_dir: impl Into<PathBuf>,
  ) -> Self {
    Self {
      store,
      metadata,
      cropper,
      output_dir: output_dir.into(),
    }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  /// Process every register under `input_dir`. Per-document failures are
  /// logged and counted; the run itself only fails on setup problems.
  pub async fn run(&self, input_dir: &Path) -> Result<RunStats> {
    std::fs::create_dir_all(&self.output_dir)?;

    let registers = enumerate_registers(input_dir)?;
    info!(count = registers.len(), dir = %input_dir.display(), "starting batch run");

    let mut stats = RunStats::default();
    for pdf_path in &registers {
      match self.process_document(pdf_path, &mut stats).await {
        Ok(()) => stats.documents_processed += 1,
        Err(err) if err.is_missing_metadata() => {
          warn!(document = %pdf_path.display(), "no side-car metadata; skipping");
          stats.documents_skipped += 1;
        }
        Err(err) => {
          warn!(document = %pdf_path.display(), %err, "document failed; skipping");
          stats.documents_skipped += 1;
        }
      }
    }

    Ok(stats)
  }

  async fn process_document(
    &self,
    pdf_path: &Path,
    stats: &mut RunStats,
  ) -> Result<()> {
    let filename = pdf_path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default();

    let meta = self.metadata.load(pdf_path)?;
    let pdf = RegisterPdf::open(pdf_path).await?;

    let cover = pdf.page_text(1).await?;
    let register_meta = extract_register_metadata(&cover);

    // Collect candidate rows page by page. The page's row count matters to
    // the cropper, so rows stay grouped until after cropping.
    let mut pages: Vec<(u32, Vec<CandidateRow>)> = Vec::new();
    for page in 1..=pdf.page_count() {
      let text = if page == 1 {
        cover.clone()
      } else {
        pdf.page_text(page).await?
      };

      let mut rows = Vec::new();
      for outcome in extract_page_rows(&text, page) {
        match outcome {
          RowOutcome::Row(row) => {
            if row.is_low_confidence() {
              stats.low_confidence_rows += 1;
              warn!(
                document = %filename,
                page,
                ordinal = row.ordinal,
                fields = ?row.low_confidence,
                "row parsed with low-confidence fields"
              );
            }
            rows.push(row);
          }
          RowOutcome::Rejected(rejected) => {
            stats.rows_rejected += 1;
            warn!(
              document = %filename,
              page = rejected.page_number,
              ordinal = rejected.ordinal,
              anomaly = %rejected.anomaly,
              "row rejected"
            );
          }
        }
      }
      if !rows.is_empty() {
        pages.push((page, rows));
      }
    }

    let program = self
      .store
      .ensure_program(Program {
        program_code: meta.program_code.clone(),
        program_name: meta.program_name.clone(),
      })
      .await
      .map_err(Error::store)?;
    let exam = self
      .store
      .ensure_examination(assemble_examination(
        meta,
        register_meta,
        filename.clone(),
      ))
      .await
      .map_err(Error::store)?;

    let mut records = Vec::new();
    for (page, rows) in pages {
      let students_on_page = rows.len();
      for row in rows {
        let artifact =
          match self.crop_row(&pdf, &row, students_on_page, exam.id).await {
            Ok(path) => Some(path),
            Err(err) => {
              stats.crop_failures += 1;
              warn!(
                document = %filename,
                page,
                ordinal = row.ordinal,
                %err,
                "crop failed; record kept without artifact"
              );
              None
            }
          };
        records.push(row.into_record(artifact));
      }
    }

    let receipt = self
      .store
      .ingest_rows(exam.id, records)
      .await
      .map_err(Error::store)?;
    stats.rows_ingested += receipt.inserted;
    stats.duplicate_rows += receipt.duplicates;

    info!(
      document = %filename,
      exam_id = exam.id,
      program = %program.program_code,
      inserted = receipt.inserted,
      duplicates = receipt.duplicates,
      "document ingested"
    );
    Ok(())
  }

  async fn crop_row(
    &self,
    pdf: &RegisterPdf,
    row: &CandidateRow,
    students_on_page: usize,
    exam_id: i64,
  ) -> registrar_pdf::Result<String> {
    let dest = self.output_dir.join(artifact_filename(
      &row.ern,
      row.first_name.as_deref(),
      exam_id,
    ));
    self
      .cropper
      .crop_student(pdf, row.page_number, row.ordinal, students_on_page, &dest)
      .await?;
    Ok(dest.to_string_lossy().into_owned())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn enumeration_is_sorted_and_pdf_only() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b_sem6.pdf", "a_sem5.pdf", "notes.txt", "c_sem1.PDF"] {
      std::fs::write(dir.path().join(name), b"").unwrap();
    }

    let names: Vec<String> = enumerate_registers(dir.path())
      .unwrap()
      .into_iter()
      .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
      .collect();
    assert_eq!(names, ["a_sem5.pdf", "b_sem6.pdf", "c_sem1.PDF"]);
  }

  #[test]
  fn sidecar_fields_win_over_register_extraction() {
    let meta = ExamMetadata {
      program_code:     "B2068".into(),
      program_name:     "B.Sc. (IT)".into(),
      semester:         Some("V".into()),
      exam_type:        Some("Regular".into()),
      result_date:      Some("2024-01-08".into()),
      declaration_date: None,
      pdf_url:          None,
      exam_title:       Some("B.Sc. (IT) Semester V".into()),
      exam_month:       None,
      exam_year:        None,
    };
    let register = RegisterMetadata {
      exam_title:       Some("SOMETHING ELSE".into()),
      exam_month:       Some("NOVEMBER".into()),
      exam_year:        Some(2023),
      declaration_date: Some("January 8, 2024".into()),
    };

    let exam = assemble_examination(meta, register, "sem5.pdf".into());
    assert_eq!(exam.exam_title.as_deref(), Some("B.Sc. (IT) Semester V"));
    assert_eq!(exam.exam_month.as_deref(), Some("NOVEMBER"));
    assert_eq!(exam.exam_year, Some(2023));
    // Register prose dates are normalized to ISO on the way in.
    assert_eq!(exam.declaration_date.as_deref(), Some("2024-01-08"));
    assert_eq!(exam.pdf_filename, "sem5.pdf");
  }
}
