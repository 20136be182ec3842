//! The `ResultStore` trait and supporting types.
//!
//! Implemented by storage backends (e.g. `registrar-store-sqlite`). The
//! batch orchestrator and exporter depend on this abstraction, not on any
//! concrete backend. The handle is opened once at run start and passed in
//! explicitly; there is no ambient global session.

use std::future::Future;

use crate::{
  entity::{Examination, NewExamRecord, NewExamination, Program},
  export::{ExamStatistics, ExportRecord},
};

// ─── Receipts ────────────────────────────────────────────────────────────────

/// Outcome of ingesting one document's rows in a single transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentReceipt {
  /// Rows newly inserted into `student_exam_records`.
  pub inserted:   u64,
  /// Rows skipped because (ern, exam_id) already existed.
  pub duplicates: u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the relational result store.
///
/// All write paths are idempotent by natural key: re-running the pipeline
/// over the same inputs converges to the same store state. Writes for one
/// document are transactionally coherent — a partial failure never leaves a
/// record pointing at a missing student or examination.
pub trait ResultStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Lookup-or-insert a program by its code. Existing rows are returned
  /// unchanged; programs are never mutated once created.
  fn ensure_program(
    &self,
    program: Program,
  ) -> impl Future<Output = Result<Program, Self::Error>> + Send + '_;

  /// Resolve the examination for a source document, keyed by its PDF
  /// filename. A document processed twice maps to the same row; no update
  /// is performed on re-runs.
  fn ensure_examination(
    &self,
    new: NewExamination,
  ) -> impl Future<Output = Result<Examination, Self::Error>> + Send + '_;

  /// Ingest one document's resolved rows inside a single transaction.
  ///
  /// Per row: the student is created if absent (never overwritten), the
  /// (ern, exam_id) pair is checked for existence (duplicate → counted
  /// skip), and the record is inserted otherwise. Any constraint violation
  /// rolls the whole document back.
  fn ingest_rows(
    &self,
    exam_id: i64,
    rows: Vec<NewExamRecord>,
  ) -> impl Future<Output = Result<DocumentReceipt, Self::Error>> + Send + '_;

  /// The full denormalized projection, ordered by (ern, result_date,
  /// exam_id).
  fn export_records(
    &self,
  ) -> impl Future<Output = Result<Vec<ExportRecord>, Self::Error>> + Send + '_;

  /// Per-examination pass/fail roll-ups for the run summary.
  fn exam_statistics(
    &self,
  ) -> impl Future<Output = Result<Vec<ExamStatistics>, Self::Error>> + Send + '_;
}
