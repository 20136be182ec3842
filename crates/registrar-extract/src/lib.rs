//! Register text extraction for the registrar pipeline.
//!
//! Turns a register page's raw text into strongly-typed candidate rows.
//! Pure and synchronous; no PDF, database, or process dependencies — the
//! caller supplies per-page text (see `registrar-pdf`).
//!
//! Pipeline:
//!   page text
//!     └─ is_student_data_page()   → skip index/cover pages
//!          └─ split_student_blocks() → one text block per student
//!               └─ parse_candidate()  → RowOutcome (row or anomaly)

pub mod error;
mod parse;
mod register;

pub use error::{Anomaly, RowAnomaly};
pub use parse::{extract_page_rows, is_student_data_page};
pub use register::{RegisterMetadata, extract_register_metadata};

use registrar_core::candidate::CandidateRow;

/// The anchor token that marks a page as carrying tabular student data.
/// Pages without it are index/cover pages and are skipped, not errors.
pub const STUDENT_DATA_ANCHOR: &str = "SEAT NO";

/// The tagged result of parsing one student block.
///
/// Skipping a row is an explicit value, not a thrown error: the
/// orchestrator inspects the outcome and keeps counters.
#[derive(Debug)]
pub enum RowOutcome {
  /// Identity fields parsed cleanly; non-identity gaps are flagged on the
  /// row itself.
  Row(CandidateRow),
  /// Seat number or ERN was unparseable; the row is dropped.
  Rejected(RowAnomaly),
}
