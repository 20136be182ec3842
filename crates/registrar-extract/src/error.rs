//! Anomaly types for register text extraction.
//!
//! These are values inspected by the orchestrator, not errors propagated
//! with `?` — a bad row never aborts its page or document.

use thiserror::Error;

/// Why a student block was rejected outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Anomaly {
  /// No line matched the full seat pattern: a 9-character seat token,
  /// then an uppercase name, then a status or gender keyword delimiting
  /// the name. Raised when the seat line is absent outright and also
  /// when the name runs undelimited into the rest of the row.
  #[error("no well-formed seat line found in block")]
  MalformedSeatLine,

  #[error("unparseable seat number: {0:?}")]
  InvalidSeatNo(String),

  #[error("no enrollment number found in block")]
  MissingErn,

  #[error("unparseable enrollment number: {0:?}")]
  InvalidErn(String),
}

/// A rejected row, located well enough to diagnose from the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAnomaly {
  /// 1-indexed page number in the source PDF.
  pub page_number: u32,
  /// 0-based position of the block within the page.
  pub ordinal:     usize,
  pub anomaly:     Anomaly,
}
