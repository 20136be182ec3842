//! Error type for `registrar-pdf`.

use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("{tool} exited with {status}: {stderr}")]
  CommandFailed {
    tool:   &'static str,
    status: ExitStatus,
    stderr: String,
  },

  #[error("could not parse {tool} output: {detail}")]
  MalformedOutput {
    tool:   &'static str,
    detail: String,
  },

  #[error("page {page} out of range (document has {count} pages)")]
  PageOutOfRange { page: u32, count: u32 },

  /// The ordinal has no rectangle in the crop table. Callers record the
  /// row without an artifact rather than aborting it.
  #[error("no crop rectangle for student ordinal {ordinal} (table has {table_len})")]
  CropOutOfBounds { ordinal: usize, table_len: usize },
}

impl Error {
  pub fn is_crop_out_of_bounds(&self) -> bool {
    matches!(self, Self::CropOutOfBounds { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
