//! Error type for `registrar-batch`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A register PDF has no side-car `.json`; the document is skipped.
  #[error("no side-car metadata for {}", pdf.display())]
  MissingMetadata { pdf: PathBuf },

  #[error("malformed side-car metadata at {}: {source}", path.display())]
  MalformedMetadata {
    path:   PathBuf,
    source: serde_json::Error,
  },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("pdf error: {0}")]
  Pdf(#[from] registrar_pdf::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend-specific store error.
  pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(err))
  }

  pub fn is_missing_metadata(&self) -> bool {
    matches!(self, Self::MissingMetadata { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
