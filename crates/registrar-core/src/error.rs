//! Error types for `registrar-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid enrollment number: {0:?} (expected MU + 7 digits)")]
  InvalidErn(String),

  #[error("unknown student status token: {0:?}")]
  UnknownStatus(String),

  #[error("unknown result token: {0:?}")]
  UnknownResult(String),

  #[error("unknown gender token: {0:?}")]
  UnknownGender(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
