//! [`MetadataLoader`] — pairs each register PDF with its side-car JSON.
//!
//! The fetcher writes `<basename>.json` into the metadata directory for
//! every `<basename>.pdf` it downloads. A register without a side-car
//! cannot be attributed to a program, so it is skipped with
//! [`Error::MissingMetadata`] rather than ingested half-blind.

use std::path::{Path, PathBuf};

use registrar_core::metadata::ExamMetadata;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct MetadataLoader {
  dir: PathBuf,
}

impl MetadataLoader {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  /// The side-car path for a register PDF.
  pub fn sidecar_path(&self, pdf_path: &Path) -> PathBuf {
    let mut name = pdf_path.file_stem().unwrap_or_default().to_os_string();
    name.push(".json");
    self.dir.join(name)
  }

  /// Load the metadata for `pdf_path`, or [`Error::MissingMetadata`] if no
  /// side-car exists.
  pub fn load(&self, pdf_path: &Path) -> Result<ExamMetadata> {
    let sidecar = self.sidecar_path(pdf_path);
    if !sidecar.exists() {
      return Err(Error::MissingMetadata { pdf: pdf_path.to_path_buf() });
    }

    let raw = std::fs::read_to_string(&sidecar)?;
    serde_json::from_str(&raw)
      .map_err(|source| Error::MalformedMetadata { path: sidecar, source })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn loads_sidecar_next_to_pdf_basename() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
      dir.path().join("sem5_nov23.json"),
      r#"{"program_code":"B2068","program_name":"B.Sc. (IT)","semester":"V"}"#,
    )
    .unwrap();

    let loader = MetadataLoader::new(dir.path());
    let meta = loader.load(Path::new("/downloads/sem5_nov23.pdf")).unwrap();
    assert_eq!(meta.program_code, "B2068");
    assert_eq!(meta.semester.as_deref(), Some("V"));
    assert_eq!(meta.result_date, None);
  }

  #[test]
  fn missing_sidecar_is_a_skip_not_a_crash() {
    let dir = tempfile::tempdir().unwrap();
    let loader = MetadataLoader::new(dir.path());

    let err = loader.load(Path::new("/downloads/orphan.pdf")).unwrap_err();
    assert!(err.is_missing_metadata());
  }

  #[test]
  fn malformed_sidecar_is_reported_with_its_path() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();

    let loader = MetadataLoader::new(dir.path());
    let err = loader.load(Path::new("/downloads/bad.pdf")).unwrap_err();
    match err {
      Error::MalformedMetadata { path, .. } => {
        assert!(path.ends_with("bad.json"));
      }
      other => panic!("unexpected error: {other:?}"),
    }
  }
}
