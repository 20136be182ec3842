//! Region cropping — fixed-coordinate isolation of one student's block.
//!
//! The register lays students out in fixed vertical bands spanning the
//! full page width. The band table is configuration data determined from
//! layout analysis of sample registers, not inferred at runtime; observed
//! layouts may shift, so the table is deserialisable from JSON and
//! overridable per run.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use registrar_core::entity::Ern;

use crate::{
  error::{Error, Result},
  reader::RegisterPdf,
};

// ─── Band table ──────────────────────────────────────────────────────────────

/// A vertical slice of the page, in PDF points from the top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
  pub top:    f64,
  pub bottom: f64,
}

/// Ordinal → band lookup table.
///
/// The default ships only the two bands verified against real registers.
/// A third position has been reported but never confirmed, so it is not in
/// the default table; supply a custom table once its coordinates are
/// verified against real layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropTable {
  bands: Vec<Band>,
  /// When a page holds a single student, its block runs deeper than the
  /// first band of a two-student page.
  #[serde(default)]
  single_student_bottom: Option<f64>,
}

impl Default for CropTable {
  fn default() -> Self {
    Self {
      bands:                 vec![
        Band { top: 91.0, bottom: 294.0 },
        Band { top: 294.0, bottom: 497.0 },
      ],
      single_student_bottom: Some(326.0),
    }
  }
}

impl CropTable {
  /// Load a replacement table from a JSON file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
  }

  pub fn len(&self) -> usize {
    self.bands.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bands.is_empty()
  }

  /// The band for a student ordinal, given how many students share the
  /// page. Ordinals beyond the table are [`Error::CropOutOfBounds`].
  pub fn band(&self, ordinal: usize, students_on_page: usize) -> Result<Band> {
    let Some(&band) = self.bands.get(ordinal) else {
      return Err(Error::CropOutOfBounds {
        ordinal,
        table_len: self.bands.len(),
      });
    };
    if students_on_page == 1
      && ordinal == 0
      && let Some(bottom) = self.single_student_bottom
    {
      return Ok(Band { top: band.top, bottom });
    }
    Ok(band)
  }
}

// ─── Artifact naming ─────────────────────────────────────────────────────────

/// Deterministic artifact filename: `{ERN}_{FirstName}_{ExaminationID}.pdf`.
///
/// Deterministic so that re-runs overwrite rather than accumulate. The
/// first name is reduced to ASCII alphanumerics for filesystem safety.
pub fn artifact_filename(ern: &Ern, first_name: Option<&str>, exam_id: i64) -> String {
  let first: String = first_name
    .unwrap_or("")
    .chars()
    .filter(|c| c.is_ascii_alphanumeric())
    .collect();
  let first = if first.is_empty() { "UNKNOWN".to_string() } else { first };
  format!("{ern}_{first}_{exam_id}.pdf")
}

// ─── Cropper ─────────────────────────────────────────────────────────────────

/// Materializes a single-student, single-page PDF from a fixed band of a
/// register page, via `pdftocairo -pdf`.
#[derive(Debug, Clone, Default)]
pub struct RegionCropper {
  table: CropTable,
}

impl RegionCropper {
  pub fn new(table: CropTable) -> Self {
    Self { table }
  }

  pub fn table(&self) -> &CropTable {
    &self.table
  }

  /// Crop one student's band from `page_number` (1-indexed) of `pdf` into
  /// `dest`. An existing `dest` is overwritten — re-runs converge on the
  /// same artifact set. The source document is not touched.
  pub async fn crop_student(
    &self,
    pdf: &RegisterPdf,
    page_number: u32,
    ordinal: usize,
    students_on_page: usize,
    dest: &Path,
  ) -> Result<()> {
    if page_number == 0 || page_number > pdf.page_count() {
      return Err(Error::PageOutOfRange {
        page:  page_number,
        count: pdf.page_count(),
      });
    }
    let band = self.table.band(ordinal, students_on_page)?;

    let width = pdf.page_width().ceil() as i64;
    let height = (band.bottom - band.top).ceil() as i64;
    let top = band.top.floor() as i64;
    let page_arg = page_number.to_string();

    debug!(
      page = page_number,
      ordinal,
      y = top,
      h = height,
      dest = %dest.display(),
      "cropping student band"
    );

    let output = Command::new("pdftocairo")
      .arg("-pdf")
      .args(["-f", &page_arg, "-l", &page_arg])
      .args(["-x", "0", "-y", &top.to_string()])
      .args(["-W", &width.to_string(), "-H", &height.to_string()])
      .args(["-paperw", &width.to_string(), "-paperh", &height.to_string()])
      .arg(pdf.path())
      .arg(dest)
      .output()
      .await?;
    if !output.status.success() {
      return Err(Error::CommandFailed {
        tool:   "pdftocairo",
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
      });
    }
    Ok(())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn default_table_has_two_verified_bands() {
    let table = CropTable::default();
    assert_eq!(table.len(), 2);
    assert_eq!(table.band(0, 2).unwrap(), Band { top: 91.0, bottom: 294.0 });
    assert_eq!(table.band(1, 2).unwrap(), Band { top: 294.0, bottom: 497.0 });
  }

  #[test]
  fn single_student_page_extends_first_band() {
    let table = CropTable::default();
    assert_eq!(table.band(0, 1).unwrap(), Band { top: 91.0, bottom: 326.0 });
    // Only the first ordinal is affected.
    assert_eq!(table.band(1, 1).unwrap(), Band { top: 294.0, bottom: 497.0 });
  }

  #[test]
  fn third_ordinal_is_out_of_bounds_by_default() {
    // A page holds ordinals 0 and 1; asking for ordinal 2 must fail
    // rather than produce a blank artifact.
    let err = CropTable::default().band(2, 2).unwrap_err();
    assert!(err.is_crop_out_of_bounds());
    match err {
      Error::CropOutOfBounds { ordinal, table_len } => {
        assert_eq!(ordinal, 2);
        assert_eq!(table_len, 2);
      }
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[test]
  fn table_loads_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
      file,
      r#"{{"bands":[{{"top":90.0,"bottom":290.0}},{{"top":290.0,"bottom":490.0}},{{"top":490.0,"bottom":690.0}}]}}"#
    )
    .unwrap();

    let table = CropTable::from_path(file.path()).unwrap();
    assert_eq!(table.len(), 3);
    // No single-student extension configured: band 0 is unchanged.
    assert_eq!(table.band(0, 1).unwrap(), Band { top: 90.0, bottom: 290.0 });
    assert_eq!(table.band(2, 3).unwrap(), Band { top: 490.0, bottom: 690.0 });
  }

  #[test]
  fn artifact_filenames_are_deterministic() {
    let ern = Ern::parse("MU1053822").unwrap();
    assert_eq!(
      artifact_filename(&ern, Some("SHARMA"), 7),
      "MU1053822_SHARMA_7.pdf"
    );
    // Same inputs, same name — re-runs overwrite.
    assert_eq!(
      artifact_filename(&ern, Some("SHARMA"), 7),
      artifact_filename(&ern, Some("SHARMA"), 7)
    );
  }

  #[test]
  fn artifact_filename_sanitizes_first_name() {
    let ern = Ern::parse("MU1053822").unwrap();
    assert_eq!(
      artifact_filename(&ern, Some("D'SOUZA"), 3),
      "MU1053822_DSOUZA_3.pdf"
    );
    assert_eq!(artifact_filename(&ern, None, 3), "MU1053822_UNKNOWN_3.pdf");
  }
}
