//! [`RegisterPdf`] — read-only access to a source register document.
//!
//! Page count and geometry come from `pdfinfo`; per-page text from
//! `pdftotext -layout` (layout mode keeps the register's columnar field
//! order intact, which the extractor's positional parsing relies on).

use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::error::{Error, Result};

/// A register PDF plus the geometry probed from it at open time.
#[derive(Debug, Clone)]
pub struct RegisterPdf {
  path:        PathBuf,
  page_count:  u32,
  page_width:  f64,
  page_height: f64,
}

impl RegisterPdf {
  /// Probe `path` with `pdfinfo`. Fails if the tool fails or its output
  /// carries no `Pages:` / `Page size:` lines.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let output = Command::new("pdfinfo").arg(&path).output().await?;
    if !output.status.success() {
      return Err(Error::CommandFailed {
        tool:   "pdfinfo",
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
      });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let page_count = parse_page_count(&stdout)?;
    let (page_width, page_height) = parse_page_size(&stdout)?;

    Ok(Self { path, page_count, page_width, page_height })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn page_count(&self) -> u32 {
    self.page_count
  }

  pub fn page_width(&self) -> f64 {
    self.page_width
  }

  pub fn page_height(&self) -> f64 {
    self.page_height
  }

  /// Extract the text of one page (1-indexed) in layout mode.
  pub async fn page_text(&self, page_number: u32) -> Result<String> {
    if page_number == 0 || page_number > self.page_count {
      return Err(Error::PageOutOfRange {
        page:  page_number,
        count: self.page_count,
      });
    }

    let page_arg = page_number.to_string();
    let output = Command::new("pdftotext")
      .arg("-layout")
      .args(["-f", &page_arg, "-l", &page_arg])
      .arg(&self.path)
      .arg("-")
      .output()
      .await?;
    if !output.status.success() {
      return Err(Error::CommandFailed {
        tool:   "pdftotext",
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
      });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
  }
}

// ─── pdfinfo output parsing ──────────────────────────────────────────────────

fn parse_page_count(stdout: &str) -> Result<u32> {
  for line in stdout.lines() {
    if let Some(rest) = line.strip_prefix("Pages:") {
      return rest.trim().parse().map_err(|_| Error::MalformedOutput {
        tool:   "pdfinfo",
        detail: format!("bad Pages line: {line:?}"),
      });
    }
  }
  Err(Error::MalformedOutput {
    tool:   "pdfinfo",
    detail: "no Pages: line".to_string(),
  })
}

/// Parse `Page size:      770 x 600 pts` into (width, height).
fn parse_page_size(stdout: &str) -> Result<(f64, f64)> {
  for line in stdout.lines() {
    let Some(rest) = line.strip_prefix("Page size:") else {
      continue;
    };
    let mut parts = rest.split_whitespace();
    let (Some(w), Some(x), Some(h)) = (parts.next(), parts.next(), parts.next())
    else {
      break;
    };
    if x != "x" {
      break;
    }
    if let (Ok(w), Ok(h)) = (w.parse(), h.parse()) {
      return Ok((w, h));
    }
    break;
  }
  Err(Error::MalformedOutput {
    tool:   "pdfinfo",
    detail: "no parseable Page size: line".to_string(),
  })
}
