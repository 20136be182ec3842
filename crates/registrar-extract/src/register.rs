//! Register-level metadata extraction from the cover page.
//!
//! The first page carries the office-register title line, which encodes the
//! month/year the examination was held, plus (sometimes) a declaration
//! date. These fill gaps the side-car metadata leaves open.

use std::sync::LazyLock;

use regex::Regex;

static TITLE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"OFFICE REGISTER FOR THE (.+)").unwrap());

static HELD_IN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"HELD IN (\w+)\s+(\d{4})").unwrap());

static DECLARATION: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"Declaration Date:\s*(\w+\s+\d{1,2},\s+\d{4})").unwrap());

/// Metadata parsed out of the register's first page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterMetadata {
  pub exam_title:       Option<String>,
  pub exam_month:       Option<String>,
  pub exam_year:        Option<i64>,
  pub declaration_date: Option<String>,
}

/// Parse the title line and declaration date from first-page text.
/// Everything is best-effort; a cover page in an unknown layout simply
/// yields an empty result.
pub fn extract_register_metadata(first_page_text: &str) -> RegisterMetadata {
  let mut meta = RegisterMetadata::default();

  for line in first_page_text.lines() {
    if meta.exam_title.is_none()
      && let Some(caps) = TITLE.captures(line)
    {
      meta.exam_title = Some(caps[1].trim().to_string());
      if let Some(held) = HELD_IN.captures(line) {
        meta.exam_month = Some(held[1].to_string());
        meta.exam_year = held[2].parse().ok();
      }
    }

    if meta.declaration_date.is_none()
      && let Some(caps) = DECLARATION.captures(line)
    {
      meta.declaration_date = Some(caps[1].to_string());
    }
  }

  meta
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_title_month_and_year() {
    let text = "UNIVERSITY OF MUMBAI\n\
      OFFICE REGISTER FOR THE Bachelor of Commerce (Semester - III) (NEP 2020) REGULAR EXAMINATION HELD IN DECEMBER 2025\n\
      Declaration Date: January 15, 2026\n";
    let meta = extract_register_metadata(text);
    assert_eq!(
      meta.exam_title.as_deref(),
      Some(
        "Bachelor of Commerce (Semester - III) (NEP 2020) REGULAR EXAMINATION HELD IN DECEMBER 2025"
      )
    );
    assert_eq!(meta.exam_month.as_deref(), Some("DECEMBER"));
    assert_eq!(meta.exam_year, Some(2025));
    assert_eq!(meta.declaration_date.as_deref(), Some("January 15, 2026"));
  }

  #[test]
  fn unknown_cover_layout_yields_empty_metadata() {
    let meta = extract_register_metadata("RESULT GAZETTE\nsome other header\n");
    assert_eq!(meta, RegisterMetadata::default());
  }
}
