//! Date normalisation.
//!
//! Registers print dates in prose ("January 8, 2024") while side-car
//! metadata carries ISO 8601. The store keeps everything ISO so lexical
//! ordering is chronological ordering.

use chrono::NaiveDate;

const KNOWN_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%d %B %Y", "%d/%m/%Y"];

/// Normalize a date string to `YYYY-MM-DD`. Inputs in no known format pass
/// through trimmed, so a surprising register never loses data.
pub fn normalize_date(raw: &str) -> String {
  let raw = raw.trim();
  for format in KNOWN_FORMATS {
    if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
      return date.format("%Y-%m-%d").to_string();
    }
  }
  raw.to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalizes_register_prose_dates() {
    assert_eq!(normalize_date("January 8, 2024"), "2024-01-08");
    assert_eq!(normalize_date(" 8 January 2024 "), "2024-01-08");
    assert_eq!(normalize_date("08/01/2024"), "2024-01-08");
  }

  #[test]
  fn iso_dates_pass_through() {
    assert_eq!(normalize_date("2024-01-08"), "2024-01-08");
  }

  #[test]
  fn unknown_formats_are_preserved() {
    assert_eq!(normalize_date("sometime in 2024"), "sometime in 2024");
  }
}
