//! Student block splitting and candidate-row parsing.
//!
//! The register prints one or two students per data page, each as a block
//! opening with a 9-digit seat number and an uppercase name, followed by
//! marker rows (`E1`, `I1`, `TOT`). Parsing is positional/pattern based so
//! variable-length names and college titles do not break field boundaries.

use std::sync::LazyLock;

use regex::Regex;
use registrar_core::{
  candidate::{CandidateRow, RowField},
  entity::{Ern, ExamResult, Gender, StudentStatus},
};

use crate::{
  RowOutcome, STUDENT_DATA_ANCHOR,
  error::{Anomaly, RowAnomaly},
};

// ─── Patterns ────────────────────────────────────────────────────────────────

/// A line opening with a seat-like 9-character token and a name. Loose on
/// purpose: a mistyped seat number must still be detected as a block so it
/// can be rejected with a diagnosable anomaly rather than silently ignored.
static BLOCK_START: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[0-9][0-9A-Za-z]{8}\s+[A-Z]").unwrap());

/// Layout quirk: the ERN sometimes wraps onto its own line *above* the seat
/// number line. Such a line belongs to the following block.
static ERN_CONTINUATION: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\(MU\d+").unwrap());

/// Seat token + name, delimited by the status or gender keyword that
/// follows the name on the register.
static SEAT_AND_NAME: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"\b([0-9][0-9A-Za-z]{8})\s+([A-Z][A-Z\s]+?)(?:\s+(?:Regular|Repeater|ATKT|Ex-Student)\b|\s+(?:MALE|FEMALE)\b)",
  )
  .unwrap()
});

static SEAT_STRICT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\d{9}$").unwrap());

static ERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\(MU(\d+)\)").unwrap());

static STATUS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\b(Regular|Repeater|ATKT|Ex-Student)\b").unwrap());

static GENDER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\b(MALE|FEMALE)\b").unwrap());

static RESULT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\b(PASS|FAIL)\b").unwrap());

static COLLEGE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(MU-\d+):\s*(.+?)(?:\s+E1\b|\s+MAR|\s*$)").unwrap());

// ─── Page classification ─────────────────────────────────────────────────────

/// `true` if the page carries tabular student data (the anchor token is
/// present). Index and cover pages return `false` and are skipped.
pub fn is_student_data_page(page_text: &str) -> bool {
  page_text.contains(STUDENT_DATA_ANCHOR)
}

// ─── Block splitting ─────────────────────────────────────────────────────────

/// Split a page's text into one block per student.
///
/// Blocks open at seat-number lines (folding in a preceding wrapped-ERN
/// line) and run until the next block or end of page. Only blocks carrying
/// the `I1` and `TOT` marker rows count as complete records; header
/// fragments and page furniture are discarded here, not reported.
pub(crate) fn split_student_blocks(page_text: &str) -> Vec<String> {
  let lines: Vec<&str> = page_text.lines().collect();

  let mut starts: Vec<usize> = Vec::new();
  for (i, line) in lines.iter().enumerate() {
    if !BLOCK_START.is_match(line.trim()) {
      continue;
    }
    if i > 0 && ERN_CONTINUATION.is_match(lines[i - 1].trim()) {
      starts.push(i - 1);
    } else {
      starts.push(i);
    }
  }

  let mut blocks = Vec::new();
  for (n, &start) in starts.iter().enumerate() {
    let end = starts.get(n + 1).copied().unwrap_or(lines.len());
    let block = lines[start..end].join("\n");
    if block.contains("I1") && block.contains("TOT") {
      blocks.push(block);
    }
  }
  blocks
}

// ─── Row parsing ─────────────────────────────────────────────────────────────

/// Parse one student block into a [`RowOutcome`].
///
/// Identity fields (seat number, ERN) are validated strictly; failure
/// rejects the row. Every other field parses best-effort, yielding `None`
/// plus a low-confidence flag when unmatched.
pub(crate) fn parse_candidate(
  block: &str,
  page_number: u32,
  ordinal: usize,
) -> RowOutcome {
  let rejected = |anomaly: Anomaly| {
    RowOutcome::Rejected(RowAnomaly { page_number, ordinal, anomaly })
  };

  // Normalize the block to a single whitespace-collapsed line; field
  // boundaries are keyword-delimited, not line-delimited.
  let text = block.split_whitespace().collect::<Vec<_>>().join(" ");

  let Some(caps) = SEAT_AND_NAME.captures(&text) else {
    return rejected(Anomaly::MalformedSeatLine);
  };
  let seat_no = caps[1].to_string();
  if !SEAT_STRICT.is_match(&seat_no) {
    return rejected(Anomaly::InvalidSeatNo(seat_no));
  }
  let name = caps[2].trim().to_string();

  let ern = match ERN.captures(&text) {
    None => return rejected(Anomaly::MissingErn),
    Some(caps) => {
      let raw = format!("MU{}", &caps[1]);
      match Ern::parse(&raw) {
        Ok(ern) => ern,
        Err(_) => return rejected(Anomaly::InvalidErn(raw)),
      }
    }
  };

  let mut low_confidence = Vec::new();

  let status = STATUS
    .captures(&text)
    .and_then(|c| StudentStatus::from_token(&c[1]).ok());
  if status.is_none() {
    low_confidence.push(RowField::Status);
  }

  let gender = GENDER.captures(&text).map(|c| match &c[1] {
    "MALE" => Gender::Male,
    _ => Gender::Female,
  });
  if gender.is_none() {
    low_confidence.push(RowField::Gender);
  }

  let result = RESULT.captures(&text).map(|c| match &c[1] {
    "PASS" => ExamResult::Pass,
    _ => ExamResult::Fail,
  });
  if result.is_none() {
    low_confidence.push(RowField::Result);
  }

  let (college_code, college_name) = match COLLEGE.captures(&text) {
    Some(caps) => (Some(caps[1].to_string()), Some(caps[2].trim().to_string())),
    None => {
      low_confidence.push(RowField::College);
      (None, None)
    }
  };

  let first_name = name.split_whitespace().next().map(str::to_string);

  RowOutcome::Row(CandidateRow {
    page_number,
    ordinal,
    seat_no,
    ern,
    name,
    first_name,
    gender,
    status,
    result,
    college_code,
    college_name,
    low_confidence,
  })
}

/// Extract all candidate rows from one page of register text.
///
/// Pages without the student-data anchor yield nothing. Every detected
/// block yields exactly one outcome, so rejected rows stay attributable.
pub fn extract_page_rows(page_text: &str, page_number: u32) -> Vec<RowOutcome> {
  if !is_student_data_page(page_text) {
    return Vec::new();
  }
  split_student_blocks(page_text)
    .iter()
    .enumerate()
    .map(|(ordinal, block)| parse_candidate(block, page_number, ordinal))
    .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  const PAGE_HEADER: &str =
    "SEAT NO NAME OF THE CANDIDATE PRN COLLEGE\n";

  fn student_block(seat: &str, name: &str, ern_digits: &str) -> String {
    format!(
      "{seat} {name} Regular FEMALE (MU{ern_digits})\n\
       MU-2604: K E S SHROFF COLLEGE OF ARTS AND COMMERCE\n\
       E1 45P 38P 42P MARKS\n\
       I1 18P 19P 17P (179) PASS\n\
       TOT 63 9 A 2.0 18.0 6 54.0 9.0\n"
    )
  }

  fn one_student_page() -> String {
    format!("{PAGE_HEADER}{}", student_block("184352431", "SHARMA PRIYA RAKESH", "1053822"))
  }

  fn two_student_page() -> String {
    format!(
      "{PAGE_HEADER}{}{}",
      student_block("184352431", "SHARMA PRIYA RAKESH", "1053822"),
      student_block("184352432", "VERMA ANIL SURESH", "1053823"),
    )
  }

  fn expect_row(outcome: &RowOutcome) -> &CandidateRow {
    match outcome {
      RowOutcome::Row(row) => row,
      RowOutcome::Rejected(anomaly) => panic!("rejected: {anomaly:?}"),
    }
  }

  #[test]
  fn index_page_yields_no_rows() {
    let text = "OFFICE REGISTER FOR THE Bachelor of Commerce\n\
                1234567 FINANCIAL ACCOUNTING 2.00 8.00 20.00";
    assert!(!is_student_data_page(text));
    assert!(extract_page_rows(text, 1).is_empty());
  }

  #[test]
  fn student_page_yields_one_row_per_block() {
    let rows = extract_page_rows(&two_student_page(), 3);
    assert_eq!(rows.len(), 2);

    let first = expect_row(&rows[0]);
    assert_eq!(first.seat_no, "184352431");
    assert_eq!(first.ern.as_str(), "MU1053822");
    assert_eq!(first.name, "SHARMA PRIYA RAKESH");
    assert_eq!(first.first_name.as_deref(), Some("SHARMA"));
    assert_eq!(first.page_number, 3);
    assert_eq!(first.ordinal, 0);

    let second = expect_row(&rows[1]);
    assert_eq!(second.ordinal, 1);
    assert_eq!(second.ern.as_str(), "MU1053823");
  }

  #[test]
  fn parses_all_secondary_fields() {
    let rows = extract_page_rows(&one_student_page(), 2);
    let row = expect_row(&rows[0]);

    assert_eq!(row.status, Some(StudentStatus::Regular));
    assert_eq!(row.gender, Some(Gender::Female));
    assert_eq!(row.result, Some(ExamResult::Pass));
    assert_eq!(row.college_code.as_deref(), Some("MU-2604"));
    assert_eq!(
      row.college_name.as_deref(),
      Some("K E S SHROFF COLLEGE OF ARTS AND COMMERCE")
    );
    assert!(!row.is_low_confidence());
  }

  #[test]
  fn non_numeric_seat_number_is_rejected() {
    // The last seat digit got garbled into a letter.
    let page = format!(
      "{PAGE_HEADER}{}",
      student_block("12345678X", "SHARMA PRIYA RAKESH", "1053822")
    );
    let rows = extract_page_rows(&page, 4);
    assert_eq!(rows.len(), 1);
    match &rows[0] {
      RowOutcome::Rejected(anomaly) => {
        assert_eq!(anomaly.page_number, 4);
        assert_eq!(anomaly.ordinal, 0);
        assert_eq!(
          anomaly.anomaly,
          Anomaly::InvalidSeatNo("12345678X".to_string())
        );
      }
      RowOutcome::Row(row) => panic!("should have been rejected: {row:?}"),
    }
  }

  #[test]
  fn undelimited_name_is_rejected_as_malformed_seat_line() {
    // Valid seat number and name, but no status or gender keyword after
    // the name, so the name field has no right boundary.
    let page = format!(
      "{PAGE_HEADER}184352431 SHARMA PRIYA RAKESH (MU1053822)\n\
       MU-2604: SOME COLLEGE\nE1 45P MARKS\nI1 18P (179)\nTOT 63 9 A\n"
    );
    let rows = extract_page_rows(&page, 1);
    assert_eq!(rows.len(), 1);
    match &rows[0] {
      RowOutcome::Rejected(anomaly) => {
        assert_eq!(anomaly.anomaly, Anomaly::MalformedSeatLine)
      }
      RowOutcome::Row(row) => panic!("should have been rejected: {row:?}"),
    }
  }

  #[test]
  fn missing_ern_is_rejected() {
    let page = format!(
      "{PAGE_HEADER}184352431 SHARMA PRIYA RAKESH Regular FEMALE\n\
       MU-2604: SOME COLLEGE\nE1 45P MARKS\nI1 18P (179) PASS\nTOT 63 9 A\n"
    );
    let rows = extract_page_rows(&page, 1);
    assert_eq!(rows.len(), 1);
    match &rows[0] {
      RowOutcome::Rejected(anomaly) => {
        assert_eq!(anomaly.anomaly, Anomaly::MissingErn)
      }
      RowOutcome::Row(row) => panic!("should have been rejected: {row:?}"),
    }
  }

  #[test]
  fn wrong_length_ern_is_rejected() {
    let page = format!(
      "{PAGE_HEADER}{}",
      student_block("184352431", "SHARMA PRIYA RAKESH", "105382")
    );
    let rows = extract_page_rows(&page, 1);
    match &rows[0] {
      RowOutcome::Rejected(anomaly) => {
        assert_eq!(anomaly.anomaly, Anomaly::InvalidErn("MU105382".to_string()))
      }
      RowOutcome::Row(row) => panic!("should have been rejected: {row:?}"),
    }
  }

  #[test]
  fn missing_secondary_fields_flow_through_with_flags() {
    // No gender keyword and no college line: row survives with gaps.
    let page = format!(
      "{PAGE_HEADER}184352431 SHARMA PRIYA RAKESH Regular (MU1053822)\n\
       E1 45P MARKS\nI1 18P (179) PASS\nTOT 63 9 A\n"
    );
    let rows = extract_page_rows(&page, 1);
    let row = expect_row(&rows[0]);
    assert_eq!(row.gender, None);
    assert_eq!(row.college_code, None);
    assert!(row.low_confidence.contains(&RowField::Gender));
    assert!(row.low_confidence.contains(&RowField::College));
    assert!(!row.low_confidence.contains(&RowField::Status));
  }

  #[test]
  fn ern_wrapped_onto_previous_line_is_folded_in() {
    let page = format!(
      "{PAGE_HEADER}(MU1053822)\n\
       184352431 SHARMA PRIYA RAKESH Regular FEMALE\n\
       MU-2604: SOME COLLEGE\nE1 45P MARKS\nI1 18P (179) PASS\nTOT 63 9 A\n"
    );
    let rows = extract_page_rows(&page, 1);
    assert_eq!(rows.len(), 1);
    let row = expect_row(&rows[0]);
    assert_eq!(row.ern.as_str(), "MU1053822");
  }

  #[test]
  fn incomplete_blocks_are_discarded() {
    // A seat-number line with no I1/TOT rows is page furniture, not a row.
    let page = format!("{PAGE_HEADER}184352431 SHARMA PRIYA RAKESH Regular FEMALE\n");
    assert!(extract_page_rows(&page, 1).is_empty());
  }

  #[test]
  fn fail_result_is_parsed() {
    let page = format!(
      "{PAGE_HEADER}184352433 JOSHI RAHUL MOHAN ATKT MALE (MU1053824)\n\
       MU-2604: SOME COLLEGE\nE1 12F MARKS\nI1 8P (61) FAIL\nTOT 20 2 F\n"
    );
    let rows = extract_page_rows(&page, 1);
    let row = expect_row(&rows[0]);
    assert_eq!(row.status, Some(StudentStatus::Atkt));
    assert_eq!(row.gender, Some(Gender::Male));
    assert_eq!(row.result, Some(ExamResult::Fail));
  }
}
