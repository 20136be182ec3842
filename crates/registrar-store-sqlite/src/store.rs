//! [`SqliteStore`] — the SQLite implementation of [`ResultStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use registrar_core::{
  entity::{Examination, NewExamRecord, NewExamination, Program},
  export::{ExamStatistics, ExportRecord},
  store::{DocumentReceipt, ResultStore},
};

use crate::{
  encode::{EncodedRecord, RawExamination, RawExportRecord},
  schema::SCHEMA,
  Error, Result,
};

const EXAMINATION_COLUMNS: &str = "id, program_code, semester, exam_type, \
   exam_title, exam_month, exam_year, result_date, declaration_date, \
   pdf_filename, pdf_url";

fn read_examination(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawExamination> {
  Ok(RawExamination {
    id:               row.get(0)?,
    program_code:     row.get(1)?,
    semester:         row.get(2)?,
    exam_type:        row.get(3)?,
    exam_title:       row.get(4)?,
    exam_month:       row.get(5)?,
    exam_year:        row.get(6)?,
    result_date:      row.get(7)?,
    declaration_date: row.get(8)?,
    pdf_filename:     row.get(9)?,
    pdf_url:          row.get(10)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A result store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ResultStore impl ────────────────────────────────────────────────────────

impl ResultStore for SqliteStore {
  type Error = Error;

  async fn ensure_program(&self, program: Program) -> Result<Program> {
    let code = program.program_code.clone();
    let name = program.program_name.clone();

    let stored_name: String = self
      .conn
      .call(move |conn| {
        let existing: Option<String> = conn
          .query_row(
            "SELECT program_name FROM programs WHERE program_code = ?1",
            rusqlite::params![code],
            |row| row.get(0),
          )
          .optional()?;

        if let Some(existing) = existing {
          return Ok(existing);
        }

        conn.execute(
          "INSERT INTO programs (program_code, program_name) VALUES (?1, ?2)",
          rusqlite::params![code, name],
        )?;
        Ok(name)
      })
      .await?;

    Ok(Program {
      program_code: program.program_code,
      program_name: stored_name,
    })
  }

  async fn ensure_examination(&self, new: NewExamination) -> Result<Examination> {
    let raw: RawExamination = self
      .conn
      .call(move |conn| {
        let select = format!(
          "SELECT {EXAMINATION_COLUMNS} FROM examinations WHERE pdf_filename = ?1"
        );

        let existing = conn
          .query_row(
            &select,
            rusqlite::params![new.pdf_filename],
            read_examination,
          )
          .optional()?;
        if let Some(existing) = existing {
          return Ok(existing);
        }

        conn.execute(
          "INSERT INTO examinations (
             program_code, semester, exam_type, exam_title, exam_month,
             exam_year, result_date, declaration_date, pdf_filename, pdf_url
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            new.program_code,
            new.semester,
            new.exam_type,
            new.exam_title,
            new.exam_month,
            new.exam_year,
            new.result_date,
            new.declaration_date,
            new.pdf_filename,
            new.pdf_url,
          ],
        )?;

        let id = conn.last_insert_rowid();
        let inserted = conn.query_row(
          &format!("SELECT {EXAMINATION_COLUMNS} FROM examinations WHERE id = ?1"),
          rusqlite::params![id],
          read_examination,
        )?;
        Ok(inserted)
      })
      .await?;

    Ok(raw.into())
  }

  async fn ingest_rows(
    &self,
    exam_id: i64,
    rows: Vec<NewExamRecord>,
  ) -> Result<DocumentReceipt> {
    let encoded: Vec<EncodedRecord> =
      rows.into_iter().map(EncodedRecord::from).collect();

    let receipt = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut receipt = DocumentReceipt::default();

        for row in &encoded {
          // First sight creates the student; later sightings never
          // overwrite name or gender.
          tx.execute(
            "INSERT OR IGNORE INTO students (ern, name, first_name, gender)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![row.ern, row.name, row.first_name, row.gender],
          )?;

          let already: Option<i64> = tx
            .query_row(
              "SELECT id FROM student_exam_records
               WHERE student_ern = ?1 AND exam_id = ?2",
              rusqlite::params![row.ern, exam_id],
              |r| r.get(0),
            )
            .optional()?;
          if already.is_some() {
            receipt.duplicates += 1;
            continue;
          }

          tx.execute(
            "INSERT INTO student_exam_records (
               student_ern, exam_id, seat_no, college_code, college_name,
               status, result, page_number, pdf_file
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
              row.ern,
              exam_id,
              row.seat_no,
              row.college_code,
              row.college_name,
              row.status,
              row.result,
              row.page_number,
              row.pdf_file,
            ],
          )?;
          receipt.inserted += 1;
        }

        // Any error above drops `tx` and rolls the whole document back.
        tx.commit()?;
        Ok(receipt)
      })
      .await?;

    Ok(receipt)
  }

  async fn export_records(&self) -> Result<Vec<ExportRecord>> {
    let raws: Vec<RawExportRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             st.ern, st.name, st.gender,
             r.seat_no, r.college_code, r.college_name, r.status, r.result,
             e.id, e.exam_title, e.semester, e.exam_type,
             e.exam_month, e.exam_year, e.result_date, e.declaration_date,
             r.page_number, r.pdf_file
           FROM student_exam_records r
           JOIN students     st ON st.ern = r.student_ern
           JOIN examinations e  ON e.id   = r.exam_id
           ORDER BY st.ern, e.result_date, e.id",
        )?;

        let rows = stmt
          .query_map([], |row| {
            Ok(RawExportRecord {
              ern:              row.get(0)?,
              name:             row.get(1)?,
              gender:           row.get(2)?,
              seat_no:          row.get(3)?,
              college_code:     row.get(4)?,
              college_name:     row.get(5)?,
              status:           row.get(6)?,
              result:           row.get(7)?,
              exam_id:          row.get(8)?,
              exam_title:       row.get(9)?,
              semester:         row.get(10)?,
              exam_type:        row.get(11)?,
              exam_month:       row.get(12)?,
              exam_year:        row.get(13)?,
              result_date:      row.get(14)?,
              declaration_date: row.get(15)?,
              page_number:      row.get(16)?,
              pdf_file:         row.get(17)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawExportRecord::into_record).collect()
  }

  async fn exam_statistics(&self) -> Result<Vec<ExamStatistics>> {
    struct RawStats {
      exam_id:    i64,
      exam_title: Option<String>,
      semester:   Option<String>,
      exam_type:  Option<String>,
      total:      i64,
      passed:     i64,
      failed:     i64,
    }

    let raws: Vec<RawStats> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             e.id, e.exam_title, e.semester, e.exam_type,
             COUNT(r.id),
             COALESCE(SUM(r.result = 'PASS'), 0),
             COALESCE(SUM(r.result = 'FAIL'), 0)
           FROM examinations e
           JOIN student_exam_records r ON r.exam_id = e.id
           GROUP BY e.id
           ORDER BY e.id",
        )?;

        let rows = stmt
          .query_map([], |row| {
            Ok(RawStats {
              exam_id:    row.get(0)?,
              exam_title: row.get(1)?,
              semester:   row.get(2)?,
              exam_type:  row.get(3)?,
              total:      row.get(4)?,
              passed:     row.get(5)?,
              failed:     row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .map(|raw| {
          let pass_percentage = if raw.total > 0 {
            raw.passed as f64 / raw.total as f64 * 100.0
          } else {
            0.0
          };
          ExamStatistics {
            exam_id: raw.exam_id,
            exam_title: raw.exam_title,
            semester: raw.semester,
            exam_type: raw.exam_type,
            total_students: raw.total,
            passed: raw.passed,
            failed: raw.failed,
            pass_percentage,
          }
        })
        .collect(),
    )
  }
}
