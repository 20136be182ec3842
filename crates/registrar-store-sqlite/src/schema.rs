//! SQL schema for the registrar SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS programs (
    program_code  TEXT PRIMARY KEY,
    program_name  TEXT NOT NULL
);

-- One row per source register PDF; pdf_filename is the re-run identity key.
CREATE TABLE IF NOT EXISTS examinations (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    program_code      TEXT NOT NULL REFERENCES programs(program_code),
    semester          TEXT,
    exam_type         TEXT,
    exam_title        TEXT,
    exam_month        TEXT,
    exam_year         INTEGER,
    result_date       TEXT,
    declaration_date  TEXT,
    pdf_filename      TEXT NOT NULL UNIQUE,
    pdf_url           TEXT
);

-- Identity rows. Created on first sight, never updated after.
CREATE TABLE IF NOT EXISTS students (
    ern         TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    first_name  TEXT,
    gender      TEXT             -- 'M' | 'F'
);

CREATE TABLE IF NOT EXISTS student_exam_records (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    student_ern   TEXT NOT NULL REFERENCES students(ern),
    exam_id       INTEGER NOT NULL REFERENCES examinations(id),
    seat_no       TEXT NOT NULL,
    college_code  TEXT,
    college_name  TEXT,
    status        TEXT,           -- 'Regular' | 'Repeater' | 'ATKT' | 'Ex-Student'
    result        TEXT,           -- 'PASS' | 'FAIL'
    page_number   INTEGER NOT NULL,
    pdf_file      TEXT,
    UNIQUE (student_ern, exam_id)
);

CREATE INDEX IF NOT EXISTS records_exam_idx    ON student_exam_records(exam_id);
CREATE INDEX IF NOT EXISTS records_student_idx ON student_exam_records(student_ern);

PRAGMA user_version = 1;
";
