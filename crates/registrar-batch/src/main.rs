//! `registrar` binary.
//!
//! Walks a directory of downloaded register PDFs, ingests them into the
//! SQLite result store, writes cropped per-student PDFs, and regenerates
//! the flat JSON export.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use registrar_batch::{BatchOrchestrator, MetadataLoader, write_export};
use registrar_core::store::ResultStore as _;
use registrar_pdf::{CropTable, RegionCropper};
use registrar_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Exam register ingestion pipeline")]
struct Cli {
  /// Directory of downloaded register PDFs.
  #[arg(long, default_value = "downloads")]
  input: PathBuf,

  /// Directory of side-car metadata JSON files.
  #[arg(long, default_value = "metadata")]
  metadata: PathBuf,

  /// Directory for cropped per-student PDFs.
  #[arg(long, default_value = "student_records")]
  output: PathBuf,

  /// SQLite database file.
  #[arg(long, default_value = "grade_records.db")]
  db: PathBuf,

  /// Path of the regenerated JSON export.
  #[arg(long, default_value = "students.json")]
  export: PathBuf,

  /// Skip regenerating the JSON export.
  #[arg(long)]
  skip_export: bool,

  /// Replacement crop-coordinate table (JSON).
  #[arg(long)]
  crop_table: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if !cli.input.is_dir() {
    anyhow::bail!("input directory {:?} does not exist", cli.input);
  }
  if !cli.metadata.is_dir() {
    anyhow::bail!("metadata directory {:?} does not exist", cli.metadata);
  }

  let crop_table = match &cli.crop_table {
    Some(path) => CropTable::from_path(path)
      .with_context(|| format!("failed to load crop table from {path:?}"))?,
    None => CropTable::default(),
  };

  let store = SqliteStore::open(&cli.db)
    .await
    .with_context(|| format!("failed to open store at {:?}", cli.db))?;

  let orchestrator = BatchOrchestrator::new(
    store,
    MetadataLoader::new(&cli.metadata),
    RegionCropper::new(crop_table),
    &cli.output,
  );

  let stats = orchestrator
    .run(&cli.input)
    .await
    .context("batch run failed")?;

  if !cli.skip_export {
    let records = orchestrator
      .store()
      .export_records()
      .await
      .context("export query failed")?;
    write_export(&cli.export, &records)
      .with_context(|| format!("failed to write export to {:?}", cli.export))?;
    tracing::info!(records = records.len(), path = %cli.export.display(), "export written");
  }

  tracing::info!(
    documents_processed = stats.documents_processed,
    documents_skipped = stats.documents_skipped,
    rows_ingested = stats.rows_ingested,
    duplicate_rows = stats.duplicate_rows,
    rows_rejected = stats.rows_rejected,
    low_confidence_rows = stats.low_confidence_rows,
    crop_failures = stats.crop_failures,
    "run complete"
  );

  for exam in orchestrator
    .store()
    .exam_statistics()
    .await
    .context("statistics query failed")?
  {
    tracing::info!(
      exam_id = exam.exam_id,
      title = exam.exam_title.as_deref().unwrap_or("(untitled)"),
      total = exam.total_students,
      passed = exam.passed,
      failed = exam.failed,
      pass_percentage = exam.pass_percentage,
      "examination summary"
    );
  }

  Ok(())
}
