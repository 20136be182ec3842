//! Batch orchestration for the registrar pipeline.
//!
//! Ties the other crates together: enumerate register PDFs, pair each with
//! its side-car metadata, extract and crop per page, ingest into the result
//! store, and regenerate the JSON export. Failures are isolated at row and
//! document granularity; one bad register never aborts the run.

mod export;
mod metadata;
mod orchestrator;

pub mod error;

pub use error::{Error, Result};
pub use export::write_export;
pub use metadata::MetadataLoader;
pub use orchestrator::{BatchOrchestrator, RunStats, enumerate_registers};
