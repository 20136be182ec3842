//! PDF collaborators for the registrar pipeline.
//!
//! Wraps the poppler command-line tools rather than parsing PDF
//! internals: `pdfinfo` for page count and geometry, `pdftotext -layout`
//! for per-page text, and `pdftocairo -pdf` for materializing a cropped
//! single-student page. The source document is never mutated.

pub mod crop;
pub mod error;
mod reader;

pub use crop::{Band, CropTable, RegionCropper, artifact_filename};
pub use error::{Error, Result};
pub use reader::RegisterPdf;
