//! Core types and trait definitions for the registrar ingestion pipeline.
//!
//! This crate is deliberately free of database, PDF, and process
//! dependencies. All other crates depend on it; it depends on nothing
//! heavier than `serde` and `chrono`.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod candidate;
pub mod dates;
pub mod entity;
pub mod error;
pub mod export;
pub mod metadata;
pub mod store;

pub use error::{Error, Result};
