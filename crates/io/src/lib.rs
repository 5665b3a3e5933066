//! `importval-io` — Excel import and export for the validation pipeline.
//!
//! Import is a one-way conversion into the in-memory document model;
//! export writes the annotated result back out, fills and all.

pub mod error;
pub mod xlsx;

pub use error::IoError;
pub use xlsx::{read_document, write_document};
