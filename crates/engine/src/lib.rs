//! `importval-engine` — Staging-workbook validation engine.
//!
//! Pure engine crate: receives an in-memory [`importval_doc::Document`],
//! validates its sheets in dependency order, mutates the document in place
//! (auto-corrections, verdict fills, RESULT messages, final report sheet)
//! and returns a run report. No CLI or IO dependencies.

pub mod cleanup;
pub mod dedup;
pub mod finding;
pub mod header;
pub mod labels;
pub mod price;
pub mod progress;
pub mod registry;
pub mod report;
pub mod rowpass;
pub mod rules;
pub mod run;
pub mod sheets;
pub mod value;

pub use finding::{Finding, RunStatus, Severity, SheetSummary, Verdict};
pub use progress::{ImageSet, NoProgress, Progress};
pub use registry::{CompanyProfile, Registry};
pub use run::{run, RunOptions, RunReport};
