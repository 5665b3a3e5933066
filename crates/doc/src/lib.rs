//! `importval-doc` — In-memory workbook model.
//!
//! The validation engine reads cell values from this model and writes
//! values, fills, bold flags and column widths back into it. Loading and
//! saving the underlying file format lives in `importval-io`.

pub mod cell;
pub mod document;
pub mod sheet;

pub use cell::{Cell, CellValue, Fill};
pub use document::Document;
pub use sheet::Sheet;
