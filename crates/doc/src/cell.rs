use serde::{Deserialize, Serialize};

/// The fixed fill palette the validator writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fill {
    /// Green — row passed every check.
    Valid,
    /// Red — at least one hard failure.
    Error,
    /// Yellow — recoverable problem, usually auto-corrected.
    Warning,
    /// Grey — duplicate marker column.
    Duplicate,
    /// Black, paired with white bold text — RESULT column header.
    Header,
    /// White — report row for a sheet that was not found.
    Neutral,
}

impl Fill {
    pub fn rgb(self) -> u32 {
        match self {
            Fill::Valid => 0x00FF00,
            Fill::Error => 0xFF0000,
            Fill::Warning => 0xFFFF00,
            Fill::Duplicate => 0xC0C0C0,
            Fill::Header => 0x000000,
            Fill::Neutral => 0xFFFFFF,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    /// A formula expression plus the last value the originating tool
    /// computed for it, when one was stored alongside.
    Formula { source: String, cached: Option<String> },
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Trimmed string form of the cell content. Formulas render as their
    /// source expression; resolution is the engine's job.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Formula { source, .. } => source.trim().to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// Integral numbers print without a fractional part so that code fields
/// entered as numbers ("150") still look like digit strings.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    pub fill: Option<Fill>,
    pub bold: bool,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Cell { value, fill: None, bold: false }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Cell::new(CellValue::Text(s.into()))
    }
}
