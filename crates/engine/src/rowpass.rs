//! Two-phase row processing.
//!
//! Phase one resolves the row into a text snapshot and lets the field
//! rules accumulate findings and pending edits without touching the sheet.
//! Phase two applies the edits, classifies the row, paints it and writes
//! the RESULT cell. Rules therefore never see each other's mutations.

use importval_doc::{CellValue, Fill, Sheet};

use crate::finding::{classify, result_message, Finding, SheetSummary, Verdict, VALID_MESSAGE};
use crate::value::resolve_field;

/// Name of the per-row verdict column appended to every validated sheet.
pub const RESULT_HEADER: &str = "RESULTADO";

/// Snapshot of one data row plus the findings and edits the rules queued.
#[derive(Debug)]
pub struct RowCtx {
    /// 0-based row index in the sheet.
    pub row: usize,
    /// 1-based row number used in messages.
    pub row_num: usize,
    texts: Vec<String>,
    numeric: Vec<bool>,
    findings: Vec<Finding>,
    edits: Vec<(usize, String)>,
    clears: Vec<usize>,
}

impl RowCtx {
    /// Resolved text of a column; absent columns read as empty.
    pub fn text(&self, col: Option<usize>) -> &str {
        col.and_then(|c| self.texts.get(c))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.texts.iter().all(String::is_empty)
    }

    /// Whether the cell arrived as a spreadsheet number rather than text.
    pub fn is_number(&self, col: Option<usize>) -> bool {
        col.and_then(|c| self.numeric.get(c)).copied().unwrap_or(false)
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.findings.push(Finding::error(message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.findings.push(Finding::warning(message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.findings.push(Finding::info(message));
    }

    /// Queue a rewrite; also updates the snapshot so later rules in the
    /// same row see the corrected value. A `None` column is a no-op so
    /// callers can pass header lookups straight through.
    pub fn set_text(&mut self, col: Option<usize>, text: impl Into<String>) {
        let Some(col) = col else { return };
        let text = text.into();
        if self.texts.len() <= col {
            self.texts.resize(col + 1, String::new());
        }
        self.texts[col] = text.clone();
        self.edits.push((col, text));
    }

    pub fn clear(&mut self, col: Option<usize>) {
        let Some(col) = col else { return };
        if let Some(t) = self.texts.get_mut(col) {
            t.clear();
        }
        self.clears.push(col);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }
}

/// Driver for one sheet: owns the RESULT column, the header advisory and
/// the running summary.
#[derive(Debug)]
pub struct SheetPass {
    result_col: usize,
    advisory: Option<Finding>,
    summary: SheetSummary,
    max_result_len: usize,
}

impl SheetPass {
    /// Locate or append the RESULT column and style its header cell.
    pub fn begin(sheet: &mut Sheet, advisory: Option<Finding>) -> Self {
        let mut result_col = None;
        for col in 0..sheet.n_cols() {
            if sheet.text(0, col).eq_ignore_ascii_case(RESULT_HEADER) {
                result_col = Some(col);
                break;
            }
        }
        let result_col = result_col.unwrap_or_else(|| sheet.n_cols().max(1));
        sheet.set_text(0, result_col, RESULT_HEADER);
        sheet.set_fill(0, result_col, Fill::Header);
        sheet.set_bold(0, result_col, true);
        SheetPass {
            result_col,
            advisory,
            summary: SheetSummary::default(),
            max_result_len: RESULT_HEADER.len(),
        }
    }

    pub fn result_col(&self) -> usize {
        self.result_col
    }

    /// Phase one: resolve the row. Formula substitutions become warnings
    /// named after the column header; the header advisory, when present,
    /// opens the finding list.
    pub fn snapshot(&self, sheet: &Sheet, row: usize) -> RowCtx {
        let mut texts = Vec::with_capacity(self.result_col);
        let mut numeric = Vec::with_capacity(self.result_col);
        let mut findings: Vec<Finding> = self.advisory.iter().cloned().collect();
        for col in 0..self.result_col {
            let field = sheet.text(0, col);
            let field = if field.is_empty() {
                format!("coluna {}", col + 1)
            } else {
                field
            };
            let value = sheet.value(row, col);
            let (text, note) = resolve_field(&value, &field);
            texts.push(text);
            numeric.push(matches!(value, CellValue::Number(_)));
            if let Some(note) = note {
                findings.push(note);
            }
        }
        RowCtx {
            row,
            row_num: row + 1,
            texts,
            numeric,
            findings,
            edits: Vec::new(),
            clears: Vec::new(),
        }
    }

    /// Phase two: apply edits, paint the row by its verdict and write the
    /// RESULT message.
    pub fn finish_row(&mut self, sheet: &mut Sheet, ctx: RowCtx) -> Verdict {
        for (col, text) in &ctx.edits {
            sheet.set_text(ctx.row, *col, text.clone());
        }
        for col in &ctx.clears {
            sheet.set_value(ctx.row, *col, CellValue::Empty);
        }
        let verdict = classify(&ctx.findings);
        let message = result_message(&ctx.findings);
        let fill = verdict.fill();
        for col in 0..=self.result_col {
            sheet.set_fill(ctx.row, col, fill);
        }
        sheet.set_text(ctx.row, self.result_col, message.clone());
        sheet.set_bold(ctx.row, self.result_col, message == VALID_MESSAGE);
        self.max_result_len = self.max_result_len.max(message.chars().count());
        self.summary.count(verdict);
        verdict
    }

    /// Close the sheet: size the RESULT column to its longest message and
    /// turn on the header filter.
    pub fn finish(self, sheet: &mut Sheet) -> SheetSummary {
        sheet.set_col_width(self.result_col, (self.max_result_len as f64 * 1.2).max(12.0));
        sheet.auto_filter = true;
        self.summary
    }
}
