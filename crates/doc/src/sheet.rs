use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellValue, Fill};

/// One named grid of cells. Rows are ragged internally; `n_cols` reports
/// the widest row so callers can treat the sheet as rectangular.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<Cell>>,
    col_widths: HashMap<usize, f64>,
    hidden_cols: HashSet<usize>,
    pub auto_filter: bool,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Sheet { name: name.into(), ..Sheet::default() }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Grow the grid as needed and hand out the cell for mutation.
    pub fn cell_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let r = &mut self.rows[row];
        if r.len() <= col {
            r.resize_with(col + 1, Cell::default);
        }
        &mut r[col]
    }

    pub fn value(&self, row: usize, col: usize) -> CellValue {
        self.cell(row, col).map(|c| c.value.clone()).unwrap_or(CellValue::Empty)
    }

    /// Trimmed text of a cell, empty string for out-of-range.
    pub fn text(&self, row: usize, col: usize) -> String {
        self.cell(row, col).map(|c| c.value.to_text()).unwrap_or_default()
    }

    pub fn set_value(&mut self, row: usize, col: usize, value: CellValue) {
        self.cell_mut(row, col).value = value;
    }

    pub fn set_text(&mut self, row: usize, col: usize, s: impl Into<String>) {
        self.set_value(row, col, CellValue::Text(s.into()));
    }

    pub fn set_fill(&mut self, row: usize, col: usize, fill: Fill) {
        self.cell_mut(row, col).fill = Some(fill);
    }

    pub fn set_bold(&mut self, row: usize, col: usize, bold: bool) {
        self.cell_mut(row, col).bold = bold;
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn row_is_blank(&self, row: usize) -> bool {
        self.row(row).iter().all(|c| c.value.is_blank())
    }

    pub fn push_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }

    pub fn delete_row(&mut self, row: usize) {
        if row < self.rows.len() {
            self.rows.remove(row);
        }
    }

    /// Insert an empty column, shifting widths and hidden flags right.
    pub fn insert_col(&mut self, col: usize) {
        for r in &mut self.rows {
            if col <= r.len() {
                r.insert(col, Cell::default());
            }
        }
        self.col_widths = shift_keys(&self.col_widths, col, 1);
        self.hidden_cols = self
            .hidden_cols
            .iter()
            .map(|&c| if c >= col { c + 1 } else { c })
            .collect();
    }

    pub fn delete_col(&mut self, col: usize) {
        for r in &mut self.rows {
            if col < r.len() {
                r.remove(col);
            }
        }
        self.col_widths = shift_keys(&self.col_widths, col + 1, -1);
        self.col_widths.remove(&col);
        self.hidden_cols = self
            .hidden_cols
            .iter()
            .filter(|&&c| c != col)
            .map(|&c| if c > col { c - 1 } else { c })
            .collect();
    }

    pub fn set_col_width(&mut self, col: usize, width: f64) {
        self.col_widths.insert(col, width);
    }

    pub fn col_width(&self, col: usize) -> Option<f64> {
        self.col_widths.get(&col).copied()
    }

    pub fn hide_col(&mut self, col: usize) {
        self.hidden_cols.insert(col);
    }

    pub fn is_col_hidden(&self, col: usize) -> bool {
        self.hidden_cols.contains(&col)
    }
}

fn shift_keys(widths: &HashMap<usize, f64>, from: usize, delta: isize) -> HashMap<usize, f64> {
    widths
        .iter()
        .map(|(&c, &w)| {
            if c >= from {
                ((c as isize + delta) as usize, w)
            } else {
                (c, w)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_with(rows: &[&[&str]]) -> Sheet {
        let mut s = Sheet::new("T");
        for r in rows {
            s.push_row(r.iter().map(|&v| Cell::text(v)).collect());
        }
        s
    }

    #[test]
    fn cell_mut_grows_grid() {
        let mut s = Sheet::new("T");
        s.set_text(2, 3, "x");
        assert_eq!(s.n_rows(), 3);
        assert_eq!(s.text(2, 3), "x");
        assert_eq!(s.text(0, 0), "");
    }

    #[test]
    fn insert_col_shifts_cells() {
        let mut s = sheet_with(&[&["a", "b"], &["1", "2"]]);
        s.insert_col(1);
        assert_eq!(s.text(0, 0), "a");
        assert_eq!(s.text(0, 1), "");
        assert_eq!(s.text(0, 2), "b");
    }

    #[test]
    fn delete_col_shifts_widths_and_hidden() {
        let mut s = sheet_with(&[&["a", "b", "c"]]);
        s.set_col_width(2, 30.0);
        s.hide_col(2);
        s.delete_col(1);
        assert_eq!(s.text(0, 1), "c");
        assert_eq!(s.col_width(1), Some(30.0));
        assert!(s.is_col_hidden(1));
        assert!(!s.is_col_hidden(2));
    }

    #[test]
    fn blank_row_detection() {
        let s = sheet_with(&[&["a"], &["", "  "], &[]]);
        assert!(!s.row_is_blank(0));
        assert!(s.row_is_blank(1));
        assert!(s.row_is_blank(2));
    }
}
