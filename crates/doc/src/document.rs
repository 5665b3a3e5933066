use serde::{Deserialize, Serialize};

use crate::sheet::Sheet;

/// Ordered collection of named sheets. Lookup is case-insensitive; the
/// validator ignores sheets whose names it does not know.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    sheets: Vec<Sheet>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn push_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn insert_sheet(&mut self, index: usize, sheet: Sheet) {
        let index = index.min(self.sheets.len());
        self.sheets.insert(index, sheet);
    }

    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheet_index(name).map(|i| &self.sheets[i])
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheet_index(name).map(move |i| &mut self.sheets[i])
    }

    pub fn remove_sheet(&mut self, name: &str) -> Option<Sheet> {
        self.sheet_index(name).map(|i| self.sheets.remove(i))
    }
}
