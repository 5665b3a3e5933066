//! Duplicate detection.
//!
//! Two flavors: whole-row duplicates (later copies deleted outright) and
//! key-field duplicates (first occurrence kept, later ones reported).
//! Key comparison strips leading zeros from purely numeric values, so
//! "7", "07" and "007" collide while "A7" stays literal.

use std::collections::HashMap;

use importval_doc::Sheet;

use crate::finding::Finding;
use crate::value::resolve;

/// Canonical form of a key field for collision purposes.
pub fn normalize_key(raw: &str) -> String {
    let t = raw.trim();
    if !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()) {
        let stripped = t.trim_start_matches('0');
        if stripped.is_empty() {
            "0".to_string()
        } else {
            stripped.to_string()
        }
    } else {
        t.to_string()
    }
}

/// Delete data rows whose every non-ignored cell matches an earlier row
/// (trimmed text comparison). Row 1 is the header and never compared.
/// Returns the number of rows removed.
pub fn delete_whole_row_duplicates(sheet: &mut Sheet, ignore_cols: &[usize]) -> usize {
    let mut seen: HashMap<Vec<String>, usize> = HashMap::new();
    let n_cols = sheet.n_cols();
    let mut row = 1;
    let mut removed = 0;
    while row < sheet.n_rows() {
        let key: Vec<String> = (0..n_cols)
            .filter(|c| !ignore_cols.contains(c))
            .map(|c| resolve(&sheet.value(row, c)).text)
            .collect();
        if key.iter().all(String::is_empty) {
            row += 1;
            continue;
        }
        if seen.contains_key(&key) {
            sheet.delete_row(row);
            removed += 1;
        } else {
            seen.insert(key, row);
            row += 1;
        }
    }
    removed
}

/// Occurrence index for one key column. Built in a counting pass over the
/// whole sheet, then queried row by row during validation.
#[derive(Debug, Default)]
pub struct KeyDupIndex {
    counts: HashMap<String, usize>,
    first_seen: HashMap<String, (String, usize)>,
}

impl KeyDupIndex {
    pub fn new() -> Self {
        KeyDupIndex::default()
    }

    /// Counting pass: record one occurrence at a 1-based row number.
    pub fn count(&mut self, raw: &str, row_num: usize) {
        let key = normalize_key(raw);
        if key.is_empty() {
            return;
        }
        *self.counts.entry(key.clone()).or_insert(0) += 1;
        self.first_seen
            .entry(key)
            .or_insert_with(|| (raw.trim().to_string(), row_num));
    }

    /// True when any key occurs more than once.
    pub fn has_duplicates(&self) -> bool {
        self.counts.values().any(|&n| n > 1)
    }

    /// True when the value occurs more than once anywhere in the sheet,
    /// first occurrence included.
    pub fn is_duplicated(&self, raw: &str) -> bool {
        self.counts.get(&normalize_key(raw)).copied().unwrap_or(0) > 1
    }

    /// Error for a later occurrence; the first occurrence passes. The
    /// message names both spellings when they differ.
    pub fn check(&self, field: &str, raw: &str, row_num: usize) -> Option<Finding> {
        let key = normalize_key(raw);
        if key.is_empty() {
            return None;
        }
        let (orig, first_row) = self.first_seen.get(&key)?;
        if *first_row == row_num {
            return None;
        }
        let raw = raw.trim();
        let msg = if raw == orig {
            format!("{field} duplicado: {raw} na linha {row_num} já existe na linha {first_row}")
        } else {
            format!(
                "{field} duplicado: {raw} na linha {row_num} já existe como {orig} na linha {first_row}"
            )
        };
        Some(Finding::error(msg))
    }
}
