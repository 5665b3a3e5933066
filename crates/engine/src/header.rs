//! Header reconciliation.
//!
//! Tabular sheets declare their expected column names. Row 1 is compared
//! position by position (trimmed, case-insensitive); mismatches are
//! overwritten with the canonical name and collected into one advisory
//! that every data row of the sheet will carry.

use std::collections::HashMap;

use importval_doc::{Fill, Sheet};

use crate::finding::Finding;
use crate::value::resolve;

/// Column positions by canonical header name.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    cols: HashMap<String, usize>,
}

impl HeaderMap {
    pub fn get(&self, name: &str) -> Option<usize> {
        self.cols.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, col: usize) {
        self.cols.insert(name.into(), col);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub from: String,
    pub to: String,
}

/// Force row 1 into the expected shape. Every expected name ends up at its
/// expected position, so the returned map is total over `expected`.
pub fn reconcile(sheet: &mut Sheet, expected: &[&str]) -> (HeaderMap, Vec<Correction>) {
    let mut map = HeaderMap::default();
    let mut corrections = Vec::new();
    for (col, &name) in expected.iter().enumerate() {
        let current = resolve(&sheet.value(0, col)).text;
        if !current.eq_ignore_ascii_case(name) {
            corrections.push(Correction { from: current, to: name.to_string() });
            sheet.set_text(0, col, name);
        } else if current != name {
            // Same name, wrong case: rewrite silently.
            sheet.set_text(0, col, name);
        }
        sheet.set_fill(0, col, Fill::Header);
        sheet.set_bold(0, col, true);
        map.insert(name, col);
    }
    (map, corrections)
}

/// Single advisory summarizing every corrected header, or `None` when
/// row 1 was already correct.
pub fn advisory(corrections: &[Correction]) -> Option<Finding> {
    if corrections.is_empty() {
        return None;
    }
    let right: Vec<&str> = corrections.iter().map(|c| c.to.as_str()).collect();
    let changes: Vec<String> = corrections
        .iter()
        .map(|c| format!("'{}' foi alterado para '{}'", c.from, c.to))
        .collect();
    Some(Finding::warning(format!(
        "Advertencia: {} estavam com nome errado, o correto é {}",
        changes.join(", "),
        right.join(", ")
    )))
}

/// Read row 1 as-is. Used by sheets whose column set is open-ended.
pub fn header_map(sheet: &Sheet) -> HeaderMap {
    let mut map = HeaderMap::default();
    for col in 0..sheet.n_cols() {
        let name = resolve(&sheet.value(0, col)).text;
        if !name.is_empty() {
            map.insert(name, col);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use importval_doc::Cell;

    fn sheet(headers: &[&str]) -> Sheet {
        let mut s = Sheet::new("T");
        s.push_row(headers.iter().map(|&h| Cell::text(h)).collect());
        s
    }

    #[test]
    fn matching_headers_need_no_advisory() {
        let mut s = sheet(&["CodFilial", "Filial"]);
        let (map, corr) = reconcile(&mut s, &["CodFilial", "Filial"]);
        assert!(corr.is_empty());
        assert!(advisory(&corr).is_none());
        assert_eq!(map.get("Filial"), Some(1));
    }

    #[test]
    fn case_differences_rewrite_silently() {
        let mut s = sheet(&["codfilial"]);
        let (_, corr) = reconcile(&mut s, &["CodFilial"]);
        assert!(corr.is_empty());
        assert_eq!(s.text(0, 0), "CodFilial");
    }

    #[test]
    fn mismatches_are_overwritten_and_reported() {
        let mut s = sheet(&["Codigo", "Filial"]);
        let (map, corr) = reconcile(&mut s, &["CodFilial", "Filial"]);
        assert_eq!(s.text(0, 0), "CodFilial");
        assert_eq!(map.get("CodFilial"), Some(0));
        let note = advisory(&corr).unwrap();
        assert_eq!(
            note.message,
            "Advertencia: 'Codigo' foi alterado para 'CodFilial' estavam com nome errado, o correto é CodFilial"
        );
    }

    #[test]
    fn missing_columns_are_created() {
        let mut s = sheet(&["CodFilial"]);
        let (map, corr) = reconcile(&mut s, &["CodFilial", "Filial", "Logotipo"]);
        assert_eq!(corr.len(), 2);
        assert_eq!(s.text(0, 2), "Logotipo");
        assert_eq!(map.get("Logotipo"), Some(2));
    }

    #[test]
    fn open_header_map_reads_row_one() {
        let s = sheet(&["CodProduto", "", "Produto"]);
        let map = header_map(&s);
        assert_eq!(map.get("CodProduto"), Some(0));
        assert_eq!(map.get("Produto"), Some(2));
        assert_eq!(map.get("Nada"), None);
    }
}
