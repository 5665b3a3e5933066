//! TRANSP — carrier registry sheet. Publishes code and name so the
//! customer sheet can cross-check both columns of a carrier reference.

use std::collections::HashSet;

use importval_doc::Document;

use crate::dedup::normalize_key;
use crate::finding::{SheetSummary, Verdict};
use crate::header::{advisory, reconcile};
use crate::registry::Registry;
use crate::rowpass::SheetPass;
use crate::rules::{digits, enum_field, over_limit};

pub const SHEET: &str = "TRANSP";

const EXPECTED: &[&str] = &["CodTransportadora", "Transportadora", "TransportadoraPadrao"];

pub fn validate(doc: &mut Document, reg: &mut Registry) -> Option<SheetSummary> {
    let sheet = doc.sheet_mut(SHEET)?;
    let (headers, corrections) = reconcile(sheet, EXPECTED);
    let advisory = advisory(&corrections);
    let mut pass = SheetPass::begin(sheet, advisory);
    let mut seen_codes: HashSet<String> = HashSet::new();
    let mut seen_names: HashSet<String> = HashSet::new();

    for row in 1..sheet.n_rows() {
        if sheet.row_is_blank(row) {
            continue;
        }
        let mut ctx = pass.snapshot(sheet, row);

        let code = ctx.text(headers.get("CodTransportadora")).to_string();
        let mut row_code = None;
        match digits(&code) {
            Some(n) if (1..=32_767).contains(&n) => {
                if seen_codes.insert(normalize_key(&code)) {
                    row_code = Some(code);
                } else {
                    ctx.error("CodTransportadora duplicado");
                }
            }
            _ => ctx.error("CodTransportadora inválido"),
        }

        let name = ctx.text(headers.get("Transportadora")).to_string();
        let mut name_ok = false;
        if name.is_empty() || over_limit(&name, 20) {
            ctx.error("Transportadora inválida ou excede 20 caracteres");
        } else if !seen_names.insert(name.to_lowercase()) {
            ctx.error("Transportadora duplicada");
        } else {
            name_ok = true;
        }

        enum_field(
            &mut ctx,
            headers.get("TransportadoraPadrao"),
            "TransportadoraPadrao",
            &["S", "s", "N", "n"],
        );

        let verdict = pass.finish_row(sheet, ctx);
        if verdict != Verdict::Error && name_ok {
            if let Some(code) = row_code {
                reg.add_carrier(&code, &name);
            }
        }
    }

    Some(pass.finish(sheet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use importval_doc::{Cell, Sheet};

    fn doc_with_rows(rows: &[&[&str]]) -> Document {
        let mut s = Sheet::new(SHEET);
        s.push_row(EXPECTED.iter().map(|&h| Cell::text(h)).collect());
        for r in rows {
            s.push_row(r.iter().map(|&v| Cell::text(v)).collect());
        }
        let mut doc = Document::new();
        doc.push_sheet(s);
        doc
    }

    #[test]
    fn valid_carrier_publishes_code_and_name() {
        let mut doc = doc_with_rows(&[&["10", "Transportes Sul", "S"]]);
        let mut reg = Registry::new();
        let summary = validate(&mut doc, &mut reg).unwrap();
        assert_eq!(summary.rows_valid, 1);
        assert_eq!(reg.carrier_name("10"), Some("Transportes Sul"));
    }

    #[test]
    fn empty_or_long_name_is_an_error() {
        let mut doc = doc_with_rows(&[
            &["10", "", ""],
            &["11", "Nome de transportadora comprido", ""],
        ]);
        let mut reg = Registry::new();
        let summary = validate(&mut doc, &mut reg).unwrap();
        assert_eq!(summary.rows_errored, 2);
        assert!(!reg.has_carrier("10"));
        assert!(!reg.has_carrier("11"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut doc = doc_with_rows(&[&["10", "Sul", ""], &["11", "SUL", ""]]);
        let mut reg = Registry::new();
        let summary = validate(&mut doc, &mut reg).unwrap();
        assert_eq!(summary.rows_errored, 1);
        assert!(reg.has_carrier("10"));
        assert!(!reg.has_carrier("11"));
    }
}
