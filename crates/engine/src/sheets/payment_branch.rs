//! PAGTOFILIAL — per-branch payment term overrides. Purely referential:
//! both codes must already exist in their registries.

use importval_doc::Document;

use crate::finding::SheetSummary;
use crate::header::{advisory, reconcile};
use crate::registry::Registry;
use crate::rowpass::SheetPass;
use crate::rules::optional_decimal;

pub const SHEET: &str = "PAGTOFILIAL";

const EXPECTED: &[&str] = &["CodCondPagamento", "CodFilial", "VlrMinimoPedido"];

pub fn validate(doc: &mut Document, reg: &mut Registry) -> Option<SheetSummary> {
    let sheet = doc.sheet_mut(SHEET)?;
    let (headers, corrections) = reconcile(sheet, EXPECTED);
    let advisory = advisory(&corrections);
    let mut pass = SheetPass::begin(sheet, advisory);

    for row in 1..sheet.n_rows() {
        if sheet.row_is_blank(row) {
            continue;
        }
        let mut ctx = pass.snapshot(sheet, row);

        let term = ctx.text(headers.get("CodCondPagamento")).to_string();
        if term.is_empty() {
            ctx.error("CodCondPagamento ausente");
        } else if !reg.has_payment_term(&term) {
            ctx.error("CodCondPagamento inexistente na aba PAGTO");
        }

        let branch = ctx.text(headers.get("CodFilial")).to_string();
        if branch.is_empty() {
            ctx.error("CodFilial ausente");
        } else if !reg.has_branch(&branch) {
            ctx.error("CodFilial inexistente na aba FILIAL");
        }

        optional_decimal(
            &mut ctx,
            headers.get("VlrMinimoPedido"),
            "VlrMinimoPedido",
            0.0,
            9_999_999_999.99,
        );

        pass.finish_row(sheet, ctx);
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

    fn registry() -> Registry {
        let mut reg = Registry::new();
        reg.add_payment_term("10");
        reg.add_branch("1");
        reg
    }

    #[test]
    fn known_references_pass() {
        let mut doc = doc_with_rows(&[&["10", "1", "50.5"]]);
        let summary = validate(&mut doc, &mut registry()).unwrap();
        assert_eq!(summary.rows_valid, 1);
        assert_eq!(doc.sheet(SHEET).unwrap().text(1, 2), "50,50");
    }

    #[test]
    fn unknown_term_and_branch_are_errors() {
        let mut doc = doc_with_rows(&[&["99", "9", ""]]);
        let summary = validate(&mut doc, &mut registry()).unwrap();
        assert_eq!(summary.rows_errored, 1);
        let msg = doc.sheet(SHEET).unwrap().text(1, 3);
        assert!(msg.contains("CodCondPagamento inexistente na aba PAGTO"));
        assert!(msg.contains("CodFilial inexistente na aba FILIAL"));
    }
}
