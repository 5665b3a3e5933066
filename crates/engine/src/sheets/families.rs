//! FAMILIAS — product family registry sheet.

use std::collections::HashSet;

use importval_doc::Document;

use crate::dedup::normalize_key;
use crate::finding::{SheetSummary, Verdict};
use crate::header::{advisory, reconcile};
use crate::registry::Registry;
use crate::rowpass::SheetPass;
use crate::rules::{digits, optional_decimal, optional_int, over_limit};

pub const SHEET: &str = "FAMILIAS";

const EXPECTED: &[&str] = &[
    "CodFamilia",
    "Familia",
    "MultiploFamilia",
    "MinimoFamilia",
    "DescontoFamilia",
];

pub fn validate(doc: &mut Document, reg: &mut Registry) -> Option<SheetSummary> {
    let sheet = doc.sheet_mut(SHEET)?;
    let (headers, corrections) = reconcile(sheet, EXPECTED);
    let advisory = advisory(&corrections);
    let mut pass = SheetPass::begin(sheet, advisory);
    let mut seen: HashSet<String> = HashSet::new();

    for row in 1..sheet.n_rows() {
        if sheet.row_is_blank(row) {
            continue;
        }
        let mut ctx = pass.snapshot(sheet, row);

        let code = ctx.text(headers.get("CodFamilia")).to_string();
        let mut row_code = None;
        match digits(&code) {
            Some(n) if (1..=999_999).contains(&n) => {
                if seen.insert(normalize_key(&code)) {
                    row_code = Some(code);
                } else {
                    ctx.error("CodFamilia duplicado");
                }
            }
            _ => ctx.error("CodFamilia inválido"),
        }

        let name = ctx.text(headers.get("Familia")).to_string();
        if name.is_empty() {
            ctx.error("Familia ausente");
        } else if over_limit(&name, 45) {
            ctx.error("Familia excede 45 caracteres");
        }

        optional_int(&mut ctx, headers.get("MultiploFamilia"), "MultiploFamilia", 1, 999_999);
        optional_int(&mut ctx, headers.get("MinimoFamilia"), "MinimoFamilia", 1, 999_999);
        optional_decimal(&mut ctx, headers.get("DescontoFamilia"), "DescontoFamilia", 0.0, 99.99);

        let verdict = pass.finish_row(sheet, ctx);
        if verdict != Verdict::Error {
            if let Some(code) = row_code {
                reg.add_family(&code);
            }
        }
    }

    Some(pass.finish(sheet))
}
