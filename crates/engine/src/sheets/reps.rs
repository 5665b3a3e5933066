//! REPR — sales representative registry sheet. At least one row is
//! mandatory; customers reference these codes later.

use std::collections::HashSet;

use importval_doc::Document;

use crate::dedup::normalize_key;
use crate::finding::{SheetSummary, Verdict};
use crate::header::{advisory, reconcile};
use crate::registry::Registry;
use crate::rowpass::SheetPass;
use crate::rules::{digits, over_limit};

pub const SHEET: &str = "REPR";

const EXPECTED: &[&str] = &["CodRepresentante", "Representante"];

pub fn validate(doc: &mut Document, reg: &mut Registry) -> Option<SheetSummary> {
    let sheet = doc.sheet_mut(SHEET)?;
    let (headers, corrections) = reconcile(sheet, EXPECTED);
    let advisory = advisory(&corrections);
    let mut pass = SheetPass::begin(sheet, advisory);

    let has_data = (1..sheet.n_rows()).any(|r| !sheet.row_is_blank(r));
    if !has_data {
        let mut ctx = pass.snapshot(sheet, 1);
        ctx.error("Inválido, ao menos um representante deve ser cadastrado");
        pass.finish_row(sheet, ctx);
        return Some(pass.finish(sheet));
    }

    let mut seen_codes: HashSet<String> = HashSet::new();
    let mut seen_names: HashSet<String> = HashSet::new();

    for row in 1..sheet.n_rows() {
        if sheet.row_is_blank(row) {
            continue;
        }
        let mut ctx = pass.snapshot(sheet, row);

        let code = ctx.text(headers.get("CodRepresentante")).to_string();
        let mut row_code = None;
        match digits(&code) {
            Some(n) if (1..=32_767).contains(&n) => {
                if seen_codes.insert(normalize_key(&code)) {
                    row_code = Some(code);
                } else {
                    ctx.error("CodRepresentante duplicado");
                }
            }
            _ => ctx.error("CodRepresentante inválido"),
        }

        let name = ctx.text(headers.get("Representante")).to_string();
        if name.is_empty() {
            ctx.error("Representante ausente");
        } else {
            if over_limit(&name, 20) {
                ctx.warning("Advertencia, 'Representante' excede 20 caracteres");
            }
            if !seen_names.insert(name.to_lowercase()) {
                ctx.warning("Advertencia, Representante repetido");
            }
        }

        let verdict = pass.finish_row(sheet, ctx);
        if verdict != Verdict::Error {
            if let Some(code) = row_code {
                reg.add_rep(&code);
            }
        }
    }

    Some(pass.finish(sheet))
}
