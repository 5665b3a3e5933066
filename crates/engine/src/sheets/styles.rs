//! ESTILOS — product style registry sheet.

use std::collections::HashSet;

use importval_doc::Document;

use crate::dedup::normalize_key;
use crate::finding::{SheetSummary, Verdict};
use crate::header::{advisory, reconcile};
use crate::registry::Registry;
use crate::rowpass::SheetPass;
use crate::rules::{digits, over_limit};

pub const SHEET: &str = "ESTILOS";

const EXPECTED: &[&str] = &["CodEstilo", "Estilo"];

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

        let code = ctx.text(headers.get("CodEstilo")).to_string();
        let mut row_code = None;
        match digits(&code) {
            Some(n) if (1..=999_999).contains(&n) => {
                if seen.insert(normalize_key(&code)) {
                    row_code = Some(code);
                } else {
                    ctx.error("CodEstilo duplicado");
                }
            }
            _ => ctx.error("CodEstilo inválido"),
        }

        let name = ctx.text(headers.get("Estilo")).to_string();
        if name.is_empty() {
            ctx.error("Estilo ausente");
        } else if over_limit(&name, 45) {
            ctx.error("Estilo excede 45 caracteres");
        }

        let verdict = pass.finish_row(sheet, ctx);
        if verdict != Verdict::Error {
            if let Some(code) = row_code {
                reg.add_style(&code);
            }
        }
    }

    Some(pass.finish(sheet))
}
