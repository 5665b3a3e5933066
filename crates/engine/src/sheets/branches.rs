//! FILIAL — branch registry sheet.
//!
//! An empty branch table is legal input: a single branch is seeded from
//! the company profile before validation so that every workbook leaves
//! with at least one branch on record.

use std::collections::HashSet;

use importval_doc::Document;

use crate::dedup::normalize_key;
use crate::finding::{SheetSummary, Verdict};
use crate::header::{advisory, reconcile};
use crate::registry::Registry;
use crate::rowpass::SheetPass;
use crate::rules::{autofill_note, digits};

pub const SHEET: &str = "FILIAL";

const EXPECTED: &[&str] = &[
    "CodFilial",
    "Filial",
    "TituloAdicional1",
    "TituloAdicional2",
    "Logotipo",
];

pub fn validate(doc: &mut Document, reg: &mut Registry) -> Option<SheetSummary> {
    let sheet = doc.sheet_mut(SHEET)?;
    let (headers, corrections) = reconcile(sheet, EXPECTED);
    let advisory = advisory(&corrections);

    // Seed a default branch when the table has no data rows.
    let has_data = (1..sheet.n_rows()).any(|r| !sheet.row_is_blank(r));
    if !has_data {
        if let Some(c) = headers.get("CodFilial") {
            sheet.set_text(1, c, "1");
        }
        if let Some(c) = headers.get("Filial") {
            sheet.set_text(1, c, reg.company.name.clone());
        }
        if let Some(c) = headers.get("TituloAdicional1") {
            if !reg.company.default_title1.is_empty() {
                sheet.set_text(1, c, reg.company.default_title1.clone());
            }
        }
        if let Some(c) = headers.get("TituloAdicional2") {
            if !reg.company.default_title2.is_empty() {
                sheet.set_text(1, c, reg.company.default_title2.clone());
            }
        }
    }

    let mut pass = SheetPass::begin(sheet, advisory);
    let mut seen_codes: HashSet<String> = HashSet::new();
    let mut seen_names: HashSet<String> = HashSet::new();

    for row in 1..sheet.n_rows() {
        if sheet.row_is_blank(row) {
            continue;
        }
        let mut ctx = pass.snapshot(sheet, row);
        if !has_data && row == 1 {
            ctx.push(autofill_note("Filial"));
        }

        let cod_col = headers.get("CodFilial");
        let mut code = ctx.text(cod_col).to_string();
        if code.chars().count() > 40 {
            ctx.warning("Advertencia, 'CodFilial' excedeu o limite de caracteres");
        }
        if code.is_empty() {
            code = "1".to_string();
            ctx.set_text(cod_col, "1");
            ctx.push(autofill_note("CodFilial"));
        }
        let mut row_code = None;
        match digits(&code) {
            Some(n) if (1..=999_999).contains(&n) => {
                if seen_codes.insert(normalize_key(&code)) {
                    row_code = Some(code);
                } else {
                    ctx.error("CodFilial duplicado");
                }
            }
            _ => ctx.error("CodFilial inválido"),
        }

        let name_col = headers.get("Filial");
        let mut name = ctx.text(name_col).to_string();
        if name.is_empty() {
            if reg.company.name.is_empty() {
                ctx.error("Filial ausente e sem nome da empresa");
            } else {
                name = reg.company.name.clone();
                ctx.set_text(name_col, name.clone());
                ctx.push(autofill_note("Filial"));
            }
        }
        if !name.is_empty() && !seen_names.insert(name.to_lowercase()) {
            ctx.error("Filial duplicada");
        }

        let verdict = pass.finish_row(sheet, ctx);
        if verdict != Verdict::Error {
            if let Some(code) = row_code {
                reg.add_branch(&code);
            }
        }
    }

    Some(pass.finish(sheet))
}
