//! PAGTO — payment term registry sheet.

use std::collections::HashSet;

use importval_doc::Document;

use crate::dedup::normalize_key;
use crate::finding::{SheetSummary, Verdict};
use crate::header::{advisory, reconcile};
use crate::registry::Registry;
use crate::rowpass::SheetPass;
use crate::rules::{digits, enum_field, optional_decimal, over_limit};

pub const SHEET: &str = "PAGTO";

const EXPECTED: &[&str] = &[
    "CodCondPagamento",
    "CondPagamento",
    "TipoCondPagamento",
    "CondPagamentoPadrao",
    "VlrMinimoPedido",
    "VlrMinimoComEstAtual",
    "VlrMinimoComEstFuturo",
    "VlrMinimoComEstEsgotado",
    "Desconto1",
    "Desconto2",
    "Desconto3",
];

const MIN_ORDER_FIELDS: &[&str] = &[
    "VlrMinimoPedido",
    "VlrMinimoComEstAtual",
    "VlrMinimoComEstFuturo",
    "VlrMinimoComEstEsgotado",
];

const DISCOUNT_FIELDS: &[&str] = &["Desconto1", "Desconto2", "Desconto3"];

pub fn validate(doc: &mut Document, reg: &mut Registry) -> Option<SheetSummary> {
    let sheet = doc.sheet_mut(SHEET)?;
    let (headers, corrections) = reconcile(sheet, EXPECTED);
    let advisory = advisory(&corrections);
    let mut pass = SheetPass::begin(sheet, advisory);
    let mut seen_codes: HashSet<String> = HashSet::new();

    for row in 1..sheet.n_rows() {
        if sheet.row_is_blank(row) {
            continue;
        }
        let mut ctx = pass.snapshot(sheet, row);

        let code = ctx.text(headers.get("CodCondPagamento")).to_string();
        let mut row_code = None;
        match digits(&code) {
            Some(n) if (1..=32_767).contains(&n) => {
                if seen_codes.insert(normalize_key(&code)) {
                    row_code = Some(code);
                } else {
                    ctx.error("CodCondPagamento duplicado");
                }
            }
            _ => ctx.error("CodCondPagamento inválido"),
        }

        let name = ctx.text(headers.get("CondPagamento")).to_string();
        if name.is_empty() {
            ctx.warning("Advertencia, 'CondPagamento' ausente");
        } else if over_limit(&name, 20) {
            ctx.warning("Advertencia, 'CondPagamento' excede 20 caracteres");
        }

        enum_field(
            &mut ctx,
            headers.get("TipoCondPagamento"),
            "TipoCondPagamento",
            &["N", "n", "E", "e"],
        );
        enum_field(
            &mut ctx,
            headers.get("CondPagamentoPadrao"),
            "CondPagamentoPadrao",
            &["S", "s", "N", "n"],
        );

        for field in MIN_ORDER_FIELDS {
            optional_decimal(&mut ctx, headers.get(field), field, 0.0, 9_999_999_999.99);
        }
        for field in DISCOUNT_FIELDS {
            optional_decimal(&mut ctx, headers.get(field), field, 0.0, 99.99);
        }

        let verdict = pass.finish_row(sheet, ctx);
        if verdict != Verdict::Error {
            if let Some(code) = row_code {
                reg.add_payment_term(&code);
            }
        }
    }

    Some(pass.finish(sheet))
}
