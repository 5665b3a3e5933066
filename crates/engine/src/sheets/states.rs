//! ESTADOS — Brazilian state table. Abbreviations are checked against the
//! fixed federation list and state names are rewritten to their canonical
//! spelling.

use importval_doc::Document;

use crate::finding::SheetSummary;
use crate::header::{advisory, reconcile};
use crate::registry::Registry;
use crate::rowpass::SheetPass;
use crate::rules::{enum_field, optional_int, over_limit};

pub const SHEET: &str = "ESTADOS";

const EXPECTED: &[&str] = &["SiglaEstado", "NomeEstado", "Padrao", "ClienteNovoTabPreco"];

const BRAZIL_STATES: &[(&str, &str)] = &[
    ("AC", "Acre"),
    ("AL", "Alagoas"),
    ("AP", "Amapá"),
    ("AM", "Amazonas"),
    ("BA", "Bahia"),
    ("CE", "Ceará"),
    ("DF", "Distrito Federal"),
    ("ES", "Espírito Santo"),
    ("GO", "Goiás"),
    ("MA", "Maranhão"),
    ("MT", "Mato Grosso"),
    ("MS", "Mato Grosso do Sul"),
    ("MG", "Minas Gerais"),
    ("PA", "Pará"),
    ("PB", "Paraíba"),
    ("PR", "Paraná"),
    ("PE", "Pernambuco"),
    ("PI", "Piauí"),
    ("RJ", "Rio de Janeiro"),
    ("RN", "Rio Grande do Norte"),
    ("RS", "Rio Grande do Sul"),
    ("RO", "Rondônia"),
    ("RR", "Roraima"),
    ("SC", "Santa Catarina"),
    ("SP", "São Paulo"),
    ("SE", "Sergipe"),
    ("TO", "Tocantins"),
];

fn canonical_name(abbr: &str) -> Option<&'static str> {
    BRAZIL_STATES
        .iter()
        .find(|(a, _)| a.eq_ignore_ascii_case(abbr))
        .map(|&(_, n)| n)
}

pub fn validate(doc: &mut Document, _reg: &mut Registry) -> Option<SheetSummary> {
    let sheet = doc.sheet_mut(SHEET)?;
    let (headers, corrections) = reconcile(sheet, EXPECTED);
    let advisory = advisory(&corrections);
    let mut pass = SheetPass::begin(sheet, advisory);

    for row in 1..sheet.n_rows() {
        if sheet.row_is_blank(row) {
            continue;
        }
        let mut ctx = pass.snapshot(sheet, row);

        let abbr_col = headers.get("SiglaEstado");
        let name_col = headers.get("NomeEstado");
        let abbr = ctx.text(abbr_col).to_string();
        let upper = abbr.to_uppercase();
        if upper != abbr {
            ctx.set_text(abbr_col, upper.clone());
        }

        match canonical_name(&upper) {
            Some(canonical) => {
                let name = ctx.text(name_col).to_string();
                if name != canonical {
                    ctx.set_text(name_col, canonical);
                    ctx.warning(format!(
                        "Advertencia, 'NomeEstado' corrigido para '{canonical}'"
                    ));
                }
            }
            None => {
                ctx.warning("Advertencia, 'SiglaEstado' inválida");
                let name = ctx.text(name_col).to_string();
                if over_limit(&name, 20) {
                    ctx.warning("Advertencia, 'NomeEstado' excede 20 caracteres");
                }
            }
        }

        enum_field(&mut ctx, headers.get("Padrao"), "Padrao", &["1", "2"]);
        optional_int(
            &mut ctx,
            headers.get("ClienteNovoTabPreco"),
            "ClienteNovoTabPreco",
            0,
            3,
        );

        pass.finish_row(sheet, ctx);
    }

    Some(pass.finish(sheet))
}
