//! CLIENTES — customer base. References representatives and carriers and
//! reports key duplicates with the row where the code first appeared.

use importval_doc::Document;

use crate::dedup::KeyDupIndex;
use crate::finding::SheetSummary;
use crate::header::{advisory, reconcile};
use crate::registry::Registry;
use crate::rowpass::SheetPass;
use crate::rules::{digits, optional_int, over_limit};
use crate::value::resolve;

pub const SHEET: &str = "CLIENTES";

const EXPECTED: &[&str] = &[
    "CodCliente",
    "NomeFantasia",
    "CodRepresentante",
    "RazaoSocial",
    "Logradouro",
    "Bairro",
    "Cidade",
    "UF",
    "CEP",
    "CNPJCPF",
    "IERG",
    "Observacao",
    "CodTransportadora",
    "NomeTransportadora",
    "PrecoTabela",
    "NomeContato",
    "EMail",
    "DDD",
    "Telefone1",
    "Telefone2",
];

pub fn validate(doc: &mut Document, reg: &mut Registry) -> Option<SheetSummary> {
    let sheet = doc.sheet_mut(SHEET)?;
    let (headers, corrections) = reconcile(sheet, EXPECTED);
    let advisory = advisory(&corrections);

    // Counting pass so later occurrences can cite the first one.
    let mut dups = KeyDupIndex::new();
    if let Some(col) = headers.get("CodCliente") {
        for row in 1..sheet.n_rows() {
            if !sheet.row_is_blank(row) {
                dups.count(&resolve(&sheet.value(row, col)).text, row + 1);
            }
        }
    }

    let mut pass = SheetPass::begin(sheet, advisory);

    for row in 1..sheet.n_rows() {
        if sheet.row_is_blank(row) {
            continue;
        }
        let mut ctx = pass.snapshot(sheet, row);

        let code = ctx.text(headers.get("CodCliente")).to_string();
        match digits(&code) {
            Some(n) if (1..=9_999_999).contains(&n) => {
                if let Some(f) = dups.check("CodCliente", &code, ctx.row_num) {
                    ctx.push(f);
                }
            }
            _ => ctx.error("CodCliente inválido"),
        }

        let fantasy = ctx.text(headers.get("NomeFantasia")).to_string();
        if over_limit(&fantasy, 20) {
            ctx.warning("Advertencia, 'NomeFantasia' excede 20 caracteres");
        }

        let rep_col = headers.get("CodRepresentante");
        let rep = ctx.text(rep_col).to_string();
        if rep == "0" {
            ctx.clear(rep_col);
        } else if !rep.is_empty() && !reg.has_rep(&rep) {
            ctx.error("CodRepresentante inexistente");
        }

        let razao = ctx.text(headers.get("RazaoSocial")).to_string();
        if over_limit(&razao, 40) {
            ctx.error("RazaoSocial excede 40 caracteres");
        }

        let carrier_col = headers.get("CodTransportadora");
        let carrier = ctx.text(carrier_col).to_string();
        if !carrier.is_empty() {
            match reg.carrier_name(&carrier) {
                None => ctx.error("CodTransportadora inexistente"),
                Some(name) => {
                    let name = name.to_string();
                    let name_col = headers.get("NomeTransportadora");
                    if ctx.text(name_col) != name {
                        ctx.set_text(name_col, name);
                        ctx.warning("Advertencia, 'NomeTransportadora' corrigido automaticamente");
                    }
                }
            }
        }

        optional_int(&mut ctx, headers.get("PrecoTabela"), "PrecoTabela", 0, 3);

        pass.finish_row(sheet, ctx);
    }

    Some(pass.finish(sheet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use importval_doc::{Cell, Sheet};

    fn doc_with_rows(rows: &[&[(&str, &str)]]) -> Document {
        let mut s = Sheet::new(SHEET);
        s.push_row(EXPECTED.iter().map(|&h| Cell::text(h)).collect());
        for (i, fields) in rows.iter().enumerate() {
            for &(name, value) in fields.iter() {
                let col = EXPECTED.iter().position(|&h| h == name).unwrap();
                s.set_text(i + 1, col, value);
            }
        }
        let mut doc = Document::new();
        doc.push_sheet(s);
        doc
    }

    fn registry() -> Registry {
        let mut reg = Registry::new();
        reg.add_rep("5");
        reg.add_carrier("10", "Transportes Sul");
        reg
    }

    #[test]
    fn duplicate_codes_cite_the_first_row() {
        let mut doc = doc_with_rows(&[
            &[("CodCliente", "7"), ("RazaoSocial", "A")],
            &[("CodCliente", "007"), ("RazaoSocial", "B")],
        ]);
        let summary = validate(&mut doc, &mut registry()).unwrap();
        assert_eq!(summary.rows_valid, 1);
        assert_eq!(summary.rows_errored, 1);
        let s = doc.sheet(SHEET).unwrap();
        assert_eq!(
            s.text(2, 20),
            "CodCliente duplicado: 007 na linha 3 já existe como 7 na linha 2"
        );
    }

    #[test]
    fn zero_representative_is_cleared() {
        let mut doc = doc_with_rows(&[&[("CodCliente", "1"), ("CodRepresentante", "0")]]);
        let summary = validate(&mut doc, &mut registry()).unwrap();
        assert_eq!(summary.rows_valid, 1);
        assert_eq!(doc.sheet(SHEET).unwrap().text(1, 2), "");
    }

    #[test]
    fn unknown_representative_is_an_error() {
        let mut doc = doc_with_rows(&[&[("CodCliente", "1"), ("CodRepresentante", "9")]]);
        let summary = validate(&mut doc, &mut registry()).unwrap();
        assert_eq!(summary.rows_errored, 1);
    }

    #[test]
    fn carrier_name_is_synchronized() {
        let mut doc = doc_with_rows(&[&[
            ("CodCliente", "1"),
            ("CodTransportadora", "10"),
            ("NomeTransportadora", "Sul"),
        ]]);
        let summary = validate(&mut doc, &mut registry()).unwrap();
        assert_eq!(summary.rows_warned, 1);
        assert_eq!(doc.sheet(SHEET).unwrap().text(1, 13), "Transportes Sul");
    }

    #[test]
    fn long_razao_social_fails() {
        let mut doc = doc_with_rows(&[&[
            ("CodCliente", "1"),
            ("RazaoSocial", "Uma razão social exageradamente comprida para o campo"),
        ]]);
        let summary = validate(&mut doc, &mut registry()).unwrap();
        assert_eq!(summary.rows_errored, 1);
    }
}
