//! EMPRESA — fixed-layout company sheet.
//!
//! Values live in column C at fixed rows rather than in a table, so this
//! validator addresses cells directly and paints each checked cell with
//! its own outcome. The facts it extracts (name, code disciplines, branch
//! title defaults) feed every later sheet through the registry.

use importval_doc::{Document, Fill};

use crate::finding::{classify, result_message, Finding, SheetSummary, Verdict, VALID_MESSAGE};
use crate::registry::{AuxCodeKind, CodeKind, Registry};
use crate::value::resolve;

pub const SHEET: &str = "EMPRESA";

const NAME: (usize, usize) = (4, 2); // C5
const CODE_KIND: (usize, usize) = (6, 2); // C7
const CODE_LEN: (usize, usize) = (7, 2); // C8
const AUX_KIND: (usize, usize) = (9, 2); // C10
const AUX_LEN: (usize, usize) = (10, 2); // C11
const TITLE1: (usize, usize) = (38, 2); // C39
const TITLE2: (usize, usize) = (39, 2); // C40
const RESULT: (usize, usize) = (4, 3); // D5

pub fn validate(doc: &mut Document, reg: &mut Registry) -> Option<SheetSummary> {
    let sheet = doc.sheet_mut(SHEET)?;
    let mut findings: Vec<Finding> = Vec::new();

    let name = resolve(&sheet.value(NAME.0, NAME.1)).text;
    if name.is_empty() {
        findings.push(Finding::error("Nome da empresa ausente"));
        sheet.set_fill(NAME.0, NAME.1, Fill::Error);
    } else {
        sheet.set_fill(NAME.0, NAME.1, Fill::Valid);
    }
    reg.company.name = name;

    let kind_text = resolve(&sheet.value(CODE_KIND.0, CODE_KIND.1)).text;
    match kind_text.as_str() {
        "N=Numérico" => {
            reg.company.code_kind = CodeKind::Numeric;
            sheet.set_fill(CODE_KIND.0, CODE_KIND.1, Fill::Valid);
        }
        "A=Alfanumérico" => {
            reg.company.code_kind = CodeKind::Alphanumeric;
            sheet.set_fill(CODE_KIND.0, CODE_KIND.1, Fill::Valid);
        }
        _ => {
            findings.push(Finding::error("Tipo do código inválido em C7"));
            sheet.set_fill(CODE_KIND.0, CODE_KIND.1, Fill::Error);
        }
    }

    match checked_len(&resolve(&sheet.value(CODE_LEN.0, CODE_LEN.1)).text) {
        Ok(len) => {
            reg.company.code_len = len;
            sheet.set_fill(CODE_LEN.0, CODE_LEN.1, Fill::Valid);
        }
        Err(msg) => {
            findings.push(Finding::error(format!("Tamanho do código principal {msg}")));
            sheet.set_fill(CODE_LEN.0, CODE_LEN.1, Fill::Error);
        }
    }

    let aux_text = resolve(&sheet.value(AUX_KIND.0, AUX_KIND.1)).text;
    match aux_text.as_str() {
        "X=Não Usado" => {
            reg.company.aux_kind = AuxCodeKind::Unused;
            sheet.set_fill(AUX_KIND.0, AUX_KIND.1, Fill::Valid);
        }
        "N=Numérico" => {
            reg.company.aux_kind = AuxCodeKind::Numeric;
            sheet.set_fill(AUX_KIND.0, AUX_KIND.1, Fill::Valid);
        }
        "A=Alfanumérico" => {
            reg.company.aux_kind = AuxCodeKind::Alphanumeric;
            sheet.set_fill(AUX_KIND.0, AUX_KIND.1, Fill::Valid);
        }
        _ => {
            findings.push(Finding::error("Tipo do código auxiliar inválido em C10"));
            sheet.set_fill(AUX_KIND.0, AUX_KIND.1, Fill::Error);
        }
    }

    // The auxiliary length only matters when the auxiliary code is in use.
    if reg.company.aux_kind != AuxCodeKind::Unused {
        match checked_len(&resolve(&sheet.value(AUX_LEN.0, AUX_LEN.1)).text) {
            Ok(len) => {
                reg.company.aux_len = len;
                sheet.set_fill(AUX_LEN.0, AUX_LEN.1, Fill::Valid);
            }
            Err(msg) => {
                findings.push(Finding::error(format!("Tamanho do código auxiliar {msg}")));
                sheet.set_fill(AUX_LEN.0, AUX_LEN.1, Fill::Error);
            }
        }
    }

    reg.company.default_title1 = resolve(&sheet.value(TITLE1.0, TITLE1.1)).text;
    reg.company.default_title2 = resolve(&sheet.value(TITLE2.0, TITLE2.1)).text;

    let verdict = classify(&findings);
    let message = result_message(&findings);
    sheet.set_text(RESULT.0, RESULT.1, message.clone());
    sheet.set_fill(RESULT.0, RESULT.1, verdict.fill());
    sheet.set_bold(RESULT.0, RESULT.1, message == VALID_MESSAGE);

    let mut summary = SheetSummary::default();
    summary.count(verdict);
    Some(summary)
}

fn checked_len(text: &str) -> Result<usize, &'static str> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return Err("não numérico");
    }
    match text.parse::<usize>() {
        Ok(n) if (4..=20).contains(&n) => Ok(n),
        _ => Err("fora do intervalo (4-20)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use importval_doc::Sheet;

    fn company_doc(name: &str, kind: &str, len: &str, aux: &str, aux_len: &str) -> Document {
        let mut s = Sheet::new(SHEET);
        s.set_text(NAME.0, NAME.1, name);
        s.set_text(CODE_KIND.0, CODE_KIND.1, kind);
        s.set_text(CODE_LEN.0, CODE_LEN.1, len);
        s.set_text(AUX_KIND.0, AUX_KIND.1, aux);
        s.set_text(AUX_LEN.0, AUX_LEN.1, aux_len);
        let mut doc = Document::new();
        doc.push_sheet(s);
        doc
    }

    #[test]
    fn complete_company_passes_and_fills_profile() {
        let mut doc = company_doc("ACME", "N=Numérico", "6", "A=Alfanumérico", "8");
        let mut reg = Registry::new();
        let summary = validate(&mut doc, &mut reg).unwrap();
        assert_eq!(summary.rows_valid, 1);
        assert_eq!(reg.company.name, "ACME");
        assert_eq!(reg.company.code_kind, CodeKind::Numeric);
        assert_eq!(reg.company.code_len, 6);
        assert_eq!(reg.company.aux_kind, AuxCodeKind::Alphanumeric);
        assert_eq!(reg.company.aux_len, 8);
        let s = doc.sheet(SHEET).unwrap();
        assert_eq!(s.text(RESULT.0, RESULT.1), VALID_MESSAGE);
        assert!(s.cell(RESULT.0, RESULT.1).unwrap().bold);
    }

    #[test]
    fn missing_name_is_an_error() {
        let mut doc = company_doc("", "N=Numérico", "6", "X=Não Usado", "");
        let mut reg = Registry::new();
        let summary = validate(&mut doc, &mut reg).unwrap();
        assert_eq!(summary.rows_errored, 1);
        let s = doc.sheet(SHEET).unwrap();
        assert_eq!(s.cell(NAME.0, NAME.1).unwrap().fill, Some(Fill::Error));
        assert!(s.text(RESULT.0, RESULT.1).contains("Nome da empresa ausente"));
    }

    #[test]
    fn code_length_bounds() {
        let mut doc = company_doc("ACME", "N=Numérico", "3", "X=Não Usado", "");
        let mut reg = Registry::new();
        validate(&mut doc, &mut reg).unwrap();
        let s = doc.sheet(SHEET).unwrap();
        assert!(s
            .text(RESULT.0, RESULT.1)
            .contains("Tamanho do código principal fora do intervalo (4-20)"));

        let mut doc = company_doc("ACME", "N=Numérico", "seis", "X=Não Usado", "");
        validate(&mut doc, &mut Registry::new()).unwrap();
        let s = doc.sheet(SHEET).unwrap();
        assert!(s
            .text(RESULT.0, RESULT.1)
            .contains("Tamanho do código principal não numérico"));
    }

    #[test]
    fn unused_aux_skips_its_length() {
        let mut doc = company_doc("ACME", "A=Alfanumérico", "10", "X=Não Usado", "abc");
        let mut reg = Registry::new();
        let summary = validate(&mut doc, &mut reg).unwrap();
        assert_eq!(summary.rows_valid, 1);
        assert_eq!(reg.company.aux_kind, AuxCodeKind::Unused);
    }

    #[test]
    fn absent_sheet_returns_none() {
        let mut doc = Document::new();
        assert!(validate(&mut doc, &mut Registry::new()).is_none());
    }
}
