//! Final report sheet, inserted as the first sheet of the workbook. One
//! row per known staging sheet, with a hyperlink back to it and its row
//! counts, painted with the sheet's worst verdict.

use importval_doc::{CellValue, Document, Fill, Sheet};

use crate::finding::SheetSummary;

pub const REPORT_SHEET: &str = "RESULTADO DAS VALIDAÇÕES";

const MISSING_MESSAGE: &str = "Aba não encontrada ou não preenchida";

pub fn build(doc: &mut Document, entries: &[(String, Option<SheetSummary>)]) {
    let mut sheet = Sheet::new(REPORT_SHEET);
    sheet.set_text(0, 0, "Planilha");
    sheet.set_text(0, 1, "Mensagem");
    for col in 0..2 {
        sheet.set_fill(0, col, Fill::Header);
        sheet.set_bold(0, col, true);
    }

    let mut max_name = "Planilha".len();
    let mut max_msg = "Mensagem".len();
    for (i, (name, summary)) in entries.iter().enumerate() {
        let row = i + 1;
        let link = CellValue::Formula {
            source: format!("=HYPERLINK(\"#'{name}'!A1\",\"{name}\")"),
            cached: Some(name.clone()),
        };
        sheet.set_value(row, 0, link);
        let (message, fill) = match summary {
            Some(s) => (s.status_line(), s.worst_fill()),
            None => (MISSING_MESSAGE.to_string(), Fill::Neutral),
        };
        max_name = max_name.max(name.chars().count());
        max_msg = max_msg.max(message.chars().count());
        sheet.set_text(row, 1, message);
        sheet.set_fill(row, 0, fill);
        sheet.set_fill(row, 1, fill);
    }

    sheet.set_col_width(0, max_name as f64 * 0.8 + 8.0);
    sheet.set_col_width(1, max_msg as f64 * 0.8 + 8.0);
    sheet.auto_filter = true;

    doc.insert_sheet(0, sheet);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lands_first_with_links_and_fills() {
        let mut doc = Document::new();
        doc.push_sheet(Sheet::new("EMPRESA"));

        let ok = SheetSummary { rows_read: 3, rows_valid: 3, ..SheetSummary::default() };
        let bad = SheetSummary { rows_read: 2, rows_errored: 1, rows_valid: 1, ..SheetSummary::default() };
        build(
            &mut doc,
            &[
                ("EMPRESA".to_string(), Some(ok)),
                ("PRODUTOS".to_string(), Some(bad)),
                ("TRANSP".to_string(), None),
            ],
        );

        let report = &doc.sheets()[0];
        assert_eq!(report.name, REPORT_SHEET);
        assert_eq!(
            report.text(1, 1),
            "Linhas Lidas: 3 | Válidas: 3 | Advertências: 0 | Erros: 0"
        );
        assert_eq!(report.cell(2, 1).unwrap().fill, Some(Fill::Error));
        assert_eq!(report.text(3, 1), MISSING_MESSAGE);
        assert_eq!(report.cell(3, 0).unwrap().fill, Some(Fill::Neutral));

        match report.value(1, 0) {
            CellValue::Formula { source, cached } => {
                assert_eq!(source, "=HYPERLINK(\"#'EMPRESA'!A1\",\"EMPRESA\")");
                assert_eq!(cached.as_deref(), Some("EMPRESA"));
            }
            other => panic!("expected a hyperlink formula, got {other:?}"),
        }
    }
}
