//! Pre-run cleanup.
//!
//! Input workbooks are often re-submissions of a previous run's output,
//! so annotations from that run must go before validation starts: the
//! report sheet, every RESULT column, the Duplicados marker column, cell
//! fills and bold flags. Cell text is trimmed at the same time so the
//! rules compare clean values.

use importval_doc::{CellValue, Document, Sheet};

use crate::report::REPORT_SHEET;
use crate::rowpass::RESULT_HEADER;

/// Marker column inserted next to CodProduto when key duplicates exist.
pub const DUP_HEADER: &str = "Duplicados";

pub fn cleanup(doc: &mut Document) {
    doc.remove_sheet(REPORT_SHEET);
    let names: Vec<String> = doc.sheets().iter().map(|s| s.name.clone()).collect();
    for name in names {
        if let Some(sheet) = doc.sheet_mut(&name) {
            cleanup_sheet(sheet);
        }
    }
}

fn cleanup_sheet(sheet: &mut Sheet) {
    // Delete from the right so earlier indices stay valid.
    let mut stale: Vec<usize> = (0..sheet.n_cols())
        .filter(|&c| {
            let h = sheet.text(0, c);
            h.eq_ignore_ascii_case(RESULT_HEADER) || h.eq_ignore_ascii_case(DUP_HEADER)
        })
        .collect();
    stale.reverse();
    for col in stale {
        sheet.delete_col(col);
    }

    for row in 0..sheet.n_rows() {
        for col in 0..sheet.n_cols() {
            let cell = sheet.cell_mut(row, col);
            cell.fill = None;
            cell.bold = false;
            let trimmed = match &cell.value {
                CellValue::Text(s) => {
                    let t = s.trim();
                    if t.is_empty() {
                        Some(CellValue::Empty)
                    } else if t.len() != s.len() {
                        Some(CellValue::Text(t.to_string()))
                    } else {
                        None
                    }
                }
                _ => None,
            };
            if let Some(value) = trimmed {
                cell.value = value;
            }
        }
    }
    sheet.auto_filter = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use importval_doc::{Cell, Fill};

    #[test]
    fn stale_annotations_are_removed() {
        let mut doc = Document::new();
        doc.push_sheet(Sheet::new(REPORT_SHEET));
        let mut s = Sheet::new("PRODUTOS");
        s.push_row(vec![
            Cell::text("CodProduto"),
            Cell::text(DUP_HEADER),
            Cell::text("Produto"),
            Cell::text(RESULT_HEADER),
        ]);
        s.push_row(vec![
            Cell::text(" 1 "),
            Cell::text("Duplicado"),
            Cell::text("Meia"),
            Cell::text("Validado com sucesso!"),
        ]);
        s.set_fill(1, 0, Fill::Valid);
        s.set_bold(1, 3, true);
        doc.push_sheet(s);

        cleanup(&mut doc);

        assert!(doc.sheet(REPORT_SHEET).is_none());
        let s = doc.sheet("PRODUTOS").unwrap();
        assert_eq!(s.n_cols(), 2);
        assert_eq!(s.text(0, 1), "Produto");
        assert_eq!(s.text(1, 0), "1");
        assert_eq!(s.cell(1, 0).unwrap().fill, None);
    }

    #[test]
    fn whitespace_only_cells_become_empty() {
        let mut doc = Document::new();
        let mut s = Sheet::new("REPR");
        s.push_row(vec![Cell::text("CodRepresentante")]);
        s.push_row(vec![Cell::text("   ")]);
        doc.push_sheet(s);
        cleanup(&mut doc);
        assert!(doc.sheet("REPR").unwrap().row_is_blank(1));
    }
}
