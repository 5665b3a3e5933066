//! Label projection: a flat companion workbook for printing shelf labels,
//! built from the validated product rows that request labels.

use importval_doc::{Document, Fill, Sheet};

use crate::header::header_map;
use crate::rules::digits;
use crate::sheets::products;

const LABEL_SHEET: &str = "Etiquetas";

/// Product names wrap onto two label lines of this many characters.
const LINE_LIMIT: usize = 23;

const COLUMNS: &[&str] = &[
    "CodProduto",
    "CodAuxiliarProduto",
    "Produto - Linha 1",
    "Produto - Linha 2",
    "QtdeMultipla",
    "QtdeMinima",
    "QtdeTabela1",
    "QtdeTabela2",
    "QtdeTabela3",
    "PrecoTabela1",
    "PrecoTabela2",
    "PrecoTabela3",
    "AliquotaIPI",
    "QtdeEtiquetas",
];

/// Split on word boundaries into two lines of at most `limit` characters.
/// A word longer than the limit is cut; text past the second line drops.
pub fn split_text(text: &str, limit: usize) -> (String, String) {
    let mut lines = [String::new(), String::new()];
    let mut current = 0;
    for word in text.split_whitespace() {
        let word: String = word.chars().take(limit).collect();
        loop {
            let line = &mut lines[current];
            let needed = word.chars().count() + if line.is_empty() { 0 } else { 1 };
            if line.chars().count() + needed <= limit {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&word);
                break;
            }
            if current == 1 {
                let [a, b] = lines;
                return (a, b);
            }
            current = 1;
        }
    }
    let [a, b] = lines;
    (a, b)
}

/// Project the validated catalog into the label workbook, or `None` when
/// no row asks for labels.
pub fn build_labels(doc: &Document) -> Option<Document> {
    let source = doc.sheet(products::SHEET)?;
    let headers = header_map(source);

    let mut sheet = Sheet::new(LABEL_SHEET);
    for (col, &name) in COLUMNS.iter().enumerate() {
        sheet.set_text(0, col, name);
        sheet.set_fill(0, col, Fill::Header);
        sheet.set_bold(0, col, true);
    }

    let mut out_row = 1;
    for row in 1..source.n_rows() {
        let qty = headers
            .get("QtdeEtiquetas")
            .map(|c| source.text(row, c))
            .unwrap_or_default();
        if !matches!(digits(&qty), Some(n) if n > 0) {
            continue;
        }
        let name = headers
            .get("Produto")
            .map(|c| source.text(row, c))
            .unwrap_or_default();
        let (line1, line2) = split_text(&name, LINE_LIMIT);
        for (out_col, &dest) in COLUMNS.iter().enumerate() {
            let text = match dest {
                "Produto - Linha 1" => line1.clone(),
                "Produto - Linha 2" => line2.clone(),
                field => headers.get(field).map(|c| source.text(row, c)).unwrap_or_default(),
            };
            sheet.set_text(out_row, out_col, text);
        }
        out_row += 1;
    }

    if out_row == 1 {
        return None;
    }
    let mut out = Document::new();
    out.push_sheet(sheet);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use importval_doc::Cell;

    #[test]
    fn split_respects_word_boundaries() {
        let (a, b) = split_text("Meia Esportiva Algodão Premium", 23);
        assert_eq!(a, "Meia Esportiva Algodão");
        assert_eq!(b, "Premium");
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let (a, b) = split_text("Meia", 23);
        assert_eq!(a, "Meia");
        assert_eq!(b, "");
    }

    #[test]
    fn overflow_past_two_lines_is_dropped() {
        let (a, b) = split_text(
            "Uma descrição de produto realmente muito longa que não cabe em duas linhas",
            23,
        );
        assert!(a.chars().count() <= 23);
        assert!(b.chars().count() <= 23);
        assert_eq!(a, "Uma descrição de");
        assert_eq!(b, "produto realmente muito");
    }

    fn products_doc(rows: &[(&str, &str, &str)]) -> Document {
        let mut s = Sheet::new(products::SHEET);
        s.push_row(
            ["CodProduto", "Produto", "PrecoTabela1", "QtdeEtiquetas"]
                .iter()
                .map(|&h| Cell::text(h))
                .collect(),
        );
        for (i, &(code, name, qty)) in rows.iter().enumerate() {
            s.set_text(i + 1, 0, code);
            s.set_text(i + 1, 1, name);
            s.set_text(i + 1, 2, "10,00");
            s.set_text(i + 1, 3, qty);
        }
        let mut doc = Document::new();
        doc.push_sheet(s);
        doc
    }

    #[test]
    fn only_rows_requesting_labels_project() {
        let doc = products_doc(&[("1", "Meia Lisa", "3"), ("2", "Meia Xadrez", ""), ("3", "Meia", "0")]);
        let labels = build_labels(&doc).unwrap();
        let s = &labels.sheets()[0];
        assert_eq!(s.name, LABEL_SHEET);
        assert_eq!(s.n_rows(), 2);
        assert_eq!(s.text(1, 0), "1");
        assert_eq!(s.text(1, 2), "Meia Lisa");
        assert_eq!(s.text(1, 3), "");
        assert_eq!(s.text(1, 9), "10,00");
        assert_eq!(s.text(1, 13), "3");
    }

    #[test]
    fn no_labels_means_no_workbook() {
        let doc = products_doc(&[("1", "Meia", "")]);
        assert!(build_labels(&doc).is_none());
        assert!(build_labels(&Document::new()).is_none());
    }
}
