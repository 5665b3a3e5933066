//! Excel file import (xlsx, xls, xlsb, ods) and export (xlsx only).
//!
//! Import merges the data range with the formula range so formula cells
//! keep both their expression and the cached result the producing
//! application stored. Export writes values, formulas, the fixed fill
//! palette, column widths, hidden columns and the header auto filter.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use importval_doc::{Cell, CellValue, Document, Fill, Sheet};
use rust_xlsxwriter::{Color, Format, Workbook as XlsxWorkbook};

use crate::error::IoError;

pub fn read_document(path: &Path) -> Result<Document, IoError> {
    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| IoError::Read(e.to_string()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(IoError::Read("o arquivo não contém abas".to_string()));
    }

    let mut doc = Document::new();
    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| IoError::Read(format!("aba '{name}': {e}")))?;

        let mut sheet = Sheet::new(name.clone());
        let (start_row, start_col) = range.start().map(|(r, c)| (r as usize, c as usize)).unwrap_or((0, 0));
        for (r, row) in range.rows().enumerate() {
            for (c, data) in row.iter().enumerate() {
                let value = convert(data);
                if !matches!(value, CellValue::Empty) {
                    sheet.set_value(start_row + r, start_col + c, value);
                }
            }
        }

        // Formula range may start at a different offset than the data range.
        if let Ok(formulas) = workbook.worksheet_formula(name) {
            let (f_row, f_col) = formulas.start().map(|(r, c)| (r as usize, c as usize)).unwrap_or((0, 0));
            for (r, row) in formulas.rows().enumerate() {
                for (c, formula) in row.iter().enumerate() {
                    if formula.is_empty() {
                        continue;
                    }
                    let row = f_row + r;
                    let col = f_col + c;
                    let cached = match sheet.value(row, col) {
                        CellValue::Empty => None,
                        other => Some(other.to_text()),
                    };
                    sheet.set_value(
                        row,
                        col,
                        CellValue::Formula { source: format!("={formula}"), cached },
                    );
                }
            }
        }

        doc.push_sheet(sheet);
    }
    Ok(doc)
}

fn convert(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Text(if *b { "VERDADEIRO" } else { "FALSO" }.to_string()),
        // Dates surface in a shape the date rules know how to parse.
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) => CellValue::Text(d.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => CellValue::Empty,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}

pub fn write_document(doc: &Document, path: &Path) -> Result<(), IoError> {
    let mut workbook = XlsxWorkbook::new();

    for sheet in doc.sheets() {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&sheet.name)
            .map_err(|e| IoError::Write(e.to_string()))?;

        let n_rows = sheet.n_rows();
        let n_cols = sheet.n_cols();
        for row in 0..n_rows {
            for col in 0..n_cols {
                let Some(cell) = sheet.cell(row, col) else { continue };
                let r = row as u32;
                let c = col as u16;
                let format = cell_format(cell);
                let res = match &format {
                    None => match &cell.value {
                        CellValue::Empty => continue,
                        CellValue::Text(s) => worksheet.write_string(r, c, s),
                        CellValue::Number(n) => worksheet.write_number(r, c, *n),
                        CellValue::Formula { source, .. } => {
                            worksheet.write_formula(r, c, source.as_str())
                        }
                    },
                    Some(f) => match &cell.value {
                        CellValue::Empty => worksheet.write_blank(r, c, f),
                        CellValue::Text(s) => worksheet.write_string_with_format(r, c, s, f),
                        CellValue::Number(n) => worksheet.write_number_with_format(r, c, *n, f),
                        CellValue::Formula { source, .. } => {
                            worksheet.write_formula_with_format(r, c, source.as_str(), f)
                        }
                    },
                };
                res.map_err(|e| IoError::Write(e.to_string()))?;
            }
        }

        for col in 0..n_cols {
            if let Some(width) = sheet.col_width(col) {
                worksheet
                    .set_column_width(col as u16, width)
                    .map_err(|e| IoError::Write(e.to_string()))?;
            }
            if sheet.is_col_hidden(col) {
                worksheet
                    .set_column_hidden(col as u16)
                    .map_err(|e| IoError::Write(e.to_string()))?;
            }
        }

        if sheet.auto_filter && n_rows > 0 && n_cols > 0 {
            worksheet
                .autofilter(0, 0, (n_rows - 1) as u32, (n_cols - 1) as u16)
                .map_err(|e| IoError::Write(e.to_string()))?;
        }
    }

    workbook.save(path).map_err(|e| IoError::Write(e.to_string()))
}

/// One format per annotated cell: background fill, bold, and white text
/// on the black header fill.
fn cell_format(cell: &Cell) -> Option<Format> {
    if cell.fill.is_none() && !cell.bold {
        return None;
    }
    let mut format = Format::new();
    if let Some(fill) = cell.fill {
        format = format.set_background_color(Color::RGB(fill.rgb()));
        if fill == Fill::Header {
            format = format.set_font_color(Color::White);
        }
    }
    if cell.bold {
        format = format.set_bold();
    }
    Some(format)
}
