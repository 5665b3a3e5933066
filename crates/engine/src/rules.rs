//! Shared field rules.
//!
//! Small building blocks the sheet validators compose. Each helper reads
//! the row snapshot, queues edits and findings on the [`RowCtx`], and
//! reports whether the field passed so callers can gate registry inserts.

use crate::finding::Finding;
use crate::price::{format_comma, normalize_price, normalize_price_number, parse_decimal};
use crate::rowpass::RowCtx;

/// Parse a purely-numeric field. Signs, dots and spaces all disqualify.
pub fn digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Optional integer in `min..=max`; blank passes.
pub fn optional_int(
    ctx: &mut RowCtx,
    col: Option<usize>,
    field: &str,
    min: i64,
    max: i64,
) -> bool {
    let text = ctx.text(col).to_string();
    if text.is_empty() {
        return true;
    }
    match digits(&text) {
        Some(n) if (min..=max).contains(&n) => true,
        Some(_) => {
            ctx.error(format!("{field} fora do intervalo ({min}-{max})"));
            false
        }
        None => {
            ctx.error(format!("{field} deve ser inteiro"));
            false
        }
    }
}

/// Optional decimal in `min..=max`, rewritten to decimal-comma form.
/// Numeric cells and parseable text are normalized silently.
pub fn optional_decimal(
    ctx: &mut RowCtx,
    col: Option<usize>,
    field: &str,
    min: f64,
    max: f64,
) -> bool {
    let text = ctx.text(col).to_string();
    if text.is_empty() {
        return true;
    }
    let canonical = if ctx.is_number(col) {
        match text.replace(',', ".").parse::<f64>() {
            Ok(v) => normalize_price_number(v),
            Err(_) => text.clone(),
        }
    } else {
        normalize_price(&text).0
    };
    let Some(v) = parse_decimal(&canonical) else {
        ctx.error(format!("{field} inválido"));
        return false;
    };
    if !(min..=max).contains(&v) {
        ctx.error(format!(
            "{field} fora do intervalo ({}-{})",
            format_comma(min),
            format_comma(max)
        ));
        return false;
    }
    if canonical != text {
        ctx.set_text(col, canonical);
    }
    true
}

/// Closed-vocabulary field; blank passes, anything else is cleared and
/// flagged.
pub fn enum_field(ctx: &mut RowCtx, col: Option<usize>, field: &str, allowed: &[&str]) -> bool {
    let text = ctx.text(col).to_string();
    if text.is_empty() || allowed.contains(&text.as_str()) {
        return true;
    }
    ctx.clear(col);
    ctx.error(format!("{field} inválido"));
    false
}

/// Length advisory shared by the name-like columns.
pub fn over_limit(text: &str, max: usize) -> bool {
    text.chars().count() > max
}

/// Advisory used when a blank cell was filled in automatically.
pub fn autofill_note(field: &str) -> Finding {
    Finding::warning(format!("Advertencia, {field} corrigido automaticamente"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rowpass::SheetPass;
    use importval_doc::{Cell, CellValue, Sheet};

    fn row(values: &[&str]) -> (Sheet, SheetPass, RowCtx) {
        let mut s = Sheet::new("T");
        s.push_row((0..values.len()).map(|i| Cell::text(format!("C{i}"))).collect());
        s.push_row(values.iter().map(|&v| Cell::text(v)).collect());
        let pass = SheetPass::begin(&mut s, None);
        let ctx = pass.snapshot(&s, 1);
        (s, pass, ctx)
    }

    #[test]
    fn digits_rejects_signs_and_dots() {
        assert_eq!(digits("042"), Some(42));
        assert_eq!(digits("-1"), None);
        assert_eq!(digits("1.0"), None);
        assert_eq!(digits(""), None);
    }

    #[test]
    fn optional_int_distinguishes_shape_from_range() {
        let (_, _, mut ctx) = row(&[""]);
        assert!(optional_int(&mut ctx, Some(0), "QtdeMinima", 1, 999999));

        let (_, _, mut ctx) = row(&["abc"]);
        assert!(!optional_int(&mut ctx, Some(0), "QtdeMinima", 1, 999999));
        assert_eq!(ctx.findings()[0].message, "QtdeMinima deve ser inteiro");

        let (_, _, mut ctx) = row(&["0"]);
        assert!(!optional_int(&mut ctx, Some(0), "QtdeMinima", 1, 999999));
        assert_eq!(
            ctx.findings()[0].message,
            "QtdeMinima fora do intervalo (1-999999)"
        );
    }

    #[test]
    fn optional_decimal_rewrites_to_comma() {
        let (_, _, mut ctx) = row(&["12.5"]);
        assert!(optional_decimal(&mut ctx, Some(0), "Desconto1", 0.0, 99.99));
        assert_eq!(ctx.text(Some(0)), "12,50");
        assert!(ctx.findings().is_empty());
    }

    #[test]
    fn optional_decimal_range_message_uses_commas() {
        let (_, _, mut ctx) = row(&["150"]);
        assert!(!optional_decimal(&mut ctx, Some(0), "Desconto1", 0.0, 99.99));
        assert_eq!(
            ctx.findings()[0].message,
            "Desconto1 fora do intervalo (0,00-99,99)"
        );
    }

    #[test]
    fn numeric_cells_normalize_silently() {
        let mut s = Sheet::new("T");
        s.push_row(vec![Cell::text("VlrMinimoPedido")]);
        s.push_row(vec![Cell::new(CellValue::Number(23.9))]);
        let pass = SheetPass::begin(&mut s, None);
        let mut ctx = pass.snapshot(&s, 1);
        assert!(optional_decimal(&mut ctx, Some(0), "VlrMinimoPedido", 0.0, 9999999999.99));
        assert_eq!(ctx.text(Some(0)), "23,90");
    }

    #[test]
    fn enum_field_clears_bad_values() {
        let (_, _, mut ctx) = row(&["X"]);
        assert!(!enum_field(&mut ctx, Some(0), "CondPagamentoPadrao", &["S", "s", "N", "n"]));
        assert_eq!(ctx.text(Some(0)), "");
        assert_eq!(ctx.findings()[0].message, "CondPagamentoPadrao inválido");

        let (_, _, mut ctx) = row(&["s"]);
        assert!(enum_field(&mut ctx, Some(0), "CondPagamentoPadrao", &["S", "s", "N", "n"]));
    }
}
