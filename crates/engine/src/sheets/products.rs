//! PRODUTOS — the product catalog, by far the largest sheet.
//!
//! Columns are located by their actual row-1 names instead of a fixed
//! layout, so extra or reordered columns survive. Whole-row duplicates
//! are deleted up front; key duplicates get a grey "Duplicados" marker
//! column inserted next to CodProduto. Validation itself runs the usual
//! two phases per row, with a progress callback for large catalogs.

use chrono::{NaiveDate, NaiveDateTime};
use importval_doc::{Document, Fill};

use crate::cleanup::DUP_HEADER;
use crate::dedup::{delete_whole_row_duplicates, KeyDupIndex};
use crate::finding::SheetSummary;
use crate::header::{header_map, HeaderMap};
use crate::price::{format_comma, normalize_price, normalize_price_number, parse_decimal};
use crate::progress::{ImageSet, Progress};
use crate::registry::{AuxCodeKind, CodeKind, Registry};
use crate::rowpass::{RowCtx, SheetPass};
use crate::rules::{digits, enum_field, optional_decimal, optional_int, over_limit};
use crate::value::resolve;

pub const SHEET: &str = "PRODUTOS";

const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d"];

pub fn validate(
    doc: &mut Document,
    reg: &Registry,
    images: &ImageSet,
    progress: &mut dyn Progress,
    row_interval: usize,
) -> Option<SheetSummary> {
    let sheet = doc.sheet_mut(SHEET)?;

    delete_whole_row_duplicates(sheet, &[]);

    let mut headers = header_map(sheet);

    // First pass: drop literal "0" placeholders and count key occurrences.
    let cod_col = headers.get("CodProduto");
    let aux_col = headers.get("CodAuxiliarProduto");
    let mut cod_dups = KeyDupIndex::new();
    let mut aux_dups = KeyDupIndex::new();
    let mut data_rows = 0usize;
    for row in 1..sheet.n_rows() {
        if sheet.row_is_blank(row) {
            continue;
        }
        data_rows += 1;
        for col in 0..sheet.n_cols() {
            if resolve(&sheet.value(row, col)).text == "0" {
                sheet.set_value(row, col, importval_doc::CellValue::Empty);
            }
        }
        if let Some(c) = cod_col {
            cod_dups.count(&resolve(&sheet.value(row, c)).text, row + 1);
        }
        if let Some(c) = aux_col {
            aux_dups.count(&resolve(&sheet.value(row, c)).text, row + 1);
        }
    }

    // Marker column only when at least one key value repeats.
    let dup_col = if cod_dups.has_duplicates() || aux_dups.has_duplicates() {
        cod_col.map(|c| {
            sheet.insert_col(c + 1);
            sheet.set_text(0, c + 1, DUP_HEADER);
            sheet.set_fill(0, c + 1, Fill::Header);
            sheet.set_bold(0, c + 1, true);
            c + 1
        })
    } else {
        None
    };
    if dup_col.is_some() {
        headers = header_map(sheet);
    }

    let mut pass = SheetPass::begin(sheet, None);

    let interval = if row_interval > 0 {
        row_interval
    } else {
        (data_rows / 100).max(100)
    };
    let mut done = 0usize;

    for row in 1..sheet.n_rows() {
        if sheet.row_is_blank(row) {
            continue;
        }
        let mut ctx = pass.snapshot(sheet, row);

        let code = ctx.text(headers.get("CodProduto")).to_string();
        check_product_code(&mut ctx, &code, reg);
        if let Some(f) = cod_dups.check("CodProduto", &code, ctx.row_num) {
            ctx.push(f);
        }

        let aux = ctx.text(headers.get("CodAuxiliarProduto")).to_string();
        check_aux_code(&mut ctx, &aux, reg);
        if let Some(f) = aux_dups.check("CodAuxiliarProduto", &aux, ctx.row_num) {
            ctx.push(f);
        }

        let name = ctx.text(headers.get("Produto")).to_string();
        if name.is_empty() {
            ctx.error("Produto vazio");
        } else if over_limit(&name, 45) {
            ctx.warning("Advertencia, 'Produto' excede 45 caracteres");
        }

        check_branch(&mut ctx, &headers, reg);

        check_reference(&mut ctx, &headers, "CodFamilia", |c| reg.has_family(c));
        check_reference(&mut ctx, &headers, "CodEstilo", |c| reg.has_style(c));

        optional_int(&mut ctx, headers.get("QtdeMultipla"), "QtdeMultipla", 1, 999_999);
        optional_int(&mut ctx, headers.get("QtdeMinima"), "QtdeMinima", 1, 999_999);

        let tiers_in_play = check_quantity_tiers(&mut ctx, &headers);
        check_prices(&mut ctx, &headers, tiers_in_play);

        optional_decimal(
            &mut ctx,
            headers.get("LimiteDescIndividual"),
            "LimiteDescIndividual",
            0.0,
            99.99,
        );

        let grade = ctx.text(headers.get("MultiploGrade")).to_string();
        optional_int(&mut ctx, headers.get("MultiploGrade"), "MultiploGrade", 1, 999_999);
        let grade_disc = ctx.text(headers.get("DescontoGrade")).to_string();
        if !grade_disc.is_empty() && grade.is_empty() {
            ctx.error("DescontoGrade requer MultiploGrade preenchido");
        } else {
            optional_decimal(&mut ctx, headers.get("DescontoGrade"), "DescontoGrade", 0.0, 99.99);
        }

        enum_field(
            &mut ctx,
            headers.get("PrecoPromocional"),
            "PrecoPromocional",
            &["S", "s", "N", "n"],
        );
        optional_decimal(&mut ctx, headers.get("AliquotaIPI"), "AliquotaIPI", 0.0, 99.99);
        enum_field(
            &mut ctx,
            headers.get("TipoVendaSemEstoque"),
            "TipoVendaSemEstoque",
            &["L", "l", "B", "b", "C", "c"],
        );

        optional_int(&mut ctx, headers.get("QtdeEstoqueAtual"), "QtdeEstoqueAtual", 1, 999_999);
        optional_int(&mut ctx, headers.get("QtdeEstoqueFuturo"), "QtdeEstoqueFuturo", 1, 999_999);
        check_future_date(&mut ctx, &headers);

        check_photo(&mut ctx, &headers, images);

        optional_int(&mut ctx, headers.get("QtdeEtiquetas"), "QtdeEtiquetas", 1, 999);

        pass.finish_row(sheet, ctx);

        // Marker lists the colliding values, overriding the row paint.
        if let Some(dc) = dup_col {
            let mut dup_values: Vec<&str> = Vec::new();
            if cod_dups.is_duplicated(&code) {
                dup_values.push(&code);
            }
            if aux_dups.is_duplicated(&aux) {
                dup_values.push(&aux);
            }
            if !dup_values.is_empty() {
                sheet.set_text(row, dc, dup_values.join(";"));
                sheet.set_fill(row, dc, Fill::Duplicate);
            }
        }

        done += 1;
        if done % interval == 0 && data_rows > 0 {
            let percent = 50 + (done * 38 / data_rows) as u8;
            progress.report(percent, &format!("Validando PRODUTOS: {done}/{data_rows}"));
        }
    }

    let summary = pass.finish(sheet);

    // Junk columns without a header stay in the file but out of sight.
    for col in 0..sheet.n_cols() {
        if sheet.text(0, col).is_empty() {
            sheet.hide_col(col);
        }
    }

    Some(summary)
}

fn check_product_code(ctx: &mut RowCtx, code: &str, reg: &Registry) {
    if code.is_empty() {
        ctx.error("CodProduto ausente");
        return;
    }
    match reg.company.code_kind {
        CodeKind::Numeric => {
            if digits(code).is_none() {
                ctx.error("CodProduto inválido (deve ser numérico)");
            } else if code.chars().count() > reg.company.code_len {
                ctx.error("CodProduto inválido (excede tamanho permitido)");
            }
        }
        CodeKind::Alphanumeric => {
            if code.chars().count() > reg.company.code_len {
                ctx.error("CodProduto excede tamanho permitido");
            }
        }
    }
}

fn check_aux_code(ctx: &mut RowCtx, aux: &str, reg: &Registry) {
    if aux.is_empty() {
        return;
    }
    match reg.company.aux_kind {
        AuxCodeKind::Unused => {
            ctx.error("CodAuxiliarProduto não permitido (configurado como não usado)");
        }
        AuxCodeKind::Numeric => {
            if digits(aux).is_none() {
                ctx.error("CodAuxiliarProduto inválido (deve ser numérico)");
            } else if aux.chars().count() > reg.company.aux_len {
                ctx.error("CodAuxiliarProduto excede tamanho permitido");
            }
        }
        AuxCodeKind::Alphanumeric => {
            if aux.chars().count() > reg.company.aux_len {
                ctx.error("CodAuxiliarProduto excede tamanho permitido");
            }
        }
    }
}

fn check_branch(ctx: &mut RowCtx, headers: &HeaderMap, reg: &Registry) {
    let col = headers.get("CodFilial");
    let branch = ctx.text(col).to_string();
    if branch.chars().count() > 40 {
        ctx.warning("Advertencia, 'CodFilial' excedeu o limite de caracteres");
    }
    if branch.is_empty() {
        match reg.single_branch() {
            Some(only) => {
                let only = only.to_string();
                ctx.set_text(col, only);
                ctx.warning("Advertencia, CodFilial corrigido automaticamente");
            }
            None => ctx.error("CodFilial ausente e múltiplas opções disponíveis"),
        }
    } else if !reg.has_branch(&branch) {
        match reg.single_branch() {
            Some(only) => {
                let only = only.to_string();
                ctx.set_text(col, only);
                ctx.warning("Advertencia, CodFilial corrigido automaticamente");
            }
            None => ctx.error("CodFilial inexistente"),
        }
    }
}

fn check_reference(
    ctx: &mut RowCtx,
    headers: &HeaderMap,
    field: &str,
    exists: impl Fn(&str) -> bool,
) {
    let value = ctx.text(headers.get(field)).to_string();
    if value.is_empty() {
        return;
    }
    if digits(&value).is_none() {
        ctx.error(format!("{field} deve ser inteiro"));
    } else if !exists(&value) {
        ctx.error(format!("{field} inexistente"));
    }
}

/// Presence and ordering of the three quantity tiers. Returns whether the
/// tier system is in play, which switches the price hierarchy on.
fn check_quantity_tiers(ctx: &mut RowCtx, headers: &HeaderMap) -> bool {
    let t1 = ctx.text(headers.get("QtdeTabela1")).to_string();
    let t2 = ctx.text(headers.get("QtdeTabela2")).to_string();
    let t3 = ctx.text(headers.get("QtdeTabela3")).to_string();

    if !t3.is_empty() && (t1.is_empty() || t2.is_empty()) {
        ctx.error("QtdeTabela3 requer QtdeTabela1 e QtdeTabela2 preenchidas");
    } else if !t1.is_empty() && t2.is_empty() {
        ctx.error("QtdeTabela1 não pode estar sozinha - QtdeTabela2 é obrigatória");
    } else if !t2.is_empty() && t1.is_empty() {
        ctx.error("QtdeTabela2 requer QtdeTabela1 preenchida");
    }

    let ok1 = optional_int(ctx, headers.get("QtdeTabela1"), "QtdeTabela1", 1, 999_999);
    let ok2 = optional_int(ctx, headers.get("QtdeTabela2"), "QtdeTabela2", 1, 999_999);
    let ok3 = optional_int(ctx, headers.get("QtdeTabela3"), "QtdeTabela3", 1, 999_999);

    if ok1 && ok2 {
        if let (Some(a), Some(b)) = (digits(&t1), digits(&t2)) {
            if a >= b {
                ctx.error("QtdeTabela1 deve ser menor que QtdeTabela2");
            }
        }
    }
    if ok2 && ok3 {
        if let (Some(b), Some(c)) = (digits(&t2), digits(&t3)) {
            if b >= c {
                ctx.error("QtdeTabela2 deve ser menor que QtdeTabela3");
            }
        }
    }

    !t2.is_empty()
}

/// Normalize a price column in place. Text rewrites carry an advisory,
/// numeric cells convert silently. Returns the parsed value when usable.
fn normalize_price_field(ctx: &mut RowCtx, headers: &HeaderMap, field: &str) -> Option<f64> {
    let col = headers.get(field);
    let text = ctx.text(col).to_string();
    if text.is_empty() {
        return None;
    }
    let canonical = if ctx.is_number(col) {
        match text.replace(',', ".").parse::<f64>() {
            Ok(v) => normalize_price_number(v),
            Err(_) => text.clone(),
        }
    } else {
        let (canonical, changed) = normalize_price(&text);
        if changed {
            ctx.warning(format!(
                "Advertencia: {field} corrigido de '{text}' para '{canonical}'"
            ));
        }
        canonical
    };
    if canonical != text {
        ctx.set_text(col, canonical.clone());
    }
    match parse_decimal(&canonical) {
        Some(v) => Some(v),
        None => {
            ctx.error(format!("{field} inválido"));
            None
        }
    }
}

fn check_prices(ctx: &mut RowCtx, headers: &HeaderMap, tiers_in_play: bool) {
    let range = 0.01..=999_999.99;
    let range_msg = |field: &str| {
        format!(
            "{field} fora do intervalo ({}-{})",
            format_comma(0.01),
            format_comma(999_999.99)
        )
    };

    let p1 = if ctx.text(headers.get("PrecoTabela1")).is_empty() {
        ctx.error("PrecoTabela1 ausente");
        None
    } else {
        normalize_price_field(ctx, headers, "PrecoTabela1").and_then(|v| {
            if range.contains(&v) {
                Some(v)
            } else {
                ctx.error(range_msg("PrecoTabela1"));
                None
            }
        })
    };

    let mut check_tiered = |field: &str, floor: Option<f64>, must_be_under: &str| {
        let v = normalize_price_field(ctx, headers, field)?;
        if !range.contains(&v) {
            ctx.error(range_msg(field));
            return None;
        }
        if tiers_in_play {
            if let Some(above) = floor {
                if v >= above {
                    ctx.error(format!("{field} deve ser menor que {must_be_under}"));
                }
            }
        }
        Some(v)
    };

    let p2 = check_tiered("PrecoTabela2", p1, "PrecoTabela1");
    check_tiered("PrecoTabela3", p2, "PrecoTabela2");
}

fn check_future_date(ctx: &mut RowCtx, headers: &HeaderMap) {
    let col = headers.get("DtEstoqueFuturo");
    let text = ctx.text(col).to_string();
    if text.is_empty() {
        return;
    }
    let parsed = DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(&text, f).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        });
    match parsed {
        Some(date) => {
            let canonical = date.format("%d/%m/%Y").to_string();
            if canonical != text {
                ctx.set_text(col, canonical);
            }
            if ctx.text(headers.get("QtdeEstoqueFuturo")).is_empty() {
                ctx.info(
                    "Advertência(s): QtdeEstoqueFuturo não contém saldo suficiente para a DtEstoqueFuturo",
                );
            }
        }
        None => ctx.error("DtEstoqueFuturo com formato inválido"),
    }
}

fn check_photo(ctx: &mut RowCtx, headers: &HeaderMap, images: &ImageSet) {
    let path = ctx.text(headers.get("PathFotografia")).to_string();
    if path.is_empty() {
        return;
    }
    if over_limit(&path, 60) {
        ctx.warning("Advertencia, 'PathFotografia' excede 60 caracteres");
    }
    if images.exists(&path) == Some(false) {
        let dir = images.dir().unwrap_or("");
        ctx.warning(format!("Advertencia: '{path}' não existe na pasta {dir}"));
    }
}
