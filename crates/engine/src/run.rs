//! Run orchestration: cleanup, the eleven sheet validators in dependency
//! order, the final report sheet, and the overall approval status.

use importval_doc::Document;
use serde::Serialize;

use crate::cleanup::cleanup;
use crate::finding::{RunStatus, SheetSummary};
use crate::progress::{ImageSet, Progress};
use crate::registry::Registry;
use crate::report;
use crate::sheets;

/// Validation order. Registries are filled before the sheets that read
/// them; products go last because they reference almost everything.
pub const SHEET_ORDER: &[&str] = &[
    sheets::company::SHEET,
    sheets::branches::SHEET,
    sheets::reps::SHEET,
    sheets::payment::SHEET,
    sheets::payment_branch::SHEET,
    sheets::carriers::SHEET,
    sheets::states::SHEET,
    sheets::customers::SHEET,
    sheets::families::SHEET,
    sheets::styles::SHEET,
    sheets::products::SHEET,
];

/// A workbook without these sheets cannot be imported at all.
pub const REQUIRED_SHEETS: &[&str] = &[
    sheets::company::SHEET,
    sheets::branches::SHEET,
    sheets::reps::SHEET,
];

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Product-sheet progress interval in rows; 0 picks one from the
    /// sheet size.
    pub progress_row_interval: usize,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub company_name: String,
    pub missing_required: Vec<String>,
    pub summaries: Vec<(String, Option<SheetSummary>)>,
}

pub fn run(
    doc: &mut Document,
    images: &ImageSet,
    progress: &mut dyn Progress,
    opts: &RunOptions,
) -> RunReport {
    progress.report(0, "Limpando anotações anteriores");
    cleanup(doc);

    let mut reg = Registry::new();
    let mut summaries: Vec<(String, Option<SheetSummary>)> = Vec::new();

    // Everything before PRODUTOS shares the 5-50% band.
    let plain = &SHEET_ORDER[..SHEET_ORDER.len() - 1];
    for (i, &name) in plain.iter().enumerate() {
        let percent = 5 + (i * 45 / plain.len()) as u8;
        progress.report(percent, &format!("Validando {name}"));
        let summary = match name {
            sheets::company::SHEET => sheets::company::validate(doc, &mut reg),
            sheets::branches::SHEET => sheets::branches::validate(doc, &mut reg),
            sheets::reps::SHEET => sheets::reps::validate(doc, &mut reg),
            sheets::payment::SHEET => sheets::payment::validate(doc, &mut reg),
            sheets::payment_branch::SHEET => sheets::payment_branch::validate(doc, &mut reg),
            sheets::carriers::SHEET => sheets::carriers::validate(doc, &mut reg),
            sheets::states::SHEET => sheets::states::validate(doc, &mut reg),
            sheets::customers::SHEET => sheets::customers::validate(doc, &mut reg),
            sheets::families::SHEET => sheets::families::validate(doc, &mut reg),
            sheets::styles::SHEET => sheets::styles::validate(doc, &mut reg),
            _ => None,
        };
        summaries.push((name.to_string(), summary));
    }

    progress.report(50, "Validando PRODUTOS");
    let products = sheets::products::validate(
        doc,
        &reg,
        images,
        progress,
        opts.progress_row_interval,
    );
    summaries.push((sheets::products::SHEET.to_string(), products));

    progress.report(88, "Gerando relatório final");
    report::build(doc, &summaries);

    let missing_required: Vec<String> = REQUIRED_SHEETS
        .iter()
        .filter(|&&name| {
            summaries
                .iter()
                .any(|(n, s)| n == name && s.is_none())
        })
        .map(|&n| n.to_string())
        .collect();

    let status = overall_status(&summaries, &missing_required);
    progress.report(100, "Validação concluída");

    RunReport {
        status,
        company_name: reg.company.name.clone(),
        missing_required,
        summaries,
    }
}

fn overall_status(
    summaries: &[(String, Option<SheetSummary>)],
    missing_required: &[String],
) -> RunStatus {
    if !missing_required.is_empty() {
        return RunStatus::Rejected;
    }
    let mut warned = false;
    for (_, summary) in summaries {
        if let Some(s) = summary {
            if s.rows_errored > 0 {
                return RunStatus::Rejected;
            }
            warned = warned || s.rows_warned > 0;
        }
    }
    if warned {
        RunStatus::ApprovedWithWarnings
    } else {
        RunStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;

    fn summaries(errored: usize, warned: usize) -> Vec<(String, Option<SheetSummary>)> {
        vec![(
            "PRODUTOS".to_string(),
            Some(SheetSummary {
                rows_read: errored + warned + 1,
                rows_valid: 1,
                rows_warned: warned,
                rows_errored: errored,
            }),
        )]
    }

    #[test]
    fn status_precedence() {
        assert_eq!(overall_status(&summaries(0, 0), &[]), RunStatus::Approved);
        assert_eq!(
            overall_status(&summaries(0, 2), &[]),
            RunStatus::ApprovedWithWarnings
        );
        assert_eq!(overall_status(&summaries(1, 2), &[]), RunStatus::Rejected);
        assert_eq!(
            overall_status(&summaries(0, 0), &["REPR".to_string()]),
            RunStatus::Rejected
        );
    }

    #[test]
    fn empty_workbook_is_rejected_for_missing_sheets() {
        let mut doc = Document::new();
        let report = run(&mut doc, &ImageSet::Unavailable, &mut NoProgress, &RunOptions::default());
        assert_eq!(report.status, RunStatus::Rejected);
        assert_eq!(
            report.missing_required,
            vec!["EMPRESA".to_string(), "FILIAL".to_string(), "REPR".to_string()]
        );
        // The report sheet is still produced.
        assert_eq!(doc.sheets()[0].name, report::REPORT_SHEET);
    }
}
