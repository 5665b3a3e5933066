// importval CLI - staging workbook validation

mod exit_codes;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Local;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use serde::Serialize;

use exit_codes::{status_exit_code, EXIT_APPROVED, EXIT_USAGE};
use importval_engine::{labels, run, ImageSet, NoProgress, Progress, RunOptions, RunReport};
use importval_io::{read_document, write_document};

#[derive(Parser)]
#[command(name = "importval")]
#[command(about = "Valida planilhas de importação de cadastro e gera a cópia anotada")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a staging workbook and write the annotated copy
    #[command(after_help = "\
Examples:
  importval validate cadastro.xlsx
  importval validate cadastro.xlsx --images-dir ./fotos --labels
  importval validate cadastro.xlsx -o ./saida --json")]
    Validate {
        /// Input workbook (xlsx, xls, xlsb, ods)
        input: PathBuf,

        /// Directory with product photographs for PathFotografia checks
        #[arg(long, value_name = "DIR")]
        images_dir: Option<PathBuf>,

        /// Output directory (defaults to the input's directory)
        #[arg(long, short = 'o', value_name = "DIR")]
        out: Option<PathBuf>,

        /// Also write the label workbook for rows with QtdeEtiquetas
        #[arg(long)]
        labels: bool,

        /// Print the run report as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Product-sheet progress interval in rows (0 = automatic)
        #[arg(long, value_name = "N", default_value_t = 0)]
        progress_every: usize,

        /// Suppress progress output
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_APPROVED,
                _ => EXIT_USAGE,
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    let code = match cli.command {
        Commands::Validate {
            input,
            images_dir,
            out,
            labels,
            json,
            progress_every,
            quiet,
        } => cmd_validate(input, images_dir, out, labels, json, progress_every, quiet),
    };
    ExitCode::from(code)
}

#[allow(clippy::too_many_arguments)]
fn cmd_validate(
    input: PathBuf,
    images_dir: Option<PathBuf>,
    out: Option<PathBuf>,
    want_labels: bool,
    json: bool,
    progress_every: usize,
    quiet: bool,
) -> u8 {
    let mut doc = match read_document(&input) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USAGE;
        }
    };

    let images = load_images(images_dir.as_deref());
    let opts = RunOptions { progress_row_interval: progress_every };

    let mut stderr_progress = StderrProgress;
    let mut no_progress = NoProgress;
    let progress: &mut dyn Progress = if quiet || json {
        &mut no_progress
    } else {
        &mut stderr_progress
    };

    let report = run(&mut doc, &images, progress, &opts);

    let out_dir = out.unwrap_or_else(|| {
        input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    let stamp = Local::now().format("%Y.%m.%d %H-%M").to_string();
    let company = file_safe(&report.company_name);
    let out_path = out_dir.join(format!("{stamp}_{company}_IMPORTAÇÃO.xlsx"));

    if let Err(e) = write_document(&doc, &out_path) {
        eprintln!("error: {e}");
        return EXIT_USAGE;
    }

    let mut labels_path = None;
    if want_labels {
        match labels::build_labels(&doc) {
            Some(label_doc) => {
                let path = out_dir.join(format!("{stamp}_{company}_ETIQUETAS.xlsx"));
                if let Err(e) = write_document(&label_doc, &path) {
                    eprintln!("error: {e}");
                    return EXIT_USAGE;
                }
                labels_path = Some(path);
            }
            None => eprintln!("note: nenhum produto com QtdeEtiquetas, etiquetas não geradas"),
        }
    }

    if json {
        print_json(&report, &out_path, labels_path.as_deref());
    } else {
        print_summary(&report, &out_path, labels_path.as_deref());
    }

    status_exit_code(report.status)
}

fn load_images(dir: Option<&Path>) -> ImageSet {
    let Some(dir) = dir else {
        return ImageSet::Unavailable;
    };
    match fs::read_dir(dir) {
        Ok(entries) => {
            let names: HashSet<String> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_lowercase())
                .collect();
            ImageSet::Available { dir: dir.display().to_string(), names }
        }
        Err(e) => {
            eprintln!("note: pasta de fotografias indisponível ({e}); checagem de fotos ignorada");
            ImageSet::Unavailable
        }
    }
}

/// Company names go into the output file name; path separators do not.
fn file_safe(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return "EMPRESA".to_string();
    }
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

struct StderrProgress;

impl Progress for StderrProgress {
    fn report(&mut self, percent: u8, message: &str) {
        eprintln!("[{percent:>3}%] {message}");
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a RunReport,
    output: String,
    labels_output: Option<String>,
}

fn print_json(report: &RunReport, out_path: &Path, labels_path: Option<&Path>) {
    let payload = JsonOutput {
        report,
        output: out_path.display().to_string(),
        labels_output: labels_path.map(|p| p.display().to_string()),
    };
    match serde_json::to_string_pretty(&payload) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("error: {e}"),
    }
}

fn print_summary(report: &RunReport, out_path: &Path, labels_path: Option<&Path>) {
    for (name, summary) in &report.summaries {
        match summary {
            Some(s) => println!(
                "{name}: Linhas Lidas: {} | Válidas: {} | Advertências: {} | Erros: {}",
                s.rows_read, s.rows_valid, s.rows_warned, s.rows_errored
            ),
            None => println!("{name}: aba não encontrada ou não preenchida"),
        }
    }
    for name in &report.missing_required {
        eprintln!("error: aba obrigatória ausente: {name}");
    }
    println!("status: {}", report.status);
    println!("arquivo gerado: {}", out_path.display());
    if let Some(p) = labels_path {
        println!("etiquetas geradas: {}", p.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_safe_strips_path_characters() {
        assert_eq!(file_safe("ACME Ltda"), "ACME Ltda");
        assert_eq!(file_safe("A/B:C"), "A_B_C");
        assert_eq!(file_safe("  "), "EMPRESA");
    }

    #[test]
    fn missing_images_dir_is_unavailable() {
        assert!(matches!(
            load_images(Some(Path::new("/nonexistent/fotos"))),
            ImageSet::Unavailable
        ));
    }

    #[test]
    fn images_dir_is_indexed_lowercase() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Foto1.JPG"), b"x").unwrap();
        let set = load_images(Some(dir.path()));
        assert_eq!(set.exists("foto1.jpg"), Some(true));
        assert_eq!(set.exists("outra.jpg"), Some(false));
    }
}
