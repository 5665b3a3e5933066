use std::fmt;

use importval_doc::Fill;
use serde::Serialize;

/// Severity is assigned when the finding is created, never inferred from
/// the message text afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One reported condition discovered while validating a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn error(message: impl Into<String>) -> Self {
        Finding { severity: Severity::Error, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Finding { severity: Severity::Warning, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Finding { severity: Severity::Info, message: message.into() }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    Warning,
    Error,
}

impl Verdict {
    pub fn fill(self) -> Fill {
        match self {
            Verdict::Valid => Fill::Valid,
            Verdict::Warning => Fill::Warning,
            Verdict::Error => Fill::Error,
        }
    }
}

/// RESULT message for a clean row. Rendered bold.
pub const VALID_MESSAGE: &str = "Validado com sucesso!";

/// Fixed precedence: any Error finding wins, then Warning. Info findings
/// leave the row Valid (their message still lands in the RESULT cell).
pub fn classify(findings: &[Finding]) -> Verdict {
    let mut verdict = Verdict::Valid;
    for f in findings {
        match f.severity {
            Severity::Error => return Verdict::Error,
            Severity::Warning => verdict = Verdict::Warning,
            Severity::Info => {}
        }
    }
    verdict
}

pub fn result_message(findings: &[Finding]) -> String {
    if findings.is_empty() {
        VALID_MESSAGE.to_string()
    } else {
        findings.iter().map(|f| f.message.as_str()).collect::<Vec<_>>().join("; ")
    }
}

/// Per-sheet row counts, written once when the sheet's validator finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
    pub rows_read: usize,
    pub rows_valid: usize,
    pub rows_warned: usize,
    pub rows_errored: usize,
}

impl SheetSummary {
    pub fn count(&mut self, verdict: Verdict) {
        self.rows_read += 1;
        match verdict {
            Verdict::Valid => self.rows_valid += 1,
            Verdict::Warning => self.rows_warned += 1,
            Verdict::Error => self.rows_errored += 1,
        }
    }

    /// Report-sheet wording.
    pub fn status_line(&self) -> String {
        format!(
            "Linhas Lidas: {} | Válidas: {} | Advertências: {} | Erros: {}",
            self.rows_read, self.rows_valid, self.rows_warned, self.rows_errored
        )
    }

    pub fn worst_fill(&self) -> Fill {
        if self.rows_errored > 0 {
            Fill::Error
        } else if self.rows_warned > 0 {
            Fill::Warning
        } else {
            Fill::Valid
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Approved,
    ApprovedWithWarnings,
    Rejected,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Approved => write!(f, "aprovado"),
            RunStatus::ApprovedWithWarnings => write!(f, "advertencias"),
            RunStatus::Rejected => write!(f, "reprovado"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_wins_regardless_of_order() {
        let a = vec![Finding::warning("w"), Finding::error("e")];
        let b = vec![Finding::error("e"), Finding::warning("w")];
        assert_eq!(classify(&a), Verdict::Error);
        assert_eq!(classify(&b), Verdict::Error);
    }

    #[test]
    fn warning_beats_valid() {
        assert_eq!(classify(&[Finding::warning("w")]), Verdict::Warning);
        assert_eq!(classify(&[]), Verdict::Valid);
    }

    #[test]
    fn classify_info_only_is_valid() {
        // Unmarked advisories never downgrade a row.
        assert_eq!(classify(&[Finding::info("nota")]), Verdict::Valid);
    }

    #[test]
    fn result_message_joins_or_defaults() {
        assert_eq!(result_message(&[]), VALID_MESSAGE);
        let msgs = vec![Finding::error("a"), Finding::warning("b")];
        assert_eq!(result_message(&msgs), "a; b");
    }

    #[test]
    fn summary_counts_by_verdict() {
        let mut s = SheetSummary::default();
        s.count(Verdict::Valid);
        s.count(Verdict::Error);
        s.count(Verdict::Warning);
        s.count(Verdict::Error);
        assert_eq!(s.rows_read, 4);
        assert_eq!(s.rows_valid, 1);
        assert_eq!(s.rows_warned, 1);
        assert_eq!(s.rows_errored, 2);
        assert_eq!(s.worst_fill(), Fill::Error);
    }
}
