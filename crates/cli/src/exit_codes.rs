//! CLI exit code registry.
//!
//! Exit codes are part of the shell contract - import pipelines branch on
//! them to decide whether a workbook may proceed.
//!
//! | Code | Meaning                                        |
//! |------|------------------------------------------------|
//! | 0    | Workbook approved                              |
//! | 1    | Approved with warnings (auto-corrections made) |
//! | 2    | Rejected - at least one hard validation error  |
//! | 3    | Usage or I/O error, nothing was validated      |

use importval_engine::RunStatus;

/// Workbook approved - import may proceed as-is.
pub const EXIT_APPROVED: u8 = 0;

/// Approved with warnings - corrections were applied, review advised.
pub const EXIT_WARNINGS: u8 = 1;

/// Rejected - the annotated output lists the errors.
pub const EXIT_REJECTED: u8 = 2;

/// Usage or I/O error - bad arguments, unreadable or unwritable file.
pub const EXIT_USAGE: u8 = 3;

pub fn status_exit_code(status: RunStatus) -> u8 {
    match status {
        RunStatus::Approved => EXIT_APPROVED,
        RunStatus::ApprovedWithWarnings => EXIT_WARNINGS,
        RunStatus::Rejected => EXIT_REJECTED,
    }
}
