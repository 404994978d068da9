use std::process::ExitCode;

use crate::core::patcher::{PatchMode, PatchStats};

/// Exit status for CLI commands.
///
/// - `Success` (0): Command completed, nothing left to do
/// - `Failure` (1): Dry-run found calls to rewrite, or `init` found an existing config
/// - `Error` (2): Command failed due to internal error (config error, write failure, etc.)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Command completed, nothing left to do.
    Success,
    /// Command completed but reports pending work or a refused action.
    Failure,
    /// Command failed due to internal error.
    Error,
}

impl ExitStatus {
    /// Per-file failures win over pending work; skipped files count for nothing.
    pub fn for_patch(stats: &PatchStats, mode: PatchMode) -> Self {
        if stats.files_failed > 0 {
            ExitStatus::Error
        } else if mode == PatchMode::DryRun && stats.calls_rewritten > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
