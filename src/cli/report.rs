//! Report formatting and printing utilities.
//!
//! Rewritten calls are shown cargo-style, with the original message argument
//! on a `-` line and its replacement on a `+` line. Separate from the patcher
//! so sidtag can be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use crate::core::parsers::python::ParseError;
use crate::core::patcher::{FilePatch, FileReport, FileStatus, PatchMode, PatchStats};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print every rewritten call to stdout.
pub fn print_previews(reports: &[FileReport]) {
    print_previews_to(reports, &mut io::stdout().lock());
}

/// Print every rewritten call to a custom writer.
pub fn print_previews_to<W: Write>(reports: &[FileReport], writer: &mut W) {
    for report in reports {
        if let FileStatus::Patched(patch) = &report.status {
            print_file_patch(&report.file_path, patch, writer);
        }
    }
}

fn print_file_patch<W: Write>(file_path: &str, patch: &FilePatch, writer: &mut W) {
    for call in &patch.calls {
        let _ = writeln!(
            writer,
            "  {} {}:{}:{}  {}",
            "-->".blue(),
            file_path,
            call.line,
            call.col,
            format!("[{}]", call.level).dimmed().cyan()
        );
        let _ = writeln!(writer, "     {}", "|".blue());
        for line in call.before.lines() {
            let _ = writeln!(writer, "     {} {}", "-".red(), line.red());
        }
        for line in call.after.lines() {
            let _ = writeln!(writer, "     {} {}", "+".green(), line.green());
        }
        let _ = writeln!(writer);
    }
}

/// Print the one-line outcome of a `patch` run.
pub fn print_summary(stats: &PatchStats, mode: PatchMode) {
    print_summary_to(stats, mode, &mut io::stdout().lock());
}

pub fn print_summary_to<W: Write>(stats: &PatchStats, mode: PatchMode, writer: &mut W) {
    let files = |n: usize| if n == 1 { "file" } else { "files" };

    if stats.calls_rewritten == 0 {
        if stats.files_failed == 0 {
            let _ = writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                format!(
                    "Checked {} python {} - nothing to rewrite",
                    stats.files_checked,
                    files(stats.files_checked)
                )
                .green()
            );
        }
        return;
    }

    match mode {
        PatchMode::Apply => {
            let _ = writeln!(
                writer,
                "{} {} call(s) in {} {}.",
                "Rewrote".green().bold(),
                stats.calls_rewritten,
                stats.files_patched,
                files(stats.files_patched)
            );
        }
        PatchMode::DryRun => {
            let _ = writeln!(
                writer,
                "{} {} call(s) in {} {}.",
                "Would rewrite".yellow().bold(),
                stats.calls_rewritten,
                stats.files_patched,
                files(stats.files_patched)
            );
            let _ = writeln!(
                writer,
                "Run without {} to apply these changes.",
                "--dry-run".cyan()
            );
        }
    }
}

/// Print files that could not be processed at all.
pub fn print_failures(reports: &[FileReport]) {
    print_failures_to(reports, &mut io::stderr().lock());
}

pub fn print_failures_to<W: Write>(reports: &[FileReport], writer: &mut W) {
    for report in reports {
        if let FileStatus::Failed(err) = &report.status {
            let _ = writeln!(
                writer,
                "{} {}: {:#}",
                FAILURE_MARK.red(),
                report.file_path,
                err
            );
        }
    }
}

/// Print a warning about files that were skipped because they do not parse.
///
/// Without `verbose` only the count is shown.
pub fn print_parse_warning(reports: &[FileReport], verbose: bool) {
    print_parse_warning_to(reports, verbose, &mut io::stderr().lock());
}

pub fn print_parse_warning_to<W: Write>(reports: &[FileReport], verbose: bool, writer: &mut W) {
    let skipped: Vec<(&str, &ParseError)> = reports
        .iter()
        .filter_map(|report| match &report.status {
            FileStatus::Skipped(err) => Some((report.file_path.as_str(), err)),
            _ => None,
        })
        .collect();

    if skipped.is_empty() {
        return;
    }

    if !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed and were left unchanged (use {} for details)",
            "warning:".bold().yellow(),
            skipped.len(),
            "-v".cyan()
        );
        return;
    }

    for (file_path, err) in skipped {
        let location = match err {
            ParseError::Syntax { line, column } => format!("{}:{}:{}", file_path, line, column),
            _ => file_path.to_string(),
        };
        let _ = writeln!(
            writer,
            "{} skipped {}: {}",
            "warning:".bold().yellow(),
            location,
            err
        );
    }
}

/// Print a warning about paths the scanner could not access.
pub fn print_scan_warning(count: usize, verbose: bool) {
    if count > 0 && !verbose {
        eprintln!(
            "{} {} path(s) could not be accessed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}
