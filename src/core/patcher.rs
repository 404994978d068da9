//! Read → parse → rewrite → print → write, per file.
//!
//! Files share no state, so the batch runs them in parallel with rayon. A
//! file that fails to parse is skipped; a file whose rewrite cannot be printed
//! or written is reported as failed. Neither stops the rest of the batch.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tempfile::NamedTempFile;

use super::parsers::printer::print_checked;
use super::parsers::python::{ParseError, parse_python};
use super::rewrite::{RewriteOptions, RewrittenCall, rewrite_module};

/// Whether rewritten files are written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchMode {
    Apply,
    DryRun,
}

/// A file with at least one rewritten call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePatch {
    pub calls: Vec<RewrittenCall>,
    /// Full rewritten source.
    pub output: String,
    /// False in dry-run mode.
    pub written: bool,
}

#[derive(Debug)]
pub enum FileStatus {
    /// Nothing to rewrite; the file was not touched.
    Unchanged,
    Patched(FilePatch),
    /// Not valid Python; the file was not touched.
    Skipped(ParseError),
    /// Reading, printing or writing failed.
    Failed(anyhow::Error),
}

#[derive(Debug)]
pub struct FileReport {
    pub file_path: String,
    pub status: FileStatus,
}

/// Counts over a batch of [`FileReport`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchStats {
    pub files_checked: usize,
    pub files_patched: usize,
    pub calls_rewritten: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
}

impl PatchStats {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut stats = PatchStats {
            files_checked: reports.len(),
            ..Default::default()
        };
        for report in reports {
            match &report.status {
                FileStatus::Unchanged => {}
                FileStatus::Patched(patch) => {
                    stats.files_patched += 1;
                    stats.calls_rewritten += patch.calls.len();
                }
                FileStatus::Skipped(_) => stats.files_skipped += 1,
                FileStatus::Failed(_) => stats.files_failed += 1,
            }
        }
        stats
    }
}

/// Rewrite a source string. `Ok(None)` means nothing changed.
pub fn patch_source(
    code: &str,
    options: &RewriteOptions,
) -> Result<Option<(String, Vec<RewrittenCall>)>, PatchSourceError> {
    let tree = parse_python(code).map_err(PatchSourceError::Parse)?;
    let rewrite = rewrite_module(&tree, options);
    if !rewrite.is_modified() {
        return Ok(None);
    }
    let output = print_checked(&tree, &rewrite.edits).map_err(PatchSourceError::Print)?;
    Ok(Some((output, rewrite.calls)))
}

#[derive(Debug, thiserror::Error)]
pub enum PatchSourceError {
    #[error(transparent)]
    Parse(ParseError),
    #[error(transparent)]
    Print(crate::core::parsers::printer::PrintError),
}

/// Process one file.
pub fn patch_file(file_path: &str, options: &RewriteOptions, mode: PatchMode) -> FileReport {
    let status = match run_file(Path::new(file_path), options, mode) {
        Ok(status) => status,
        Err(err) => {
            tracing::error!(file = file_path, "{:#}", err);
            FileStatus::Failed(err)
        }
    };
    FileReport {
        file_path: file_path.to_string(),
        status,
    }
}

fn run_file(path: &Path, options: &RewriteOptions, mode: PatchMode) -> Result<FileStatus> {
    let code = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let (output, calls) = match patch_source(&code, options) {
        Ok(Some(patched)) => patched,
        Ok(None) => return Ok(FileStatus::Unchanged),
        Err(PatchSourceError::Parse(err)) => {
            tracing::debug!(file = %path.display(), "skipping unparsable file: {}", err);
            return Ok(FileStatus::Skipped(err));
        }
        Err(PatchSourceError::Print(err)) => {
            return Err(err).with_context(|| format!("Failed to print {}", path.display()));
        }
    };

    let written = mode == PatchMode::Apply;
    if written {
        write_atomic(path, &output)?;
        tracing::info!("patched {}", path.display());
    }

    Ok(FileStatus::Patched(FilePatch {
        calls,
        output,
        written,
    }))
}

/// Process every file, in parallel. Reports come back sorted by path.
pub fn patch_files<'a, I>(files: I, options: &RewriteOptions, mode: PatchMode) -> Vec<FileReport>
where
    I: IntoIterator<Item = &'a String>,
{
    let files: Vec<&String> = files.into_iter().collect();
    let mut reports: Vec<FileReport> = files
        .par_iter()
        .map(|file_path| patch_file(file_path, options, mode))
        .collect();
    reports.sort_by(|a, b| a.file_path.cmp(&b.file_path));
    reports
}

/// Replace `path` with `content` so that readers see either the old or the
/// new file, never a partial write.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = parent_dir(path);
    let mut temp = NamedTempFile::new_in(&dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    temp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write temp file for {}", path.display()))?;

    if let Ok(metadata) = fs::metadata(path) {
        // Keep the original mode (e.g. executable scripts).
        if let Err(err) = fs::set_permissions(temp.path(), metadata.permissions()) {
            tracing::debug!(
                file = %path.display(),
                "could not copy permissions to the rewritten file: {}",
                err
            );
        }
    }

    temp.persist(path)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(())
}

/// Directory containing `path`; `.` for a bare file name.
pub(crate) fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
