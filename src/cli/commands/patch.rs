//! Patch command - Prefix logger calls with the session identifier.
//!
//! Every `self.logger.<level>(...)` call inside a class that assigns
//! `self.session_id` gets `{self.session_id} | ` in front of its message.
//! Files that already carry the prefix are left as they are, so the command
//! can be re-run safely.
//!
//! Use `--dry-run` to preview the rewrite without writing any file.

use std::collections::BTreeSet;

use anyhow::{Result, bail};

use super::super::{args::PatchCommand, exit_status::ExitStatus, report};
use crate::{
    config::{ConfigLoadResult, load_config},
    core::{
        file_scanner::scan_files,
        patcher::{PatchMode, PatchStats, parent_dir, patch_files},
    },
};

pub fn patch(cmd: PatchCommand) -> Result<ExitStatus> {
    let verbose = cmd.common.verbose;
    let mode = if cmd.dry_run {
        PatchMode::DryRun
    } else {
        PatchMode::Apply
    };

    let target = cmd.common.path.as_path();
    if !target.exists() {
        bail!("Path does not exist: {}", target.display());
    }
    let single_file = target.is_file();
    let base_dir = if single_file {
        parent_dir(target)
    } else {
        target.to_path_buf()
    };

    let ConfigLoadResult { config, from_file } = load_config(&base_dir)?;
    if from_file {
        tracing::debug!("loaded configuration for {}", base_dir.display());
    }

    let files: BTreeSet<String> = if single_file {
        BTreeSet::from([target.to_string_lossy().into_owned()])
    } else {
        let scan = scan_files(
            &base_dir.to_string_lossy(),
            &config.includes,
            &config.ignores,
            verbose,
        );
        report::print_scan_warning(scan.skipped_count, verbose);
        scan.files
    };

    let reports = patch_files(&files, &config.rewrite_options(), mode);
    let stats = PatchStats::from_reports(&reports);

    if mode == PatchMode::DryRun || verbose {
        report::print_previews(&reports);
    }
    report::print_failures(&reports);
    report::print_parse_warning(&reports, verbose);
    report::print_summary(&stats, mode);

    Ok(ExitStatus::for_patch(&stats, mode))
}
