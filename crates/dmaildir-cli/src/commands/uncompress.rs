//! Uncompress command implementation.

use crate::cli::DirArgs;
use crate::config::Settings;
use crate::error::add_maildir_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use dmaildir_core::NoopProgress;
use dmaildir_core::uncompress_maildir;
use std::process::ExitCode;
use tracing::info;

pub fn execute(
    args: &DirArgs,
    settings: &Settings,
    formatter: &dyn OutputFormatter,
) -> Result<ExitCode> {
    let root = settings.maildir(args.dir.as_deref())?;
    let options = settings.options();
    info!(
        root = %root.display(),
        recurse = options.recurse,
        fail_fast = options.fail_fast,
        "decompressing"
    );

    // Progress bar only on an interactive stderr without --quiet or --json
    let report = if CliProgress::should_show() && !settings.quiet && !settings.json {
        let mut progress = CliProgress::new("Decompressing");
        add_maildir_context(uncompress_maildir(&root, &options, &mut progress))?
    } else {
        add_maildir_context(uncompress_maildir(&root, &options, &mut NoopProgress))?
    };

    formatter.format_uncompress_result(&report)?;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
