//! List command implementation.

use crate::cli::DirArgs;
use crate::config::Settings;
use crate::error::add_maildir_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use dmaildir_core::list_files;
use dmaildir_core::list_maildirs_with_files;
use std::process::ExitCode;

pub fn execute(
    args: &DirArgs,
    settings: &Settings,
    formatter: &dyn OutputFormatter,
) -> Result<ExitCode> {
    let root = settings.maildir(args.dir.as_deref())?;
    let options = settings.options();

    if settings.maildirs {
        let maildirs = add_maildir_context(list_maildirs_with_files(&root, &options))?;
        formatter.format_maildir_list(&maildirs)?;
    } else {
        let files = add_maildir_context(list_files(&root, &options))?;
        formatter.format_file_list(&files)?;
    }

    Ok(ExitCode::SUCCESS)
}
