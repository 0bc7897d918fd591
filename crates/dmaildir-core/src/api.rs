//! High-level public API for Maildir enumeration and batch decompression.

use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use tracing::info;
use tracing::warn;

use crate::BatchReport;
use crate::FileFilter;
use crate::MaildirOptions;
use crate::ProgressCallback;
use crate::Result;
use crate::maildir::CandidateFile;
use crate::maildir::list_maildir_files;
use crate::uncompress::uncompress_file;

/// Lists the Maildirs under `root`, honoring `options.recurse`.
///
/// Without recursion this is just `root` after checking it is a Maildir.
///
/// # Errors
///
/// Returns an error if `root` is not a Maildir or the tree cannot be walked.
pub fn list_maildirs<P: AsRef<Path>>(root: P, options: &MaildirOptions) -> Result<Vec<PathBuf>> {
    crate::maildir::list_maildirs(root.as_ref(), options)
}

/// Lists message files matching `options.filter` across every Maildir under
/// `root`.
///
/// Files are grouped per Maildir in walk order, then sorted by name.
///
/// # Errors
///
/// Returns the first enumeration error; nothing is returned for the other
/// Maildirs in that case.
///
/// # Examples
///
/// ```no_run
/// use dmaildir_core::FileFilter;
/// use dmaildir_core::MaildirOptions;
/// use dmaildir_core::list_files;
///
/// let options = MaildirOptions::default()
///     .with_recurse(true)
///     .with_filter(FileFilter::All);
/// for file in list_files("/home/alice/Maildir", &options)? {
///     println!("{} {}", file.format, file.path.display());
/// }
/// # Ok::<(), dmaildir_core::MaildirError>(())
/// ```
pub fn list_files<P: AsRef<Path>>(root: P, options: &MaildirOptions) -> Result<Vec<CandidateFile>> {
    let mut files = Vec::new();
    for maildir in crate::maildir::list_maildirs(root.as_ref(), options)? {
        files.extend(list_maildir_files(&maildir, options.filter)?);
    }
    Ok(files)
}

/// Lists the Maildirs under `root` holding at least one file that matches
/// `options.filter`.
///
/// # Errors
///
/// Same as [`list_files`].
pub fn list_maildirs_with_files<P: AsRef<Path>>(
    root: P,
    options: &MaildirOptions,
) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for maildir in crate::maildir::list_maildirs(root.as_ref(), options)? {
        if !list_maildir_files(&maildir, options.filter)?.is_empty() {
            found.push(maildir);
        }
    }
    Ok(found)
}

/// Decompresses every compressed message under `root`.
///
/// `options.filter` is ignored: only compressed files are candidates. A file
/// that fails is recorded in the report and the batch moves on, unless
/// `options.fail_fast` is set, in which case it stops after that file.
///
/// # Errors
///
/// Returns an error only when enumeration fails (`root` is not a Maildir,
/// a directory cannot be read, or a file cannot be sniffed). Every Maildir
/// is enumerated before any file is rewritten, so such an error means
/// nothing was changed. Per-file failures are collected in
/// [`BatchReport::failures`].
///
/// # Examples
///
/// ```no_run
/// use dmaildir_core::MaildirOptions;
/// use dmaildir_core::NoopProgress;
/// use dmaildir_core::uncompress_maildir;
///
/// let options = MaildirOptions::default().with_recurse(true);
/// let report = uncompress_maildir("/home/alice/Maildir", &options, &mut NoopProgress)?;
/// println!(
///     "{} decompressed, {} failed",
///     report.files_uncompressed(),
///     report.failures.len()
/// );
/// # Ok::<(), dmaildir_core::MaildirError>(())
/// ```
pub fn uncompress_maildir<P: AsRef<Path>>(
    root: P,
    options: &MaildirOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<BatchReport> {
    let start = Instant::now();
    let mut report = BatchReport::new();

    // Enumerate everything before the first rewrite so an enumeration error
    // leaves the tree untouched.
    let mut batches = Vec::new();
    for maildir in crate::maildir::list_maildirs(root.as_ref(), options)? {
        let files = list_maildir_files(&maildir, FileFilter::Compressed)?;
        batches.push(files);
    }

    'maildirs: for files in batches {
        report.maildirs_scanned += 1;
        let total = files.len();
        report.files_considered += total;

        for (index, file) in files.into_iter().enumerate() {
            progress.on_file_start(&file.path, total, index + 1);
            match uncompress_file(&file.path, options) {
                Ok(file_report) => {
                    progress.on_bytes_written(file_report.actual_size);
                    progress.on_file_complete(&file.path, true);
                    report.record_success(file_report);
                }
                Err(error) => {
                    warn!(path = %file.path.display(), code = error.code(), "{error}");
                    progress.on_file_complete(&file.path, false);
                    report.record_failure(file.path, error);
                    if options.fail_fast {
                        report.stopped_early = true;
                        break 'maildirs;
                    }
                }
            }
        }
    }

    report.duration = start.elapsed();
    progress.on_complete();
    info!(
        maildirs = report.maildirs_scanned,
        uncompressed = report.files_uncompressed(),
        failed = report.failures.len(),
        bytes = report.bytes_written,
        "batch finished"
    );
    Ok(report)
}
