//! Decompression reporting.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::MaildirError;
use crate::formats::CompressionFormat;

/// Outcome of decompressing a single message file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncompressReport {
    /// The rewritten file.
    pub path: PathBuf,

    /// Format the file was stored in.
    pub format: CompressionFormat,

    /// Flags segment of the filename (after the first `:`).
    pub flags: String,

    /// `S=` value from the filename, if declared.
    pub declared_size: Option<u64>,

    /// `W=` value from the filename, if declared.
    pub declared_virtual_size: Option<u64>,

    /// Decoded size in bytes.
    pub actual_size: u64,

    /// Decoded size plus line terminators.
    pub actual_virtual_size: u64,

    /// Line terminators in the decoded content.
    pub line_count: u64,
}

/// A file that failed during a batch.
#[derive(Debug)]
pub struct FileFailure {
    /// The file.
    pub path: PathBuf,
    /// What went wrong.
    pub error: MaildirError,
}

/// Report of a batch decompression over a Maildir tree.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Maildirs that were enumerated.
    pub maildirs_scanned: usize,

    /// Compressed files found.
    pub files_considered: usize,

    /// Files successfully decompressed, in processing order.
    pub uncompressed: Vec<UncompressReport>,

    /// Files that failed, in processing order.
    pub failures: Vec<FileFailure>,

    /// Total decoded bytes written.
    pub bytes_written: u64,

    /// Wall time of the batch.
    pub duration: Duration,

    /// Set when the batch stopped at a failure before visiting every file.
    pub stopped_early: bool,
}

impl BatchReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful file.
    pub fn record_success(&mut self, report: UncompressReport) {
        self.bytes_written = self.bytes_written.saturating_add(report.actual_size);
        self.uncompressed.push(report);
    }

    /// Records a failed file.
    pub fn record_failure(&mut self, path: PathBuf, error: MaildirError) {
        self.failures.push(FileFailure { path, error });
    }

    /// Returns `true` if no file failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of files decompressed.
    #[must_use]
    pub fn files_uncompressed(&self) -> usize {
        self.uncompressed.len()
    }

    /// Failures that left a rewritten file with possibly stale attributes.
    pub fn partial_completions(&self) -> impl Iterator<Item = &FileFailure> {
        self.failures
            .iter()
            .filter(|failure| failure.error.is_partial_completion())
    }
}

/// Callback trait for progress reporting during batch decompression.
///
/// # Examples
///
/// ```
/// use dmaildir_core::ProgressCallback;
/// use std::path::Path;
///
/// struct Printer;
///
/// impl ProgressCallback for Printer {
///     fn on_file_start(&mut self, path: &Path, total: usize, current: usize) {
///         println!("{current}/{total}: {}", path.display());
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_file_complete(&mut self, path: &Path, ok: bool) {
///         println!("{}: {}", path.display(), if ok { "ok" } else { "failed" });
///     }
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ProgressCallback {
    /// Called before a file is processed.
    ///
    /// # Arguments
    ///
    /// * `path` - File about to be processed
    /// * `total` - Compressed files in the current Maildir
    /// * `current` - Position of this file (1-indexed)
    fn on_file_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called with the decoded size of each rewritten file.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called after a file is processed, successfully or not.
    fn on_file_complete(&mut self, path: &Path, ok: bool);

    /// Called once when the batch ends.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_file_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_file_complete(&mut self, _path: &Path, _ok: bool) {}

    fn on_complete(&mut self) {}
}
