//! Options controlling listing and decompression.

use crate::formats::CompressionFormat;

/// Which message files a listing keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileFilter {
    /// Only compressed files.
    #[default]
    Compressed,
    /// Only uncompressed files.
    Uncompressed,
    /// Every regular file.
    All,
}

impl FileFilter {
    /// Builds a filter from the `--uncompressed` / `--all` flag pair.
    ///
    /// `all` wins when both are set.
    ///
    /// # Examples
    ///
    /// ```
    /// use dmaildir_core::FileFilter;
    ///
    /// assert_eq!(FileFilter::from_flags(false, false), FileFilter::Compressed);
    /// assert_eq!(FileFilter::from_flags(true, false), FileFilter::Uncompressed);
    /// assert_eq!(FileFilter::from_flags(true, true), FileFilter::All);
    /// ```
    #[must_use]
    pub const fn from_flags(uncompressed: bool, all: bool) -> Self {
        if all {
            Self::All
        } else if uncompressed {
            Self::Uncompressed
        } else {
            Self::Compressed
        }
    }

    /// Returns `true` if a file of `format` passes the filter.
    #[must_use]
    pub const fn matches(self, format: CompressionFormat) -> bool {
        match self {
            Self::Compressed => format.is_compressed(),
            Self::Uncompressed => !format.is_compressed(),
            Self::All => true,
        }
    }
}

/// Options passed explicitly into every core operation.
///
/// # Examples
///
/// ```
/// use dmaildir_core::FileFilter;
/// use dmaildir_core::MaildirOptions;
///
/// let options = MaildirOptions::default()
///     .with_recurse(true)
///     .with_filter(FileFilter::All);
/// assert!(options.recurse);
/// assert!(!options.fail_fast);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaildirOptions {
    /// Scan every Maildir below the root, not just the root itself.
    pub recurse: bool,

    /// Which files listings keep.
    pub filter: FileFilter,

    /// Emit per-file diagnostics (format, declared and actual sizes).
    pub verbose: bool,

    /// Dump every decoded line at debug level.
    pub debug: bool,

    /// Stop a batch at the first failing file instead of continuing.
    pub fail_fast: bool,
}

impl MaildirOptions {
    /// Sets recursion into nested Maildirs.
    pub fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    /// Sets the listing filter.
    pub fn with_filter(mut self, filter: FileFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets per-file diagnostics.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets decoded-line dumps.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets whether a batch stops at the first failure.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}
