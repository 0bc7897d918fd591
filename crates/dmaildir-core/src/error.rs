//! Error types for Maildir listing and decompression.

use std::fmt;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::formats::CompressionFormat;
use crate::formats::DecodeError;
use crate::formats::DetectError;
use crate::maildir::FilenameError;

/// Result type alias using `MaildirError`.
pub type Result<T> = std::result::Result<T, MaildirError>;

/// Filename size key that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeKey {
    /// `S=`: decoded byte size.
    Size,
    /// `W=`: decoded byte size plus one per line terminator.
    VirtualSize,
}

impl SizeKey {
    /// Token letter used in Maildir filenames.
    #[must_use]
    pub const fn token(self) -> char {
        match self {
            Self::Size => 'S',
            Self::VirtualSize => 'W',
        }
    }
}

impl fmt::Display for SizeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// File attribute that could not be replicated after a rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Owning user and group.
    Ownership,
    /// Permission bits.
    Mode,
    /// Modification time.
    ModificationTime,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ownership => f.write_str("ownership"),
            Self::Mode => f.write_str("mode"),
            Self::ModificationTime => f.write_str("modification time"),
        }
    }
}

/// Errors that can occur while listing or decompressing Maildir messages.
#[derive(Error, Debug)]
pub enum MaildirError {
    /// Stat, open or read failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Path exists but is not a directory.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// Directory has no `cur` subdirectory.
    #[error("not a maildir: {path}")]
    NotAMaildir {
        /// The offending path.
        path: PathBuf,
    },

    /// Path is not a regular file.
    #[error("not a regular file: {path}")]
    NotARegularFile {
        /// The offending path.
        path: PathBuf,
    },

    /// Directory tree walk failed.
    #[error("walking {path} failed: {source}")]
    Walk {
        /// Root of the walk.
        path: PathBuf,
        /// Underlying walk error.
        #[source]
        source: walkdir::Error,
    },

    /// File is shorter than the shortest compression signature.
    #[error("cannot classify {path}: only {len} bytes")]
    ShortHeader {
        /// The file.
        path: PathBuf,
        /// Bytes available.
        len: usize,
    },

    /// Filename has no `:` separating the unique name from the flags.
    #[error("missing ':' in filename: {path}")]
    MissingFlagsSeparator {
        /// The file.
        path: PathBuf,
    },

    /// Flags segment does not start with `2,`.
    #[error("missing '2,' in filename flags '{flags}': {path}")]
    MissingFlagsMarker {
        /// The file.
        path: PathBuf,
        /// Everything after the first `:`.
        flags: String,
    },

    /// No decoder exists for the detected format.
    #[error("unsupported compression format '{format}': {path}")]
    UnsupportedFormat {
        /// The file.
        path: PathBuf,
        /// Detected format.
        format: CompressionFormat,
    },

    /// The compressed stream is malformed or truncated.
    #[error("failed decoding {format} data in {path}: {source}")]
    Decode {
        /// The file.
        path: PathBuf,
        /// Detected format.
        format: CompressionFormat,
        /// Decoder error.
        #[source]
        source: io::Error,
    },

    /// Decoded content disagrees with the size declared in the filename.
    #[error("uncompressed {key}={actual} mismatches filename {key}={declared}: {path}")]
    SizeMismatch {
        /// The file.
        path: PathBuf,
        /// Which filename token failed.
        key: SizeKey,
        /// Value declared in the filename.
        declared: u64,
        /// Value computed from the decoded content.
        actual: u64,
    },

    /// Writing the decoded content failed; the original file is unchanged.
    #[error("failed writing decoded data to {path}: {source}")]
    Write {
        /// The file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Content was replaced but an attribute could not be restored.
    #[error("{attribute} change failed on {path} after content was replaced: {source}")]
    AttributeRestore {
        /// The file.
        path: PathBuf,
        /// Attribute that could not be restored.
        attribute: Attribute,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl MaildirError {
    pub(crate) fn from_detect(path: &Path, err: DetectError) -> Self {
        match err {
            DetectError::Io(source) => Self::Io {
                path: path.to_path_buf(),
                source,
            },
            DetectError::ShortHeader { len } => Self::ShortHeader {
                path: path.to_path_buf(),
                len,
            },
        }
    }

    pub(crate) fn from_decode(path: &Path, err: DecodeError) -> Self {
        match err {
            DecodeError::Unsupported(format) => Self::UnsupportedFormat {
                path: path.to_path_buf(),
                format,
            },
            DecodeError::Stream { format, source } => Self::Decode {
                path: path.to_path_buf(),
                format,
                source,
            },
        }
    }

    pub(crate) fn from_filename(path: &Path, err: FilenameError) -> Self {
        match err {
            FilenameError::MissingSeparator => Self::MissingFlagsSeparator {
                path: path.to_path_buf(),
            },
            FilenameError::MissingMarker { flags } => Self::MissingFlagsMarker {
                path: path.to_path_buf(),
                flags,
            },
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::NotADirectory { path }
            | Self::NotAMaildir { path }
            | Self::NotARegularFile { path }
            | Self::Walk { path, .. }
            | Self::ShortHeader { path, .. }
            | Self::MissingFlagsSeparator { path }
            | Self::MissingFlagsMarker { path, .. }
            | Self::UnsupportedFormat { path, .. }
            | Self::Decode { path, .. }
            | Self::SizeMismatch { path, .. }
            | Self::Write { path, .. }
            | Self::AttributeRestore { path, .. } => path,
        }
    }

    /// Stable identifier for machine-readable output.
    ///
    /// # Examples
    ///
    /// ```
    /// use dmaildir_core::MaildirError;
    /// use std::path::PathBuf;
    ///
    /// let err = MaildirError::NotAMaildir {
    ///     path: PathBuf::from("/home/alice/Maildir"),
    /// };
    /// assert_eq!(err.code(), "NOT_A_MAILDIR");
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "IO_ERROR",
            Self::NotADirectory { .. } => "NOT_A_DIRECTORY",
            Self::NotAMaildir { .. } => "NOT_A_MAILDIR",
            Self::NotARegularFile { .. } => "NOT_A_REGULAR_FILE",
            Self::Walk { .. } => "WALK_FAILED",
            Self::ShortHeader { .. } => "SHORT_HEADER",
            Self::MissingFlagsSeparator { .. } => "MISSING_FLAGS_SEPARATOR",
            Self::MissingFlagsMarker { .. } => "MISSING_FLAGS_MARKER",
            Self::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Self::Decode { .. } => "DECODE_FAILED",
            Self::SizeMismatch { .. } => "SIZE_MISMATCH",
            Self::Write { .. } => "WRITE_FAILED",
            Self::AttributeRestore { .. } => "PARTIAL_COMPLETION",
        }
    }

    /// Returns `true` if the file content was replaced but its attributes may
    /// not match the original. Such files need manual inspection.
    #[must_use]
    pub const fn is_partial_completion(&self) -> bool {
        matches!(self, Self::AttributeRestore { .. })
    }

    /// Returns `true` if decoded content disagreed with filename metadata.
    #[must_use]
    pub const fn is_integrity_error(&self) -> bool {
        matches!(self, Self::SizeMismatch { .. })
    }

    /// Returns `true` for malformed filenames and unclassifiable content.
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFlagsSeparator { .. }
                | Self::MissingFlagsMarker { .. }
                | Self::ShortHeader { .. }
                | Self::UnsupportedFormat { .. }
        )
    }

    /// Returns `true` if the file on disk is guaranteed to be unchanged.
    #[must_use]
    pub const fn original_preserved(&self) -> bool {
        !self.is_partial_completion()
    }

    /// Returns the declared and computed values of a size mismatch.
    #[must_use]
    pub const fn size_mismatch(&self) -> Option<(SizeKey, u64, u64)> {
        match self {
            Self::SizeMismatch {
                key,
                declared,
                actual,
                ..
            } => Some((*key, *declared, *actual)),
            _ => None,
        }
    }
}
