//! Compression formats recognised in Maildir message files.
//!
//! Dovecot's mail-compression plugin stores a message either as plain RFC 5322
//! text or as a single compressed stream. The filename carries no hint of
//! which, so the format is always derived from the leading bytes of the file
//! (see [`detect`](super::detect)).
//!
//! # Supported Codecs
//!
//! - **Gzip**: deflate streams, the plugin's historical default
//! - **Bzip2**: Burrows-Wheeler streams
//! - **Xz**: LZMA2 streams
//! - **Zstd**: Zstandard frames, the plugin's current default

use std::fmt;

use serde::Serialize;

/// Classification of a message file's content.
///
/// The set is closed: anything without a recognised signature is
/// [`Uncompressed`](Self::Uncompressed).
///
/// # Examples
///
/// ```
/// use dmaildir_core::CompressionFormat;
///
/// assert!(CompressionFormat::Zstd.is_compressed());
/// assert!(!CompressionFormat::Uncompressed.is_compressed());
/// assert_eq!(CompressionFormat::Gzip.to_string(), "gzip");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionFormat {
    /// Plain message content.
    #[serde(rename = "none")]
    Uncompressed,

    /// Gzip stream (RFC 1952).
    Gzip,

    /// Bzip2 stream.
    Bzip2,

    /// Xz container (LZMA2).
    Xz,

    /// Zstandard frame.
    Zstd,
}

impl CompressionFormat {
    /// Returns a stable lowercase label for this format.
    ///
    /// # Examples
    ///
    /// ```
    /// use dmaildir_core::CompressionFormat;
    ///
    /// assert_eq!(CompressionFormat::Uncompressed.name(), "none");
    /// assert_eq!(CompressionFormat::Bzip2.name(), "bzip2");
    /// ```
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uncompressed => "none",
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }

    /// Returns `true` for every format except [`Uncompressed`](Self::Uncompressed).
    #[must_use]
    pub const fn is_compressed(self) -> bool {
        !matches!(self, Self::Uncompressed)
    }
}

impl fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
