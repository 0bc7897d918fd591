//! Test utilities for building compressed messages and Maildir trees.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::formats::CompressionFormat;
use crate::maildir::CUR_DIR;

/// Compresses `data` in memory with the encoder for `format`.
///
/// `Uncompressed` returns the data unchanged.
#[must_use]
pub fn compress(format: CompressionFormat, data: &[u8]) -> Vec<u8> {
    match format {
        CompressionFormat::Uncompressed => data.to_vec(),
        CompressionFormat::Gzip => {
            let mut encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionFormat::Bzip2 => {
            let mut encoder =
                bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionFormat::Xz => {
            let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionFormat::Zstd => zstd::encode_all(data, 3).unwrap(),
    }
}

/// Builder for a Maildir inside a temporary directory.
///
/// The root always gets `cur`, `new` and `tmp`.
pub struct MaildirBuilder {
    temp: TempDir,
}

impl MaildirBuilder {
    /// Creates an empty Maildir.
    #[must_use]
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        create_maildir_dirs(temp.path());
        Self { temp }
    }

    /// Root of the Maildir.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// The root's `cur` directory.
    #[must_use]
    pub fn cur(&self) -> PathBuf {
        self.root().join(CUR_DIR)
    }

    /// Adds a nested Maildir folder (e.g. `.Sent`).
    #[must_use]
    pub fn add_folder(self, name: &str) -> Self {
        create_maildir_dirs(&self.root().join(name));
        self
    }

    /// Adds a plain message file to `cur`.
    #[must_use]
    pub fn add_plain(self, name: &str, data: &[u8]) -> Self {
        fs::write(self.cur().join(name), data).unwrap();
        self
    }

    /// Adds a message compressed with `format` to `cur`.
    #[must_use]
    pub fn add_compressed(self, name: &str, format: CompressionFormat, data: &[u8]) -> Self {
        fs::write(self.cur().join(name), compress(format, data)).unwrap();
        self
    }
}

impl Default for MaildirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn create_maildir_dirs(dir: &Path) {
    for sub in [CUR_DIR, "new", "tmp"] {
        fs::create_dir_all(dir.join(sub)).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_uncompressed_is_identity() {
        assert_eq!(compress(CompressionFormat::Uncompressed, b"abc"), b"abc");
    }

    #[test]
    fn test_builder_layout() {
        let maildir = MaildirBuilder::new()
            .add_folder(".Sent")
            .add_plain("1:2,", b"hello");
        assert!(maildir.cur().is_dir());
        assert!(maildir.root().join("new").is_dir());
        assert!(maildir.root().join(".Sent/tmp").is_dir());
        assert_eq!(fs::read(maildir.cur().join("1:2,")).unwrap(), b"hello");
    }
}
