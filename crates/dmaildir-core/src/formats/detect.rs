//! Compression format detection by content sniffing.

use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use super::compression::CompressionFormat;
use crate::MaildirError;
use crate::Result;

/// Ordered table of format signatures.
///
/// Detection walks this table top to bottom and returns the first entry whose
/// magic bytes prefix the file. Supporting another format means adding a row.
const SIGNATURES: &[(CompressionFormat, &[u8])] = &[
    (CompressionFormat::Gzip, &[0x1F, 0x8B]),
    (CompressionFormat::Bzip2, b"BZh"),
    (CompressionFormat::Xz, &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00]),
    (CompressionFormat::Zstd, &[0x28, 0xB5, 0x2F, 0xFD]),
];

/// Number of leading bytes inspected: the length of the longest signature.
pub const PREFIX_LEN: usize = longest_signature();

/// Minimum number of bytes a file must have to be classified: the length of
/// the shortest signature.
pub const MIN_PREFIX_LEN: usize = shortest_signature();

const fn longest_signature() -> usize {
    let mut max = 0;
    let mut i = 0;
    while i < SIGNATURES.len() {
        if SIGNATURES[i].1.len() > max {
            max = SIGNATURES[i].1.len();
        }
        i += 1;
    }
    max
}

const fn shortest_signature() -> usize {
    let mut min = usize::MAX;
    let mut i = 0;
    while i < SIGNATURES.len() {
        if SIGNATURES[i].1.len() < min {
            min = SIGNATURES[i].1.len();
        }
        i += 1;
    }
    min
}

/// Errors produced while sniffing a header.
#[derive(Error, Debug)]
pub enum DetectError {
    /// The underlying read failed.
    #[error("failed reading header: {0}")]
    Io(#[from] io::Error),

    /// Fewer bytes were available than the shortest known signature.
    #[error("header too short: {len} bytes, need at least {MIN_PREFIX_LEN}")]
    ShortHeader {
        /// Bytes actually read.
        len: usize,
    },
}

/// Classifies a byte source by its leading bytes.
///
/// Reads at most [`PREFIX_LEN`] bytes. The reader is left positioned after
/// the bytes consumed; callers reopen or rewind before decoding.
///
/// # Errors
///
/// Returns [`DetectError::ShortHeader`] if fewer than [`MIN_PREFIX_LEN`] bytes
/// are available, or [`DetectError::Io`] if the read fails.
///
/// # Examples
///
/// ```
/// use dmaildir_core::CompressionFormat;
/// use dmaildir_core::formats::detect::detect_compression;
///
/// let zstd = [0x28, 0xB5, 0x2F, 0xFD, 0x00, 0x58];
/// assert_eq!(detect_compression(&zstd[..]).unwrap(), CompressionFormat::Zstd);
///
/// let plain = b"From: alice@example.org\r\n";
/// assert_eq!(
///     detect_compression(&plain[..]).unwrap(),
///     CompressionFormat::Uncompressed
/// );
/// ```
pub fn detect_compression<R: Read>(
    mut reader: R,
) -> std::result::Result<CompressionFormat, DetectError> {
    let mut header = [0u8; PREFIX_LEN];
    let len = read_prefix(&mut reader, &mut header)?;
    if len < MIN_PREFIX_LEN {
        return Err(DetectError::ShortHeader { len });
    }
    Ok(classify(&header[..len]))
}

/// Classifies the file at `path`.
///
/// # Errors
///
/// Returns [`MaildirError::Io`] if the file cannot be opened or read, and
/// [`MaildirError::ShortHeader`] if it is shorter than any signature.
pub fn detect_file(path: &Path) -> Result<CompressionFormat> {
    let file = File::open(path).map_err(|source| MaildirError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    detect_compression(file).map_err(|e| MaildirError::from_detect(path, e))
}

/// Matches a prefix against the signature table.
fn classify(prefix: &[u8]) -> CompressionFormat {
    SIGNATURES
        .iter()
        .find(|(_, magic)| prefix.starts_with(magic))
        .map_or(CompressionFormat::Uncompressed, |(format, _)| *format)
}

/// Fills `buf` until it is full or the reader reaches EOF.
fn read_prefix<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
