//! Format-specific decoding of compressed message streams.
//!
//! Decoding always produces the complete content in memory. Nothing here
//! touches the filesystem, so a corrupt or truncated stream can never leave
//! partial output on disk.

use std::io;
use std::io::Read;

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use thiserror::Error;
use xz2::read::XzDecoder;
use zstd::stream::read::Decoder as ZstdDecoder;

use super::compression::CompressionFormat;

/// Errors produced by the decoders.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The dispatcher was asked to decode a format it has no decoder for.
    #[error("no decoder for format '{0}'")]
    Unsupported(CompressionFormat),

    /// The stream is corrupt, truncated, or could not be read.
    #[error("{format} stream: {source}")]
    Stream {
        /// Format being decoded.
        format: CompressionFormat,
        /// Underlying decoder or read error.
        #[source]
        source: io::Error,
    },
}

/// Fully decoded message content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedContent {
    bytes: Vec<u8>,
}

impl DecodedContent {
    /// Wraps already decoded bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Decoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of decoded bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Returns `true` if nothing was decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of line terminators (`\n` bytes) in the content.
    ///
    /// This is the adjustment Dovecot adds to the byte size to obtain the
    /// `W=` virtual size, where every LF is counted as CRLF.
    ///
    /// # Examples
    ///
    /// ```
    /// use dmaildir_core::formats::DecodedContent;
    ///
    /// let content = DecodedContent::new(b"a\nb\nc".to_vec());
    /// assert_eq!(content.line_count(), 2);
    /// ```
    #[must_use]
    pub fn line_count(&self) -> u64 {
        self.bytes.iter().filter(|&&b| b == b'\n').count() as u64
    }

    /// Iterates over the lines of the content, without terminators.
    ///
    /// A trailing terminator does not produce an empty final line.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let body = self.bytes.strip_suffix(b"\n").unwrap_or(&self.bytes[..]);
        body.split(|&b| b == b'\n')
            .filter(move |_| !self.bytes.is_empty())
    }
}

/// Decodes an entire compressed stream into memory.
///
/// # Errors
///
/// Returns [`DecodeError::Unsupported`] for
/// [`CompressionFormat::Uncompressed`], and [`DecodeError::Stream`] if the
/// decoder rejects the input.
///
/// # Examples
///
/// ```
/// use std::io::Write;
///
/// use dmaildir_core::CompressionFormat;
/// use dmaildir_core::formats::decode::decode;
///
/// let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
/// encoder.write_all(b"Subject: hello\n").unwrap();
/// let compressed = encoder.finish().unwrap();
///
/// let content = decode(CompressionFormat::Gzip, &compressed[..]).unwrap();
/// assert_eq!(content.as_bytes(), b"Subject: hello\n");
/// ```
pub fn decode<R: Read>(
    format: CompressionFormat,
    reader: R,
) -> Result<DecodedContent, DecodeError> {
    let stream_error = |source| DecodeError::Stream { format, source };

    let bytes = match format {
        CompressionFormat::Uncompressed => return Err(DecodeError::Unsupported(format)),
        CompressionFormat::Gzip => read_all(MultiGzDecoder::new(reader)),
        CompressionFormat::Bzip2 => read_all(MultiBzDecoder::new(reader)),
        CompressionFormat::Xz => read_all(XzDecoder::new_multi_decoder(reader)),
        CompressionFormat::Zstd => ZstdDecoder::new(reader).and_then(read_all),
    }
    .map_err(stream_error)?;

    Ok(DecodedContent::new(bytes))
}

fn read_all<R: Read>(mut decoder: R) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    decoder.read_to_end(&mut bytes)?;
    Ok(bytes)
}
