//! Shared fixtures for dmaildir-core integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use dmaildir_core::CompressionFormat;
use tempfile::TempDir;

/// Compresses `data` with the encoder for `format`.
pub fn compress(format: CompressionFormat, data: &[u8]) -> Vec<u8> {
    match format {
        CompressionFormat::Uncompressed => data.to_vec(),
        CompressionFormat::Gzip => {
            let mut encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionFormat::Bzip2 => {
            let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::fast());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionFormat::Xz => {
            let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 1);
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionFormat::Zstd => zstd::encode_all(data, 1).unwrap(),
    }
}

/// Creates `cur`, `new` and `tmp` under `dir`.
pub fn make_maildir(dir: &Path) {
    for sub in ["cur", "new", "tmp"] {
        fs::create_dir_all(dir.join(sub)).unwrap();
    }
}

/// A temporary Maildir root.
pub fn maildir() -> TempDir {
    let temp = TempDir::new().unwrap();
    make_maildir(temp.path());
    temp
}

/// Writes `data` compressed with `format` to `maildir/cur/name`.
pub fn put(maildir: &Path, name: &str, format: CompressionFormat, data: &[u8]) -> PathBuf {
    let path = maildir.join("cur").join(name);
    fs::write(&path, compress(format, data)).unwrap();
    path
}

/// A message body of exactly `len` bytes containing `lines` newlines.
pub fn body(len: usize, lines: usize) -> Vec<u8> {
    assert!(lines <= len);
    let mut data = vec![b'a'; len];
    for i in 0..lines {
        data[i * len / lines.max(1)] = b'\n';
    }
    data
}
