//! In-place decompression of a single message file.
//!
//! The file is read whole, decoded in memory, and checked against the `S=`
//! and `W=` sizes in its name. Only content that passes every check reaches
//! disk, through a temporary file renamed over the original, after which the
//! original mode, ownership and mtime are reapplied.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;
use tracing::info;

use crate::MaildirError;
use crate::MaildirOptions;
use crate::Result;
use crate::attributes::FileAttributes;
use crate::error::SizeKey;
use crate::formats::DecodedContent;
use crate::formats::decode::decode;
use crate::formats::detect::detect_compression;
use crate::maildir::CUR_DIR;
use crate::maildir::FilenameMetadata;
use crate::report::UncompressReport;

/// Maildir staging directory, a sibling of `cur`.
const TMP_DIR: &str = "tmp";

/// Decompresses one message file in place.
///
/// Steps, in order:
///
/// 1. capture mode, owner and mtime
/// 2. parse the filename (malformed names fail here, before any decode)
/// 3. read, detect and decode the content in memory
/// 4. compare decoded size with `S=` and size plus line count with `W=`
/// 5. atomically replace the file with the decoded bytes
/// 6. reapply the captured attributes
///
/// Any failure before step 5 leaves the file untouched. A failure in step 6
/// is reported as [`MaildirError::AttributeRestore`].
///
/// # Errors
///
/// Returns the first failure as a [`MaildirError`] naming the file.
///
/// # Examples
///
/// ```no_run
/// use dmaildir_core::MaildirOptions;
/// use dmaildir_core::uncompress_file;
/// use std::path::Path;
///
/// let path = Path::new("/home/alice/Maildir/cur/1700000000.1,S=120,W=123:2,S");
/// let report = uncompress_file(path, &MaildirOptions::default())?;
/// println!("{} -> {} bytes", report.format, report.actual_size);
/// # Ok::<(), dmaildir_core::MaildirError>(())
/// ```
pub fn uncompress_file(path: &Path, options: &MaildirOptions) -> Result<UncompressReport> {
    let attributes = FileAttributes::capture(path)?;
    let metadata = FilenameMetadata::from_path(path)?;

    let raw = fs::read(path).map_err(|source| MaildirError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let format =
        detect_compression(raw.as_slice()).map_err(|e| MaildirError::from_detect(path, e))?;
    debug!(path = %path.display(), %format, compressed_size = raw.len(), "decoding");
    let content = decode(format, raw.as_slice()).map_err(|e| MaildirError::from_decode(path, e))?;
    drop(raw);

    let line_count = content.line_count();
    let actual_size = content.len();
    let actual_virtual_size = actual_size + line_count;

    if options.debug {
        dump_lines(path, &content);
    }
    if options.verbose {
        info!(
            path = %path.display(),
            %format,
            flags = %metadata.flags,
            size = actual_size,
            size_w = actual_virtual_size,
            name_size = ?metadata.size,
            name_size_w = ?metadata.virtual_size,
            "decoded message"
        );
    }

    check_declared(path, SizeKey::Size, metadata.size, actual_size)?;
    check_declared(
        path,
        SizeKey::VirtualSize,
        metadata.virtual_size,
        actual_virtual_size,
    )?;

    commit(path, content.as_bytes(), &attributes)?;
    debug!(path = %path.display(), bytes = actual_size, "rewrote message");

    Ok(UncompressReport {
        path: path.to_path_buf(),
        format,
        flags: metadata.flags,
        declared_size: metadata.size,
        declared_virtual_size: metadata.virtual_size,
        actual_size,
        actual_virtual_size,
        line_count,
    })
}

/// Fails if a declared size is present and differs from the computed one.
fn check_declared(path: &Path, key: SizeKey, declared: Option<u64>, actual: u64) -> Result<()> {
    match declared {
        Some(declared) if declared != actual => Err(MaildirError::SizeMismatch {
            path: path.to_path_buf(),
            key,
            declared,
            actual,
        }),
        _ => Ok(()),
    }
}

/// Writes the verified content, then reapplies the captured attributes.
///
/// An error from the second step means the content is already replaced.
fn commit(path: &Path, data: &[u8], attributes: &FileAttributes) -> Result<()> {
    replace_contents(path, data)?;
    attributes.restore(path)
}

/// Replaces the content of `path` with `data` in one rename.
///
/// The decoded bytes are staged in the Maildir's `tmp` directory when the
/// file sits in `cur` next to one, otherwise beside the file itself.
fn replace_contents(path: &Path, data: &[u8]) -> Result<()> {
    let write_error = |source| MaildirError::Write {
        path: path.to_path_buf(),
        source,
    };

    let staging = staging_dir(path);
    let mut staged = NamedTempFile::new_in(&staging).map_err(write_error)?;
    staged.write_all(data).map_err(write_error)?;
    staged.as_file().sync_all().map_err(write_error)?;
    staged.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

fn staging_dir(path: &Path) -> std::path::PathBuf {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    if parent.file_name().is_some_and(|name| name == CUR_DIR)
        && let Some(maildir) = parent.parent()
    {
        let tmp = maildir.join(TMP_DIR);
        if tmp.is_dir() {
            return tmp;
        }
    }
    parent.to_path_buf()
}

fn dump_lines(path: &Path, content: &DecodedContent) {
    for (number, line) in content.lines().enumerate() {
        debug!(
            path = %path.display(),
            line = number + 1,
            text = %String::from_utf8_lossy(line),
            "decoded line"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::formats::CompressionFormat;
    use crate::formats::detect::detect_file;
    use crate::test_utils::MaildirBuilder;
    use crate::test_utils::compress;

    /// 120 bytes with exactly three line terminators.
    fn message_120() -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(b"Subject: integrity\n");
        body.extend_from_slice(b"From: a@example.org\n");
        body.extend_from_slice(b"\n");
        while body.len() < 120 {
            body.push(b'x');
        }
        assert_eq!(body.len(), 120);
        assert_eq!(body.iter().filter(|&&b| b == b'\n').count(), 3);
        body
    }

    #[test]
    fn test_uncompress_matching_sizes() {
        let name = "1700000000.1,S=120,W=123:2,S";
        let maildir =
            MaildirBuilder::new().add_compressed(name, CompressionFormat::Zstd, &message_120());
        let path = maildir.cur().join(name);

        let report = uncompress_file(&path, &MaildirOptions::default()).unwrap();
        assert_eq!(report.format, CompressionFormat::Zstd);
        assert_eq!(report.actual_size, 120);
        assert_eq!(report.line_count, 3);
        assert_eq!(report.actual_virtual_size, 123);
        assert_eq!(report.declared_size, Some(120));
        assert_eq!(report.declared_virtual_size, Some(123));
        assert_eq!(report.flags, "2,S");

        assert_eq!(fs::read(&path).unwrap(), message_120());
        assert_eq!(detect_file(&path).unwrap(), CompressionFormat::Uncompressed);
    }

    #[test]
    fn test_uncompress_without_size_tokens() {
        let name = "1700000000.2.host:2,";
        let body = b"short\nmessage\nwithout tokens";
        let maildir = MaildirBuilder::new().add_compressed(name, CompressionFormat::Gzip, body);
        let path = maildir.cur().join(name);

        let report = uncompress_file(&path, &MaildirOptions::default()).unwrap();
        assert_eq!(report.declared_size, None);
        assert_eq!(report.declared_virtual_size, None);
        assert_eq!(fs::read(&path).unwrap(), body);
    }

    #[test]
    fn test_size_mismatch_leaves_file_untouched() {
        let name = "1700000000.1,S=120,W=123:2,S";
        let mut body = message_120();
        body.push(b'y');
        let maildir = MaildirBuilder::new().add_compressed(name, CompressionFormat::Bzip2, &body);
        let path = maildir.cur().join(name);
        let before = fs::read(&path).unwrap();

        let err = uncompress_file(&path, &MaildirOptions::default()).unwrap_err();
        assert_eq!(err.size_mismatch(), Some((SizeKey::Size, 120, 121)));
        assert!(err.to_string().contains("120"));
        assert!(err.to_string().contains("121"));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_virtual_size_mismatch_on_extra_line() {
        let name = "1700000000.1,W=123:2,S";
        let mut body = message_120();
        // Same length, one more terminator.
        body[119] = b'\n';
        let maildir = MaildirBuilder::new().add_compressed(name, CompressionFormat::Xz, &body);
        let path = maildir.cur().join(name);

        let err = uncompress_file(&path, &MaildirOptions::default()).unwrap_err();
        assert_eq!(err.size_mismatch(), Some((SizeKey::VirtualSize, 123, 124)));
    }

    #[test]
    fn test_malformed_name_rejected_before_decode() {
        // Content is a corrupt gzip stream: reaching the decoder would
        // produce a decode error instead.
        let maildir = MaildirBuilder::new()
            .add_plain("1700000000.1,S=5", &[0x1F, 0x8B, 0x00, 0x01, 0x02])
            .add_plain("1700000000.2,S=5:1,S", &[0x1F, 0x8B, 0x00, 0x01, 0x02]);

        let err = uncompress_file(
            &maildir.cur().join("1700000000.1,S=5"),
            &MaildirOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MaildirError::MissingFlagsSeparator { .. }));

        let err = uncompress_file(
            &maildir.cur().join("1700000000.2,S=5:1,S"),
            &MaildirOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MaildirError::MissingFlagsMarker { .. }));
    }

    #[test]
    fn test_corrupt_stream_is_decode_error() {
        let name = "1.1:2,";
        let mut data = compress(CompressionFormat::Zstd, b"hello world\n");
        data.truncate(data.len() - 3);
        let maildir = MaildirBuilder::new().add_plain(name, &data);
        let path = maildir.cur().join(name);

        let err = uncompress_file(&path, &MaildirOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            MaildirError::Decode {
                format: CompressionFormat::Zstd,
                ..
            }
        ));
        assert_eq!(fs::read(&path).unwrap(), data);
    }

    #[test]
    fn test_plain_file_is_unsupported() {
        let name = "1.1,S=6:2,";
        let maildir = MaildirBuilder::new().add_plain(name, b"plain\n");
        let err = uncompress_file(&maildir.cur().join(name), &MaildirOptions::default())
            .unwrap_err();
        assert!(matches!(err, MaildirError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_staging_in_maildir_tmp() {
        let maildir = MaildirBuilder::new();
        let path = maildir.cur().join("1:2,");
        assert_eq!(staging_dir(&path), maildir.root().join(TMP_DIR));
    }

    #[test]
    fn test_staging_beside_file_outside_maildir() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("1:2,");
        assert_eq!(staging_dir(&path), temp.path());
        assert_eq!(staging_dir(Path::new("1:2,")), Path::new("."));
    }

    #[test]
    fn test_no_staging_leftovers() {
        let name = "1.1:2,";
        let maildir =
            MaildirBuilder::new().add_compressed(name, CompressionFormat::Gzip, b"body\n");
        uncompress_file(&maildir.cur().join(name), &MaildirOptions::default()).unwrap();
        assert_eq!(fs::read_dir(maildir.root().join(TMP_DIR)).unwrap().count(), 0);
        assert_eq!(fs::read_dir(maildir.cur()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_attributes_preserved() {
        use filetime::FileTime;
        use std::os::unix::fs::MetadataExt;
        use std::os::unix::fs::PermissionsExt;

        let name = "1700000000.1,S=120,W=123:2,S";
        let maildir =
            MaildirBuilder::new().add_compressed(name, CompressionFormat::Gzip, &message_120());
        let path = maildir.cur().join(name);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        let mtime = FileTime::from_unix_time(1_700_000_000, 0);
        filetime::set_file_mtime(&path, mtime).unwrap();
        let before = fs::metadata(&path).unwrap();

        uncompress_file(&path, &MaildirOptions::default().with_verbose(true).with_debug(true))
            .unwrap();

        let after = fs::metadata(&path).unwrap();
        assert_eq!(after.mode() & 0o7777, 0o640);
        assert_eq!(FileTime::from_last_modification_time(&after), mtime);
        assert_eq!(after.uid(), before.uid());
        assert_eq!(after.gid(), before.gid());
        assert_eq!(after.len(), 120);
    }

    #[cfg(unix)]
    #[test]
    fn test_ownership_failure_after_content_replaced() {
        let name = "1.1,S=5:2,";
        let maildir =
            MaildirBuilder::new().add_compressed(name, CompressionFormat::Gzip, b"mail\n");
        let path = maildir.cur().join(name);
        let mut attributes = FileAttributes::capture(&path).unwrap();
        // Root may chown to anyone.
        if attributes.uid == 0 {
            return;
        }
        attributes.uid += 1;

        let err = commit(&path, b"mail\n", &attributes).unwrap_err();
        assert!(matches!(
            err,
            MaildirError::AttributeRestore {
                attribute: crate::error::Attribute::Ownership,
                ..
            }
        ));
        assert!(err.is_partial_completion());
        assert!(!err.original_preserved());
        assert_eq!(fs::read(&path).unwrap(), b"mail\n");
    }

    #[test]
    fn test_check_declared() {
        let path = Path::new("x");
        assert!(check_declared(path, SizeKey::Size, None, 10).is_ok());
        assert!(check_declared(path, SizeKey::Size, Some(10), 10).is_ok());
        assert!(check_declared(path, SizeKey::Size, Some(9), 10).is_err());
        assert!(check_declared(path, SizeKey::Size, Some(11), 10).is_err());
    }
}
