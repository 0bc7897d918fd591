//! Maildir discovery and message enumeration.
//!
//! A Maildir is any directory with a `cur` subdirectory. Messages live
//! directly inside `cur`; nothing below it is ever a message.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use walkdir::WalkDir;

use crate::MaildirError;
use crate::MaildirOptions;
use crate::Result;
use crate::config::FileFilter;
use crate::formats::CompressionFormat;
use crate::formats::detect::detect_file;

/// Subdirectory holding delivered messages.
pub const CUR_DIR: &str = "cur";

/// A message file inside `cur/` with its content classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Full path to the message file.
    pub path: PathBuf,
    /// Format detected from the file's leading bytes.
    pub format: CompressionFormat,
}

impl CandidateFile {
    /// Returns `true` if the file holds a compressed stream.
    #[must_use]
    pub const fn is_compressed(&self) -> bool {
        self.format.is_compressed()
    }
}

/// Returns `true` if `path` is a directory with a `cur` subdirectory.
///
/// # Errors
///
/// Returns [`MaildirError::Io`] if `path` cannot be stat'ed,
/// [`MaildirError::NotADirectory`] if it is not a directory, and
/// [`MaildirError::Io`] if `cur` exists but cannot be stat'ed. A missing
/// `cur` is not an error.
pub fn is_maildir(path: &Path) -> Result<bool> {
    let metadata = fs::metadata(path).map_err(|source| MaildirError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(MaildirError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    let cur = path.join(CUR_DIR);
    match fs::metadata(&cur) {
        Ok(metadata) => Ok(metadata.is_dir()),
        Err(e)
            if matches!(
                e.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) =>
        {
            Ok(false)
        }
        Err(source) => Err(MaildirError::Io { path: cur, source }),
    }
}

/// Lists the Maildirs rooted at `root`.
///
/// Without `options.recurse` the result is exactly `[root]`. With it, the
/// tree is walked in pre-order (siblings sorted by name, symlinks not
/// followed) and every directory that is itself a Maildir is returned,
/// `root` first.
///
/// # Errors
///
/// Returns [`MaildirError::NotAMaildir`] if `root` is not a Maildir, and the
/// first walk or stat error otherwise.
///
/// # Examples
///
/// ```no_run
/// use dmaildir_core::MaildirOptions;
/// use dmaildir_core::maildir::list_maildirs;
/// use std::path::Path;
///
/// let options = MaildirOptions::default().with_recurse(true);
/// for dir in list_maildirs(Path::new("/home/alice/Maildir"), &options)? {
///     println!("{}", dir.display());
/// }
/// # Ok::<(), dmaildir_core::MaildirError>(())
/// ```
pub fn list_maildirs(root: &Path, options: &MaildirOptions) -> Result<Vec<PathBuf>> {
    if !is_maildir(root)? {
        return Err(MaildirError::NotAMaildir {
            path: root.to_path_buf(),
        });
    }
    if !options.recurse {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut maildirs = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| MaildirError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() && is_maildir(entry.path())? {
            debug!(maildir = %entry.path().display(), "found maildir");
            maildirs.push(entry.into_path());
        }
    }
    Ok(maildirs)
}

/// Lists regular files directly inside `maildir/cur` that pass `filter`.
///
/// Files are returned sorted by name. Every file is classified; a file that
/// cannot be classified aborts the whole listing rather than being skipped.
///
/// # Errors
///
/// Returns [`MaildirError::NotADirectory`] if `maildir` is not a directory,
/// [`MaildirError::Io`] if `cur` cannot be read, and the first
/// classification error.
pub fn list_maildir_files(maildir: &Path, filter: FileFilter) -> Result<Vec<CandidateFile>> {
    let metadata = fs::metadata(maildir).map_err(|source| MaildirError::Io {
        path: maildir.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(MaildirError::NotADirectory {
            path: maildir.to_path_buf(),
        });
    }

    let cur = maildir.join(CUR_DIR);
    let io_error = |source| MaildirError::Io {
        path: cur.clone(),
        source,
    };
    let mut entries = fs::read_dir(&cur)
        .and_then(Iterator::collect::<io::Result<Vec<_>>>)
        .map_err(io_error)?;
    entries.sort_by_key(fs::DirEntry::file_name);

    let mut files = Vec::new();
    for entry in entries {
        let file_type = entry.file_type().map_err(io_error)?;
        if !file_type.is_file() {
            continue;
        }
        let path = entry.path();
        let format = detect_file(&path)?;
        if filter.matches(format) {
            debug!(
                index = files.len() + 1,
                compressed = format.is_compressed(),
                path = %path.display(),
                "listed message"
            );
            files.push(CandidateFile { path, format });
        }
    }
    Ok(files)
}
