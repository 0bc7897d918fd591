//! Capture and replication of file attributes across a rewrite.
//!
//! The rewrite replaces the message's inode, so mode, owner and mtime have to
//! be copied from the original by hand. Dovecot uses the mtime as the
//! message's received date, which makes the timestamp as important as the
//! ownership.

use std::fs;
use std::fs::Metadata;
use std::io;
use std::path::Path;

use filetime::FileTime;

use crate::MaildirError;
use crate::Result;
use crate::error::Attribute;

/// Attributes of a message file captured before it is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileAttributes {
    /// Permission bits (`st_mode & 0o7777`).
    pub mode: u32,
    /// Last modification time.
    pub modified: FileTime,
    /// Owning user id.
    pub uid: u32,
    /// Owning group id.
    pub gid: u32,
}

impl FileAttributes {
    /// Extracts attributes from already fetched metadata.
    #[cfg(unix)]
    #[must_use]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        Self {
            mode: metadata.mode() & 0o7777,
            modified: FileTime::from_last_modification_time(metadata),
            uid: metadata.uid(),
            gid: metadata.gid(),
        }
    }

    /// Extracts attributes from already fetched metadata.
    ///
    /// Only the read-only bit and the mtime exist off Unix.
    #[cfg(not(unix))]
    #[must_use]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            mode: if metadata.permissions().readonly() {
                0o444
            } else {
                0o644
            },
            modified: FileTime::from_last_modification_time(metadata),
            uid: 0,
            gid: 0,
        }
    }

    /// Captures the attributes of the regular file at `path`.
    ///
    /// Symlinks are not followed.
    ///
    /// # Errors
    ///
    /// Returns [`MaildirError::Io`] if the file cannot be stat'ed and
    /// [`MaildirError::NotARegularFile`] if it is not a regular file.
    pub fn capture(path: &Path) -> Result<Self> {
        let metadata = fs::symlink_metadata(path).map_err(|source| MaildirError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !metadata.file_type().is_file() {
            return Err(MaildirError::NotARegularFile {
                path: path.to_path_buf(),
            });
        }
        Ok(Self::from_metadata(&metadata))
    }

    /// Applies the captured attributes to `path`.
    ///
    /// Ownership is restored first since `chown` may clear set-id bits. The
    /// access time is set to now.
    ///
    /// # Errors
    ///
    /// Returns [`MaildirError::AttributeRestore`] naming the first attribute
    /// that could not be applied.
    pub fn restore(&self, path: &Path) -> Result<()> {
        let fail = |attribute| {
            move |source| MaildirError::AttributeRestore {
                path: path.to_path_buf(),
                attribute,
                source,
            }
        };

        self.restore_ownership(path)
            .map_err(fail(Attribute::Ownership))?;
        set_mode(path, self.mode).map_err(fail(Attribute::Mode))?;
        filetime::set_file_times(path, FileTime::now(), self.modified)
            .map_err(fail(Attribute::ModificationTime))?;
        Ok(())
    }

    #[cfg(unix)]
    fn restore_ownership(&self, path: &Path) -> io::Result<()> {
        use nix::unistd::Gid;
        use nix::unistd::Uid;
        use nix::unistd::chown;

        chown(
            path,
            Some(Uid::from_raw(self.uid)),
            Some(Gid::from_raw(self.gid)),
        )
        .map_err(io::Error::from)
    }

    #[cfg(not(unix))]
    fn restore_ownership(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
}

#[cfg(not(unix))]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_readonly(mode & 0o200 == 0);
    fs::set_permissions(path, permissions)
}
