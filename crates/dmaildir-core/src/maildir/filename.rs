//! Maildir filename metadata.
//!
//! Dovecot names message files `<unique-name>:2,<flags>`, where the unique
//! name is a comma-separated token list. Two tokens carry integrity hints:
//!
//! - `S=<n>`: size of the message in bytes, as stored uncompressed
//! - `W=<n>`: "virtual" size, the byte size with every LF counted as CRLF
//!
//! Example: `1700000000.M1P2.host,S=120,W=123:2,S`.

use std::path::Path;

use thiserror::Error;

use crate::MaildirError;
use crate::Result;

/// Prefix every flags segment must start with.
pub const FLAGS_MARKER: &str = "2,";

/// Errors produced by [`FilenameMetadata::parse`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    /// No `:` in the filename.
    #[error("missing ':' in filename")]
    MissingSeparator,

    /// Flags segment does not begin with `2,`.
    #[error("missing '2,' in filename flags '{flags}'")]
    MissingMarker {
        /// Everything after the first `:`.
        flags: String,
    },
}

/// Metadata parsed from a Maildir message filename.
///
/// A size is `None` when its token is absent, not an integer, or not
/// positive. Only `Some` values take part in validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameMetadata {
    /// Part before the first `:`.
    pub unique_name: String,
    /// Part after the first `:`, starting with `2,`.
    pub flags: String,
    /// Declared decoded size (`S=`).
    pub size: Option<u64>,
    /// Declared decoded size plus line terminators (`W=`).
    pub virtual_size: Option<u64>,
}

impl FilenameMetadata {
    /// Parses a bare filename (no directory components).
    ///
    /// # Errors
    ///
    /// Returns [`FilenameError::MissingSeparator`] if there is no `:`, and
    /// [`FilenameError::MissingMarker`] if the flags do not begin with `2,`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dmaildir_core::maildir::FilenameMetadata;
    ///
    /// let meta = FilenameMetadata::parse("1700000000.1,S=120,W=123:2,S").unwrap();
    /// assert_eq!(meta.size, Some(120));
    /// assert_eq!(meta.virtual_size, Some(123));
    /// assert_eq!(meta.flags, "2,S");
    ///
    /// assert!(FilenameMetadata::parse("1700000000.1,S=120").is_err());
    /// ```
    pub fn parse(file_name: &str) -> std::result::Result<Self, FilenameError> {
        let (unique_name, flags) = file_name
            .split_once(':')
            .ok_or(FilenameError::MissingSeparator)?;

        if !flags.starts_with(FLAGS_MARKER) {
            return Err(FilenameError::MissingMarker {
                flags: flags.to_string(),
            });
        }

        let mut size = None;
        let mut virtual_size = None;
        for token in unique_name.split(',') {
            let Some((key, value)) = token.split_once('=') else {
                continue;
            };
            match key {
                "S" => size = declared_value(value),
                "W" => virtual_size = declared_value(value),
                _ => {}
            }
        }

        Ok(Self {
            unique_name: unique_name.to_string(),
            flags: flags.to_string(),
            size,
            virtual_size,
        })
    }

    /// Parses the final component of `path`.
    ///
    /// Only the filename is considered, so a `:` in a parent directory never
    /// counts as the flags separator.
    ///
    /// # Errors
    ///
    /// Returns [`MaildirError::MissingFlagsSeparator`] or
    /// [`MaildirError::MissingFlagsMarker`] with `path` attached.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        Self::parse(&file_name).map_err(|e| MaildirError::from_filename(path, e))
    }

    /// Single-letter flags after the `2,` marker.
    #[must_use]
    pub fn flag_letters(&self) -> &str {
        self.flags
            .strip_prefix(FLAGS_MARKER)
            .unwrap_or(&self.flags)
    }
}

/// Interprets a token value: positive integers only.
fn declared_value(value: &str) -> Option<u64> {
    value.parse::<u64>().ok().filter(|&n| n > 0)
}
