//! Error conversion utilities for CLI.
//!
//! Converts dmaildir-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use dmaildir_core::MaildirError;
use dmaildir_core::error::Attribute;

/// Converts `MaildirError` to user-friendly anyhow error with context
pub fn convert_maildir_error(err: MaildirError) -> anyhow::Error {
    match err {
        MaildirError::NotAMaildir { path } => {
            anyhow!(
                "'{}' is not a maildir (no 'cur' directory)\n\
                 HINT: Pass the maildir root, or use --recurse from a parent of several maildirs.",
                path.display()
            )
        }
        MaildirError::ShortHeader { path, len } => {
            anyhow!(
                "Cannot classify '{}': only {len} byte(s)\n\
                 HINT: Empty or truncated message files stop the listing. Inspect or move the file.",
                path.display()
            )
        }
        MaildirError::SizeMismatch {
            path,
            key,
            declared,
            actual,
        } => {
            anyhow!(
                "Integrity check failed for '{}': decoded {key}={actual}, filename says {key}={declared}\n\
                 HINT: The file was left compressed. The stored data may be damaged.",
                path.display()
            )
        }
        MaildirError::AttributeRestore {
            path,
            attribute,
            source,
        } => {
            let hint = match attribute {
                Attribute::Ownership => "Run as root (or the mailbox owner) to restore ownership.",
                Attribute::Mode | Attribute::ModificationTime => {
                    "Check the file by hand; Dovecot uses the mtime as received date."
                }
            };
            anyhow!(
                "'{}' was decompressed but its {attribute} could not be restored: {source}\n\
                 HINT: {hint}",
                path.display()
            )
        }
        MaildirError::MissingFlagsSeparator { .. } | MaildirError::MissingFlagsMarker { .. } => {
            let path = err.path().display().to_string();
            anyhow::Error::from(err).context(format!(
                "Skipped '{path}': not a Maildir message filename\n\
                 HINT: Expected '<unique-name>:2,<flags>'."
            ))
        }
        MaildirError::Write { .. } => {
            let path = err.path().display().to_string();
            anyhow::Error::from(err).context(format!(
                "Could not rewrite '{path}'; the original is unchanged\n\
                 HINT: Check free space and write permission on the maildir."
            ))
        }
        _ => anyhow::Error::from(err),
    }
}

/// Converts the error of a core result.
pub fn add_maildir_context<T>(result: dmaildir_core::Result<T>) -> anyhow::Result<T> {
    result.map_err(convert_maildir_error)
}
