//! Integrity-checked decompression of Maildir messages.
//!
//! Dovecot can store Maildir messages compressed with gzip, bzip2, xz or
//! zstd. `dmaildir-core` finds those files by content, decodes them, checks
//! the result against the `S=` (size) and `W=` (virtual size) values in the
//! filename, and only then rewrites the file in place with its original
//! mode, owner and modification time.
//!
//! # Examples
//!
//! ```no_run
//! use dmaildir_core::MaildirOptions;
//! use dmaildir_core::NoopProgress;
//! use dmaildir_core::uncompress_maildir;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = MaildirOptions::default().with_recurse(true);
//! let report = uncompress_maildir("/home/alice/Maildir", &options, &mut NoopProgress)?;
//! println!("Decompressed {} messages", report.files_uncompressed());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod attributes;
pub mod config;
pub mod error;
pub mod formats;
pub mod maildir;
pub mod report;
pub mod uncompress;

#[cfg(test)]
mod test_utils;

// Re-export main API types
pub use api::list_files;
pub use api::list_maildirs;
pub use api::list_maildirs_with_files;
pub use api::uncompress_maildir;
pub use config::FileFilter;
pub use config::MaildirOptions;
pub use error::MaildirError;
pub use error::Result;
pub use error::SizeKey;
pub use formats::CompressionFormat;
pub use maildir::CandidateFile;
pub use maildir::FilenameMetadata;
pub use report::BatchReport;
pub use report::FileFailure;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use report::UncompressReport;
pub use uncompress::uncompress_file;
