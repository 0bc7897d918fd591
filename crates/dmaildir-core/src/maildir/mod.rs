//! Maildir layout: directory discovery, message enumeration, and filename
//! metadata.

pub mod filename;
pub mod walker;

pub use filename::FilenameError;
pub use filename::FilenameMetadata;
pub use walker::CUR_DIR;
pub use walker::CandidateFile;
pub use walker::is_maildir;
pub use walker::list_maildir_files;
pub use walker::list_maildirs;
