//! Output formatter trait for CLI results.

use anyhow::Result;
use dmaildir_core::BatchReport;
use dmaildir_core::CandidateFile;
use serde::Serialize;
use std::path::PathBuf;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format a message file listing
    fn format_file_list(&self, files: &[CandidateFile]) -> Result<()>;

    /// Format a maildir listing
    fn format_maildir_list(&self, maildirs: &[PathBuf]) -> Result<()>;

    /// Format batch decompression result
    fn format_uncompress_result(&self, report: &BatchReport) -> Result<()>;

    /// Format error message
    fn format_error(&self, operation: &str, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    /// An error document that still carries result data.
    pub fn partial(operation: impl Into<String>, data: T, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: Some(data),
            error: Some(error.into()),
        }
    }

    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// One-line summary of batch failures, if any.
pub fn failure_summary(report: &BatchReport) -> Option<String> {
    if report.is_success() {
        return None;
    }
    let mut summary = format!(
        "{} of {} compressed messages failed",
        report.failures.len(),
        report.files_considered
    );
    if report.stopped_early {
        summary.push_str(" (stopped at first failure)");
    }
    Some(summary)
}
