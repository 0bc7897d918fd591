//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::failure_summary;
use anyhow::Result;
use dmaildir_core::BatchReport;
use dmaildir_core::CandidateFile;
use dmaildir_core::CompressionFormat;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::PathBuf;

pub struct JsonFormatter;

#[derive(Serialize)]
struct FileEntry {
    path: String,
    format: CompressionFormat,
}

#[derive(Serialize)]
struct UncompressedEntry {
    path: String,
    format: CompressionFormat,
    flags: String,
    size: u64,
    virtual_size: u64,
    lines: u64,
}

#[derive(Serialize)]
struct FailureEntry {
    path: String,
    code: &'static str,
    message: String,
    original_preserved: bool,
}

#[derive(Serialize)]
struct UncompressOutput {
    maildirs_scanned: usize,
    files_considered: usize,
    files_uncompressed: usize,
    bytes_written: u64,
    duration_ms: u128,
    stopped_early: bool,
    uncompressed: Vec<UncompressedEntry>,
    failures: Vec<FailureEntry>,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn uncompress_output(report: &BatchReport) -> UncompressOutput {
        UncompressOutput {
            maildirs_scanned: report.maildirs_scanned,
            files_considered: report.files_considered,
            files_uncompressed: report.files_uncompressed(),
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
            stopped_early: report.stopped_early,
            uncompressed: report
                .uncompressed
                .iter()
                .map(|file| UncompressedEntry {
                    path: file.path.display().to_string(),
                    format: file.format,
                    flags: file.flags.clone(),
                    size: file.actual_size,
                    virtual_size: file.actual_virtual_size,
                    lines: file.line_count,
                })
                .collect(),
            failures: report
                .failures
                .iter()
                .map(|failure| FailureEntry {
                    path: failure.path.display().to_string(),
                    code: failure.error.code(),
                    message: failure.error.to_string(),
                    original_preserved: failure.error.original_preserved(),
                })
                .collect(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_file_list(&self, files: &[CandidateFile]) -> Result<()> {
        #[derive(Serialize)]
        struct ListOutput {
            files: Vec<FileEntry>,
        }

        let data = ListOutput {
            files: files
                .iter()
                .map(|file| FileEntry {
                    path: file.path.display().to_string(),
                    format: file.format,
                })
                .collect(),
        };
        Self::output(&JsonOutput::success("list", data))
    }

    fn format_maildir_list(&self, maildirs: &[PathBuf]) -> Result<()> {
        #[derive(Serialize)]
        struct MaildirsOutput {
            maildirs: Vec<String>,
        }

        let data = MaildirsOutput {
            maildirs: maildirs
                .iter()
                .map(|dir| dir.display().to_string())
                .collect(),
        };
        Self::output(&JsonOutput::success("list", data))
    }

    fn format_uncompress_result(&self, report: &BatchReport) -> Result<()> {
        let data = Self::uncompress_output(report);
        match failure_summary(report) {
            None => Self::output(&JsonOutput::success("uncompress", data)),
            Some(summary) => Self::output(&JsonOutput::partial("uncompress", data, summary)),
        }
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dmaildir_core::MaildirError;
    use dmaildir_core::SizeKey;
    use dmaildir_core::UncompressReport;

    #[test]
    fn test_uncompress_output_structure() {
        let mut report = BatchReport::new();
        report.files_considered = 2;
        report.record_success(UncompressReport {
            path: PathBuf::from("cur/1:2,S"),
            format: CompressionFormat::Zstd,
            flags: "2,S".to_string(),
            declared_size: None,
            declared_virtual_size: None,
            actual_size: 10,
            actual_virtual_size: 12,
            line_count: 2,
        });
        report.record_failure(
            PathBuf::from("cur/2,S=9:2,"),
            MaildirError::SizeMismatch {
                path: PathBuf::from("cur/2,S=9:2,"),
                key: SizeKey::Size,
                declared: 9,
                actual: 8,
            },
        );

        let output = JsonFormatter::uncompress_output(&report);
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["files_uncompressed"], 1);
        assert_eq!(value["bytes_written"], 10);
        assert_eq!(value["uncompressed"][0]["format"], "zstd");
        assert_eq!(value["uncompressed"][0]["virtual_size"], 12);
        assert_eq!(value["failures"][0]["code"], "SIZE_MISMATCH");
        assert_eq!(value["failures"][0]["original_preserved"], true);
    }
}
