//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use super::formatter::failure_summary;
use super::humanize_bytes;
use anyhow::Result;
use console::Term;
use console::style;
use dmaildir_core::BatchReport;
use dmaildir_core::CandidateFile;
use dmaildir_core::FileFailure;
use std::path::PathBuf;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn failure_line(&self, failure: &FileFailure) -> String {
        let label = if failure.error.is_partial_completion() {
            "WARNING:"
        } else if failure.error.is_format_error() {
            "SKIPPED:"
        } else {
            "FAILED:"
        };
        let label = match (self.use_colors, failure.error.is_partial_completion()) {
            (false, _) => label.to_string(),
            (true, true) => style(label).yellow().bold().to_string(),
            (true, false) => style(label).red().bold().to_string(),
        };
        format!("{label} {}: {}", failure.path.display(), failure.error)
    }

    fn file_line(&self, file: &CandidateFile) -> String {
        if self.verbose {
            format!("{:<5} {}", file.format.name(), file.path.display())
        } else {
            file.path.display().to_string()
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_file_list(&self, files: &[CandidateFile]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for file in files {
            self.term.write_line(&self.file_line(file))?;
        }

        Ok(())
    }

    fn format_maildir_list(&self, maildirs: &[PathBuf]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for maildir in maildirs {
            self.term.write_line(&maildir.display().to_string())?;
        }

        Ok(())
    }

    fn format_uncompress_result(&self, report: &BatchReport) -> Result<()> {
        // Failures are reported even with --quiet.
        for failure in &report.failures {
            let _ = self.err_term.write_line(&self.failure_line(failure));
        }

        if self.quiet {
            return Ok(());
        }

        let summary = failure_summary(report);
        match (&summary, self.use_colors) {
            (None, true) => {
                let _ = self.term.write_line(&format!(
                    "{} Decompression complete",
                    style("✓").green().bold()
                ));
            }
            (None, false) => {
                let _ = self.term.write_line("Decompression complete");
            }
            (Some(summary), true) => {
                let _ = self
                    .term
                    .write_line(&format!("{} {summary}", style("✗").red().bold()));
            }
            (Some(summary), false) => {
                let _ = self.term.write_line(summary);
            }
        }

        let _ = self.term.write_line(&format!(
            "  Messages decompressed: {}",
            report.files_uncompressed()
        ));
        let _ = self
            .term
            .write_line(&format!("  Failed: {}", report.failures.len()));
        let _ = self.term.write_line(&format!(
            "  Total size: {}",
            humanize_bytes(report.bytes_written)
        ));

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Maildirs scanned: {}", report.maildirs_scanned));
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", report.duration));
            for file in &report.uncompressed {
                let _ = self.term.write_line(&format!(
                    "  {} {} ({} B, {} lines)",
                    file.format.name(),
                    file.path.display(),
                    file.actual_size,
                    file.line_count
                ));
            }
        }

        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }
}
