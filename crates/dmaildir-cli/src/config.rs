//! Resolution of effective settings from flags, environment and the
//! configuration file.
//!
//! clap already merges flags with `DMAILDIR_*` variables. A value from the
//! TOML file is used only where neither of them supplied one.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::ArgMatches;
use clap::parser::ValueSource;
use dmaildir_core::FileFilter;
use dmaildir_core::MaildirOptions;
use serde::Deserialize;

use crate::cli::Cli;

/// Configuration file looked up in the home directory.
pub const DEFAULT_CONFIG_NAME: &str = ".dmaildir.toml";

/// Maildir used when no directory is given.
pub const DEFAULT_MAILDIR_NAME: &str = "Maildir";

/// Contents of the TOML configuration file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub maildir: Option<PathBuf>,
    pub recurse: Option<bool>,
    pub uncompressed: Option<bool>,
    pub all: Option<bool>,
    pub maildirs: Option<bool>,
    pub verbose: Option<bool>,
    pub debug: Option<bool>,
    pub quiet: Option<bool>,
    pub json: Option<bool>,
    pub fail_fast: Option<bool>,
}

impl FileConfig {
    /// Loads the file at `explicit`, or the default file if present.
    ///
    /// A missing default file yields an empty config; a missing explicit
    /// file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => match dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_NAME)) {
                Some(path) => match Self::read(&path) {
                    Err(e) if is_not_found(&e) => Ok(Self::default()),
                    other => other,
                },
                None => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        Self::parse(&text)
            .with_context(|| format!("invalid config file '{}'", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn flag(&self, id: &str) -> Option<bool> {
        match id {
            "recurse" => self.recurse,
            "uncompressed" => self.uncompressed,
            "all" => self.all,
            "maildirs" => self.maildirs,
            "verbose" => self.verbose,
            "debug" => self.debug,
            "quiet" => self.quiet,
            "json" => self.json,
            "fail_fast" => self.fail_fast,
            _ => None,
        }
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}

/// Effective global settings after merging every source.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Settings {
    pub recurse: bool,
    pub uncompressed: bool,
    pub all: bool,
    pub maildirs: bool,
    pub verbose: bool,
    pub debug: bool,
    pub quiet: bool,
    pub json: bool,
    pub fail_fast: bool,
    pub maildir: Option<PathBuf>,
}

impl Settings {
    /// Merges parsed flags with the configuration file.
    pub fn resolve(cli: &Cli, matches: &ArgMatches, file: &FileConfig) -> Result<Self> {
        let pick = |id: &str, value: bool| {
            if explicitly_set(matches, id) {
                value
            } else {
                file.flag(id).unwrap_or(value)
            }
        };

        let settings = Self {
            recurse: pick("recurse", cli.recurse),
            uncompressed: pick("uncompressed", cli.uncompressed),
            all: pick("all", cli.all),
            maildirs: pick("maildirs", cli.maildirs),
            verbose: pick("verbose", cli.verbose),
            debug: pick("debug", cli.debug),
            quiet: pick("quiet", cli.quiet),
            json: pick("json", cli.json),
            fail_fast: pick("fail_fast", cli.fail_fast),
            maildir: file.maildir.clone(),
        };
        if settings.quiet && settings.verbose {
            bail!("'quiet' and 'verbose' cannot both be enabled");
        }
        Ok(settings)
    }

    /// Core options derived from these settings.
    pub fn options(&self) -> MaildirOptions {
        MaildirOptions::default()
            .with_recurse(self.recurse)
            .with_filter(FileFilter::from_flags(self.uncompressed, self.all))
            .with_verbose(self.verbose)
            .with_debug(self.debug)
            .with_fail_fast(self.fail_fast)
    }

    /// Directory to operate on: the argument, then the configured maildir,
    /// then `~/Maildir`.
    pub fn maildir(&self, arg: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = arg.or(self.maildir.as_deref()) {
            return Ok(dir.to_path_buf());
        }
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_MAILDIR_NAME))
            .context("cannot determine home directory\nHINT: Pass the maildir path explicitly.")
    }
}

/// Returns `true` if the flag came from the command line or environment.
///
/// Global flags given after the subcommand are recorded in the
/// subcommand's matches.
fn explicitly_set(matches: &ArgMatches, id: &str) -> bool {
    let here = matches!(
        matches.value_source(id),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    );
    here || matches
        .subcommand()
        .is_some_and(|(_, sub)| explicitly_set(sub, id))
}
