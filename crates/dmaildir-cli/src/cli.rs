//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

const AFTER_LONG_HELP: &str = "\
Decompression rewrites message files in place. Stop the mail server and any \
delivery agent before running `dmaildir uncompress`.

Boolean flags can also be set through DMAILDIR_* environment variables or a \
TOML configuration file (default ~/.dmaildir.toml). Command-line flags win \
over the environment, which wins over the file.";

#[derive(Parser)]
#[command(name = "dmaildir")]
#[command(author, version, about, long_about = None)]
#[command(after_long_help = AFTER_LONG_HELP)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Scan all maildirs rooted at DIR
    #[arg(short, long, global = true, env = "DMAILDIR_RECURSE")]
    pub recurse: bool,

    /// Select uncompressed message files
    #[arg(short, long, global = true, env = "DMAILDIR_UNCOMPRESSED")]
    pub uncompressed: bool,

    /// Select all message files
    #[arg(short, long, global = true, env = "DMAILDIR_ALL")]
    pub all: bool,

    /// Output maildirs containing selected files instead of the files
    #[arg(short, long, global = true, env = "DMAILDIR_MAILDIRS")]
    pub maildirs: bool,

    /// Enable diagnostic output
    #[arg(short, long, global = true, env = "DMAILDIR_VERBOSE")]
    pub verbose: bool,

    /// Enable debugging output (dumps decoded lines)
    #[arg(short, long, global = true, env = "DMAILDIR_DEBUG")]
    pub debug: bool,

    /// Suppress non-error output
    #[arg(
        short,
        long,
        global = true,
        env = "DMAILDIR_QUIET",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true, env = "DMAILDIR_JSON")]
    pub json: bool,

    /// Stop decompressing at the first failing file
    #[arg(long, global = true, env = "DMAILDIR_FAIL_FAST")]
    pub fail_fast: bool,

    /// Configuration file (default: ~/.dmaildir.toml)
    #[arg(long, global = true, value_name = "FILE", env = "DMAILDIR_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List message files (or maildirs with -m)
    List(DirArgs),
    /// Decompress compressed message files in place
    Uncompress(DirArgs),
    /// Print a shell completion script
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct DirArgs {
    /// Maildir root (default: ~/Maildir)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["dmaildir", "list", "-r", "-a", "/tmp/Maildir"]).unwrap();
        assert!(cli.recurse);
        assert!(cli.all);
        assert!(!cli.uncompressed);
        match cli.command {
            Commands::List(args) => assert_eq!(args.dir, Some(PathBuf::from("/tmp/Maildir"))),
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["dmaildir", "-q", "-v", "list"]).is_err());
    }

    #[test]
    fn test_dir_is_optional() {
        let cli = Cli::try_parse_from(["dmaildir", "uncompress"]).unwrap();
        assert!(matches!(cli.command, Commands::Uncompress(DirArgs { dir: None })));
    }

    #[test]
    fn test_config_keys_are_arguments() {
        let command = Cli::command();
        for id in [
            "recurse",
            "uncompressed",
            "all",
            "maildirs",
            "verbose",
            "debug",
            "quiet",
            "json",
            "fail_fast",
        ] {
            assert!(
                command.get_arguments().any(|arg| arg.get_id() == id),
                "missing argument {id}"
            );
        }
    }
}
