//! dmaildir CLI - Integrity-checked decompression of Dovecot Maildir
//! messages.

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod progress;

use std::process::ExitCode;

use clap::CommandFactory;
use clap::FromArgMatches;

fn main() -> ExitCode {
    let matches = cli::Cli::command().get_matches();
    let cli = match cli::Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };
    let operation = match &cli.command {
        cli::Commands::List(_) => "list",
        cli::Commands::Uncompress(_) => "uncompress",
        cli::Commands::Completion(_) => "completion",
    };

    let settings = match config::FileConfig::load(cli.config.as_deref())
        .and_then(|file| config::Settings::resolve(&cli, &matches, &file))
    {
        Ok(settings) => settings,
        Err(err) => {
            output::create_formatter(cli.json, false, false).format_error(operation, &err);
            return ExitCode::FAILURE;
        }
    };

    logging::init(&settings);
    let formatter = output::create_formatter(settings.json, settings.verbose, settings.quiet);

    let result = match &cli.command {
        cli::Commands::List(args) => commands::list::execute(args, &settings, &*formatter),
        cli::Commands::Uncompress(args) => {
            commands::uncompress::execute(args, &settings, &*formatter)
        }
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(ExitCode::SUCCESS)
        }
    };

    result.unwrap_or_else(|err| {
        formatter.format_error(operation, &err);
        ExitCode::FAILURE
    })
}
