//! session-index - build and search the session transcript index

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use output::colors;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", colors::error(&format!("Error: {:#}", e)));
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays clean for results
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Build { force } => commands::index::build(cli, *force),
        Command::Rebuild => commands::index::rebuild(cli),
        Command::Status => commands::index::status(cli),
        Command::Search {
            query,
            kind,
            limit,
            session,
        } => commands::search::run(cli, query.as_deref(), *kind, *limit, session.as_deref()),
    }
}
