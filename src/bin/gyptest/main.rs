//! gyptest CLI - verify gyp-generated builds

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gyptest::util::diagnostic::emit;
use gyptest::VerifyError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        match e.downcast_ref::<VerifyError>() {
            Some(err) => {
                emit(&err.to_diagnostic(), color);
                std::process::exit(err.exit_code());
            }
            None => {
                eprintln!("error: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("gyptest=debug")
    } else {
        EnvFilter::new("gyptest=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let scenario = &cli.scenario;

    match cli.command {
        Commands::Formats(args) => commands::formats::execute(args),
        Commands::Check(args) => commands::check::execute(args),
        Commands::Build(args) => commands::build::execute(args, scenario),
        Commands::UpToDate(args) => commands::up_to_date::execute(args, scenario),
        Commands::Path(args) => commands::path::execute(args, scenario),
        Commands::Run(args) => commands::run::execute(args, scenario),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
