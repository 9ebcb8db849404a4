//! Ledger CLI: the `ledger` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    support::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Export { source, json } => commands::export::run(source, json),

        Commands::Get { path, source, json } => commands::get::run(path, source, json),

        Commands::Validate { source, json } => commands::validate::run(source, json),

        Commands::Provenance { path, source, json } => {
            commands::provenance::run(path, source, json)
        }
    }
}
