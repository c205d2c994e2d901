//! # CLI Module
//!
//! Argument parsing and command dispatch for the `accbridge` binary.

pub mod args;
pub mod commands;
pub mod errors;

pub use errors::{CliError, CliResult};

use args::{Cli, Command};

/// Parse arguments and run the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match cli.command {
        Command::Start { config } => commands::start(&config),
        Command::Check { config } => commands::check(&config),
        Command::Explain { statement } => commands::explain(&statement),
    }
}
