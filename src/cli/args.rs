//! CLI argument definitions using clap
//!
//! Commands:
//! - accbridge start --config <path>
//! - accbridge check --config <path>
//! - accbridge explain <statement>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// accbridge - local HTTP query gateway for legacy Access database files
#[derive(Parser, Debug)]
#[command(name = "accbridge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the gateway
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./accbridge.json")]
        config: PathBuf,
    },

    /// Validate the configuration and database file, then exit
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./accbridge.json")]
        config: PathBuf,
    },

    /// Print the Access SQL a read-only statement compiles to, then exit
    Explain {
        /// MySQL-style SELECT statement
        statement: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
