//! accbridge CLI entry point
//!
//! A minimal entrypoint: parse arguments, dispatch, print errors to
//! stderr, exit non-zero on failure. All logic lives in the cli module.

use accbridge::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
