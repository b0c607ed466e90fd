//! # Konflux Configuration Generator
//!
//! This is the binary entry point for the `konflux` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the generator over every configuration file given.
//! - Reporting failures and exiting with a non-zero status.
//!
//! The generation logic lives in the `konflux_config` library crate; the
//! binary is a thin wrapper around it.

mod cli;
mod commands;

use clap::Parser;
use log::error;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(e) = cli.execute() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
