//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::commands;

/// Generate Konflux configuration for OpenShift Pipelines repositories and
/// propose it as pull requests
#[derive(Parser, Debug)]
#[command(name = "konflux")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    generate: commands::generate::GenerateArgs,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        konflux_config::output::init_logging(self.log_level)?;
        commands::generate::execute(self.generate)
    }
}
