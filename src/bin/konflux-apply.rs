//! # Konflux Cluster Applier
//!
//! Applies the generated `.konflux/<version>` manifests of one repository to
//! the current `kubectl` context, branch by branch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use konflux_config::cluster::ClusterApplier;
use konflux_config::command::SystemRunner;
use konflux_config::config::load_apply_config;
use konflux_config::defaults::default_apply_config;
use konflux_config::output::init_logging_from_env;

/// Apply generated Konflux manifests to a cluster
#[derive(Parser, Debug)]
#[command(name = "konflux-apply")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Repository configuration to apply
    #[arg(long, value_name = "PATH", default_value_os_t = default_apply_config())]
    config: PathBuf,
}

fn run(cli: Cli) -> Result<()> {
    let config = load_apply_config(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    let runner = SystemRunner;
    ClusterApplier::new(&runner).apply(&config)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging_from_env() {
        eprintln!("Failed to initialize logging: {}", e);
    }
    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
