//! Generate command implementation
//!
//! Runs the generation pipeline over each configuration file:
//! 1. Preflight: `gh` and `jq` must be on `PATH` unless this is a dry run
//! 2. Load and resolve the configuration (fatal on error)
//! 3. Check out, clean, render and publish each target

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use log::info;

use konflux_config::command::SystemRunner;
use konflux_config::generate::{GenerationReport, Generator};
use konflux_config::tools::{self, PUBLISH_TOOLS};

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Dry run (no commit, push or pull request)
    #[arg(long)]
    pub dry_run: bool,

    /// Folder to work in. A temporary one is created (and removed) when unset
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Root configuration files to generate from
    #[arg(value_name = "CONFIG", required = true)]
    pub configs: Vec<PathBuf>,
}

/// Execute the generate command
pub fn execute(args: GenerateArgs) -> Result<()> {
    if !args.dry_run {
        tools::require_tools(&PUBLISH_TOOLS)?;
    }

    let temp_dir;
    let work_dir = match &args.dir {
        Some(dir) => dir.clone(),
        None => {
            temp_dir = tempfile::Builder::new()
                .prefix("update-konflux-repo")
                .tempdir()
                .context("Failed to create working directory")?;
            temp_dir.path().to_path_buf()
        }
    };
    info!("Working in {}", work_dir.display());

    let runner = SystemRunner;
    let generator = Generator::new(&runner, &work_dir, args.dry_run);

    let mut report = GenerationReport::default();
    for config in &args.configs {
        let config_report = generator
            .generate_config(config)
            .with_context(|| format!("Failed to generate from {}", config.display()))?;
        report.merge(config_report);
    }

    if !report.is_success() {
        let failed: Vec<&str> = report.failed.iter().map(|(target, _)| target.as_str()).collect();
        bail!(
            "{} of {} target(s) failed: {}",
            failed.len(),
            failed.len() + report.succeeded.len(),
            failed.join(", ")
        );
    }

    info!("Generated {} target(s)", report.succeeded.len());
    Ok(())
}
