//! # Applying Generated Manifests to a Cluster
//!
//! `konflux-apply` reads the single-file repository configuration and, for
//! each branch, clones the repository into a fresh temporary directory and
//! applies the `.konflux/<version>` directory of every version built from
//! that branch with `kubectl apply -R -f`.
//!
//! A configuration listing no branches applies nothing. The output of `git`
//! and `kubectl` goes straight to the terminal. The temporary clone is
//! removed when the branch is done, whether applying succeeded or not. The
//! first failure stops the run.

use std::path::Path;

use log::info;

use crate::command::CommandRunner;
use crate::config::{ApplyConfig, Branch};
use crate::error::{Error, Result};

/// Applies generated manifests through `kubectl`.
pub struct ClusterApplier<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> ClusterApplier<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Apply every branch of `config`, in order.
    pub fn apply(&self, config: &ApplyConfig) -> Result<()> {
        if config.branches.is_empty() {
            info!("No branches configured for {}, nothing to apply", config.repository);
            return Ok(());
        }
        let url = config.repository_url();
        for branch in &config.branches {
            self.apply_branch(&url, branch)?;
        }
        Ok(())
    }

    /// Clone `branch` of `url` into a temporary directory and apply each of
    /// its versions.
    pub fn apply_branch(&self, url: &str, branch: &Branch) -> Result<()> {
        let checkout = tempfile::Builder::new()
            .prefix("konflux-apply")
            .tempdir()
            .map_err(|e| Error::Filesystem {
                message: format!("Failed to create temporary directory: {}", e),
            })?;
        let dir = checkout.path();

        info!("Cloning {} ({}) in {}", url, branch.name, dir.display());
        self.runner.stream(
            "clone",
            dir,
            "git",
            &["clone", "-b", &branch.name, url, "."],
        )?;

        for version in branch.version_names() {
            self.apply_version(dir, &version)?;
        }
        Ok(())
    }

    fn apply_version(&self, dir: &Path, version: &str) -> Result<()> {
        info!("Apply {} on the cluster", version);
        let manifests = Path::new(".konflux").join(version);
        let manifests = manifests.to_string_lossy();
        self.runner.stream(
            &format!("apply {}", version),
            dir,
            "kubectl",
            &["apply", "-R", "-f", &manifests],
        )
    }
}
