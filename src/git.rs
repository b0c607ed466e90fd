//! # Repository Synchronization
//!
//! Brings a working copy of a target repository to a known state before
//! manifests are regenerated into it:
//!
//! 1. clone the repository, or fetch every remote when a clone is already
//!    present (a `--dir` reused across runs);
//! 2. discard local changes;
//! 3. reset the branch to its remote head;
//! 4. switch to the automation branch, recreated from that head.
//!
//! [`cleanup_autogenerated`] then deletes every previously generated file so
//! that components removed from the configuration do not leave orphaned
//! manifests behind.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::command::CommandRunner;
use crate::defaults::{automation_branch, AUTOGENERATED_MARKER, GENERATED_DIRS};
use crate::error::{Error, Result};

/// Check out `branch` of `url` in `dir` and switch to its automation branch.
pub fn checkout(runner: &dyn CommandRunner, url: &str, branch: &str, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::Filesystem {
        message: format!("Failed to create directory '{}': {}", dir.display(), e),
    })?;

    if dir.join(".git").exists() {
        info!("Fetching {} in {}", url, dir.display());
        runner.run("fetch", dir, "git", &["fetch", "--all"])?;
    } else {
        info!("Cloning {} into {}", url, dir.display());
        runner.run("clone", dir, "git", &["clone", url, "."])?;
    }

    runner.run("reset", dir, "git", &["reset", "--hard", "HEAD", "--"])?;

    let remote_branch = format!("origin/{}", branch);
    runner.run(
        &format!("checkout {}", branch),
        dir,
        "git",
        &["checkout", &remote_branch, "-B", branch],
    )?;

    let automation = automation_branch(branch);
    runner.run(
        "checkout automation branch",
        dir,
        "git",
        &["checkout", "-B", &automation],
    )?;
    Ok(())
}

/// Delete every file under the generated directories of `dir` that carries
/// the autogenerated marker. Returns the removed paths, sorted.
///
/// Files without the marker (hand-written pipelines, Dockerfiles, RPM lock
/// files) are kept.
pub fn cleanup_autogenerated(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for generated in GENERATED_DIRS {
        let root = dir.join(generated);
        if !root.is_dir() {
            continue;
        }
        for entry in WalkDir::new(&root) {
            let entry = entry.map_err(|e| Error::Filesystem {
                message: format!("Failed to walk '{}': {}", root.display(), e),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let content = fs::read(path).map_err(|e| Error::Filesystem {
                message: format!("Failed to read file '{}': {}", path.display(), e),
            })?;
            if !contains_marker(&content) {
                continue;
            }
            debug!("Removing autogenerated file {}", path.display());
            fs::remove_file(path).map_err(|e| Error::Filesystem {
                message: format!("Failed to remove file '{}': {}", path.display(), e),
            })?;
            removed.push(path.to_path_buf());
        }
    }

    removed.sort();
    Ok(removed)
}

fn contains_marker(content: &[u8]) -> bool {
    let marker = AUTOGENERATED_MARKER.as_bytes();
    content.windows(marker.len()).any(|window| window == marker)
}
