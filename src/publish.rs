//! # Publishing Generated Changes
//!
//! Commits the regenerated working copy to the automation branch and makes
//! sure a pull request proposes it against the target branch.
//!
//! Publishing is idempotent. A clean working tree publishes nothing, and an
//! already-open pull request for the automation branch is updated by the
//! force-push rather than duplicated.

use std::path::Path;

use log::info;

use crate::command::CommandRunner;
use crate::defaults::{self, automation_branch, commit_message};
use crate::error::Result;

/// What [`publish`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The working tree was clean; nothing was committed.
    NoChanges,
    /// Changes were pushed to the automation branch.
    Published {
        /// Whether a new pull request was opened.
        pr_created: bool,
    },
}

/// Commit and push the changes in `dir`, then open a pull request against
/// `branch` unless one already exists.
pub fn publish(runner: &dyn CommandRunner, dir: &Path, branch: &str) -> Result<PublishOutcome> {
    let status = runner.run("status", dir, "git", &["status", "--porcelain"])?;
    if status.trim().is_empty() {
        info!("No changes for {}, nothing to publish", branch);
        return Ok(PublishOutcome::NoChanges);
    }

    let head = automation_branch(branch);
    let message = commit_message(branch);

    runner.run(
        "configure user name",
        dir,
        "git",
        &["config", "user.name", defaults::BOT_NAME],
    )?;
    runner.run(
        "configure user email",
        dir,
        "git",
        &["config", "user.email", defaults::BOT_EMAIL],
    )?;
    runner.run("add", dir, "git", &["add", "."])?;
    runner.run("commit", dir, "git", &["commit", "-m", &message])?;

    info!("Pushing {}", head);
    runner.run("push", dir, "git", &["push", "-f", "origin", &head])?;

    if pull_request_exists(runner, dir, branch, &head)? {
        info!("A pull request from {} already exists", head);
        return Ok(PublishOutcome::Published { pr_created: false });
    }

    info!("Creating pull request {} -> {}", head, branch);
    runner.run(
        "create pull request",
        dir,
        "gh",
        &[
            "pr",
            "create",
            "--draft",
            "--base",
            branch,
            "--head",
            &head,
            "--label=hack",
            "--label=automated",
            "--title",
            &message,
            "--body",
            defaults::PULL_REQUEST_BODY,
        ],
    )?;
    Ok(PublishOutcome::Published { pr_created: true })
}

/// Whether a pull request from `head` into `base` is already open.
fn pull_request_exists(
    runner: &dyn CommandRunner,
    dir: &Path,
    base: &str,
    head: &str,
) -> Result<bool> {
    let count = runner.run(
        "list pull requests",
        dir,
        "gh",
        &[
            "pr", "list", "--base", base, "--head", head, "--json", "url", "--jq", "length",
        ],
    )?;
    Ok(count.trim() != "0")
}
