//! Default values for konflux-config.
//!
//! This module centralizes the constants and fallbacks applied while
//! resolving configuration and publishing changes, so the merger, the
//! synchronizer and the templates agree on them.

use std::path::PathBuf;

/// GitHub organization hosting the target repositories when the configuration
/// does not name one.
pub const GITHUB_ORG: &str = "openshift-pipelines";

/// Marker carried by every generated file. Files containing it are deleted
/// before each regeneration.
pub const AUTOGENERATED_MARKER: &str = "# Generated by openshift-pipelines/hack. DO NOT EDIT.";

/// Directories (relative to a checkout) holding generated files.
pub const GENERATED_DIRS: [&str; 3] = [".tekton", ".konflux", ".github"];

/// Prefix of the branch used to propose generated changes.
pub const AUTOMATION_BRANCH_PREFIX: &str = "actions/update/konflux-configuration-";

/// Identity used for bot commits.
pub const BOT_NAME: &str = "openshift-pipelines-bot";
pub const BOT_EMAIL: &str = "pipelines-extcomm@redhat.com";

/// Body of pull requests opened by the publisher.
pub const PULL_REQUEST_BODY: &str =
    "This PR was automatically generated by the konflux command from openshift-pipelines/hack repository";

/// Upstream branch tracked when a release does not name one.
pub const UPSTREAM_BRANCH: &str = "main";

/// Build platforms used when no configuration level lists any.
pub const PLATFORMS: [&str; 2] = ["linux/x86_64", "linux-m2xlarge/arm64"];

/// Tekton `on-cel-expression` filter applied when no Tekton settings are
/// configured at any level.
pub const WATCHED_SOURCES: &str = r#""upstream/***".pathChanged() || ".konflux/patches/***".pathChanged() || ".konflux/rpms/***".pathChanged()"#;

/// Template evaluated against a component to find its Dockerfile.
pub const DOCKERFILE_TEMPLATE: &str = ".konflux/dockerfiles/{{ Name }}.Dockerfile";

/// Prefetch descriptor for components that do not define one.
pub const PREFETCH_INPUT: &str = r#"{"type": "rpm", "path": ".konflux/rpms"}"#;

/// Component image suffix value that suppresses the inherited suffix.
pub const NO_IMAGE_SUFFIX: &str = "None";

/// Schedule of the generated update-sources workflow.
pub const UPDATE_SOURCES_SCHEDULE: &str = "0 1 * * *";

/// Returns the branch a version is developed on.
///
/// `main` and `next` live on `main`; every other version has its own
/// `release-v<version>.x` branch.
///
/// # Examples
///
/// ```
/// use konflux_config::defaults::branch_for_version;
///
/// assert_eq!(branch_for_version("next"), "main");
/// assert_eq!(branch_for_version("1.18"), "release-v1.18.x");
/// ```
pub fn branch_for_version(version: &str) -> String {
    match version {
        "main" | "next" => "main".to_string(),
        _ => format!("release-v{}.x", version),
    }
}

/// Returns the automation branch proposing changes against `branch`.
pub fn automation_branch(branch: &str) -> String {
    format!("{}{}", AUTOMATION_BRANCH_PREFIX, branch)
}

/// Returns the commit message (and pull request title) for `branch`.
pub fn commit_message(branch: &str) -> String {
    format!("[bot:{}] update konflux configuration", branch)
}

/// Returns the configuration file read by `konflux-apply` by default.
pub fn default_apply_config() -> PathBuf {
    PathBuf::from("config").join("konflux").join("repository.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_for_main_and_next() {
        assert_eq!(branch_for_version("main"), "main");
        assert_eq!(branch_for_version("next"), "main");
    }

    #[test]
    fn test_branch_for_release_version() {
        assert_eq!(branch_for_version("1.18"), "release-v1.18.x");
        assert_eq!(branch_for_version("1.5"), "release-v1.5.x");
    }

    #[test]
    fn test_automation_branch() {
        assert_eq!(
            automation_branch("release-v1.18.x"),
            "actions/update/konflux-configuration-release-v1.18.x"
        );
    }

    #[test]
    fn test_commit_message() {
        assert_eq!(
            commit_message("main"),
            "[bot:main] update konflux configuration"
        );
    }

    #[test]
    fn test_default_apply_config() {
        assert!(default_apply_config().ends_with("config/konflux/repository.yaml"));
    }
}
