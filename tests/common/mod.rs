//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and configuration snippets to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_pipeline_config();
//!     fixture.command().arg("--dry-run").arg(fixture.config_path());
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// Configuration documents describing one release of one application built
/// from `tektoncd-pipeline`.
#[allow(dead_code)]
pub mod configs {
    pub const ROOT: &str = "versions: [\"1.18\"]\n";

    pub const RELEASE: &str = r#"version: "1.18"
image-prefix: pipelines-
image-suffix: -rhel9
applications:
  - openshift-pipelines-core
"#;

    pub const APPLICATION: &str = r#"repositories:
  - tektoncd-pipeline
"#;

    pub const REPOSITORY: &str = r#"upstream: tektoncd/pipeline
components:
  - name: controller
  - name: webhook
"#;

    /// Repository document with a misspelled key.
    pub const REPOSITORY_UNKNOWN_FIELD: &str = r#"upstream: tektoncd/pipeline
compnents:
  - name: controller
"#;

    /// Single-file form read by `konflux-apply`.
    pub const APPLY: &str = r#"repository: tektoncd-pipeline
upstream: tektoncd/pipeline
branches:
  - name: main
    versions:
      - version: next
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "versions: [unclosed";
}

/// A temporary directory holding a configuration tree.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Write the root document `config/konflux.yaml`.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file("config/konflux.yaml", content)
    }

    pub fn with_release(self, name: &str, content: &str) -> Self {
        self.with_file(&format!("config/releases/{}.yaml", name), content)
    }

    pub fn with_application(self, name: &str, content: &str) -> Self {
        self.with_file(&format!("config/applications/{}.yaml", name), content)
    }

    pub fn with_repository(self, name: &str, content: &str) -> Self {
        self.with_file(&format!("config/repos/{}.yaml", name), content)
    }

    /// The complete configuration tree of [`configs`].
    pub fn with_pipeline_config(self) -> Self {
        self.with_config(configs::ROOT)
            .with_release("1.18", configs::RELEASE)
            .with_application("openshift-pipelines-core", configs::APPLICATION)
            .with_repository("tektoncd-pipeline", configs::REPOSITORY)
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the root configuration document.
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("config").join("konflux.yaml")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A `konflux` command running in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("konflux");
        cmd.current_dir(self.path());
        cmd
    }

    /// A `konflux-apply` command running in this fixture's directory.
    pub fn apply_command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("konflux-apply");
        cmd.current_dir(self.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_pipeline_config() {
        let fixture = TestFixture::new().with_pipeline_config();
        assert!(fixture.config_path().exists());
        assert!(fixture.path().join("config/repos/tektoncd-pipeline.yaml").exists());
    }

    #[test]
    fn test_configs_are_valid_yaml() {
        for config in [
            configs::ROOT,
            configs::RELEASE,
            configs::APPLICATION,
            configs::REPOSITORY,
            configs::APPLY,
        ] {
            assert!(serde_yaml::from_str::<serde_yaml::Value>(config).is_ok());
        }
    }
}
