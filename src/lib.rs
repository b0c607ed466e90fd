//! # Konflux Configuration Library
//!
//! This library generates the CI manifests (Konflux applications,
//! components and image repositories, Tekton build pipelines, GitHub
//! workflows) of a fleet of repositories from a small YAML description,
//! and proposes them to each repository as a pull request. It backs the
//! `konflux` generator and the `konflux-apply` cluster applier.
//!
//! ## Quick Example
//!
//! ```
//! use konflux_config::config::{self, Release, ReleaseMode};
//! use konflux_config::defaults::branch_for_version;
//! use std::path::Path;
//!
//! let release: Release = config::parse(
//!     "version: \"1.18\"\nrelease: auto\napplications: [core]\n",
//!     Path::new("releases/1.18.yaml"),
//! )
//! .unwrap();
//! assert_eq!(release.release, ReleaseMode::Auto);
//! assert_eq!(branch_for_version(&release.version), "release-v1.18.x");
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the YAML schemas (root document, releases,
//!   applications, repositories) and their loader.
//! - **Resolution (`resolve`)**: merges inherited settings into the
//!   `Application` and `Component` records the templates render, grouped
//!   into one `Target` per repository branch.
//! - **Templates (`template`, `render`)**: a `minijinja` environment with
//!   the manifest helpers, and the embedded manifest templates.
//! - **Repository automation (`command`, `git`, `publish`)**: checks out
//!   working copies, removes stale generated files, commits, pushes and opens
//!   pull requests through `git` and `gh`.
//! - **Orchestration (`generate`, `cluster`)**: the generator pipeline and the
//!   `kubectl` applier.
//!
//! ## Execution Flow
//!
//! 1.  **Load**: read the root configuration and every fragment it names.
//! 2.  **Resolve**: compute one target per repository branch.
//! 3.  **Synchronize**: clone or fetch, reset, switch to the automation branch.
//! 4.  **Clean**: delete files carrying the autogenerated marker.
//! 5.  **Render**: write the manifests of every application of the target.
//! 6.  **Publish**: commit, force-push, and open a pull request if none exists.

pub mod cluster;
pub mod command;
pub mod config;
pub mod defaults;
pub mod error;
pub mod generate;
pub mod git;
pub mod output;
pub mod publish;
pub mod render;
pub mod resolve;
pub mod template;
pub mod tools;
