//! # Configuration Schema and Loading
//!
//! This module defines the YAML documents describing what to generate and the
//! loader that reads them. Every schema denies unknown fields: a typo in a
//! configuration file is a hard error rather than a silently ignored key.
//!
//! ## Layout
//!
//! The generator is driven by a root document listing release names. Every
//! other document lives next to it in a fixed directory layout:
//!
//! ```text
//! config/
//! ├── konflux.yaml              # Config: versions, defaults
//! ├── releases/<version>.yaml   # Release: prefix/suffix, release mode, applications
//! ├── applications/<name>.yaml  # ApplicationConfig: repositories
//! └── repos/<name>.yaml         # RepositoryConfig: upstream, components
//! ```
//!
//! The cluster applier reads the older single-file form, `ApplyConfig`,
//! which lists one repository and its branches.
//!
//! ## Loading
//!
//! `load` parses any schema from a path. Schemas stored in the layout above
//! implement `Resource`, which names their directory, so `load_resource`
//! finds `<base>/<dir>/<name>.yaml`. `ConfigSet::load` reads a root document
//! together with every fragment it references.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Event that triggers a generated Tekton pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PullRequest,
    Push,
}

/// Whether a release is published automatically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseMode {
    Auto,
    #[default]
    Manual,
}

/// Tekton settings. When present at some level, the whole value replaces
/// the inherited one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct TektonConfig {
    /// Event generating pipelines; both pull request and push when unset.
    #[serde(default)]
    pub event_type: Option<EventType>,
    /// CEL expression limiting which changes trigger a build.
    #[serde(default)]
    pub watched_sources: Option<String>,
}

impl TektonConfig {
    /// Whether no field is set; such a value is inherited over like an
    /// absent one.
    pub fn is_unset(&self) -> bool {
        self.event_type.is_none() && self.watched_sources.is_none()
    }
}

/// GitHub workflow settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct GitHubConfig {
    /// Cron schedule of the update-sources workflow.
    #[serde(default)]
    pub update_sources: Option<String>,
}

/// A script applied on top of the upstream sources by the update-sources
/// workflow.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchConfig {
    pub name: String,
    pub script: String,
}

/// A buildable image within a repository.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ComponentConfig {
    pub name: String,
    #[serde(default)]
    pub dockerfile: Option<String>,
    #[serde(default)]
    pub prefetch_input: Option<String>,
    /// Overrides the release image suffix; `"None"` removes it.
    #[serde(default)]
    pub image_suffix: Option<String>,
    #[serde(default)]
    pub tekton: Option<TektonConfig>,
}

/// Root document of the generator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// Release names, each defined in `releases/<name>.yaml`.
    pub versions: Vec<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub tekton: Option<TektonConfig>,
    #[serde(default)]
    pub github: Option<GitHubConfig>,
}

/// One product version (`releases/<name>.yaml`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Release {
    pub version: String,
    #[serde(default)]
    pub release: ReleaseMode,
    #[serde(default)]
    pub image_prefix: String,
    #[serde(default)]
    pub image_suffix: String,
    /// Overrides the branch derived from the version.
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub upstream_branch: Option<String>,
    /// Application names, each defined in `applications/<name>.yaml`.
    pub applications: Vec<String>,
}

/// An application (`applications/<name>.yaml`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ApplicationConfig {
    /// Repository names, each defined in `repos/<name>.yaml`.
    pub repositories: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub tekton: Option<TektonConfig>,
}

/// A source repository (`repos/<name>.yaml`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct RepositoryConfig {
    /// Upstream project mirrored by the repository, as `owner/project`.
    #[serde(default)]
    pub upstream: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Keep the upstream project name out of image prefixes.
    #[serde(default)]
    pub no_prefix_upstream: bool,
    #[serde(default)]
    pub tekton: Option<TektonConfig>,
    #[serde(default)]
    pub github: Option<GitHubConfig>,
    #[serde(default)]
    pub patches: Vec<PatchConfig>,
}

/// A version built from a branch of the single-file form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Version {
    pub version: String,
    #[serde(default)]
    pub release: ReleaseMode,
}

/// A branch of the single-file form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Branch {
    pub name: String,
    #[serde(default)]
    pub upstream_branch: Option<String>,
    #[serde(default)]
    pub versions: Vec<Version>,
}

impl Branch {
    /// Versions generated from this branch; the branch name when none are
    /// listed.
    pub fn version_names(&self) -> Vec<String> {
        if self.versions.is_empty() {
            vec![self.name.clone()]
        } else {
            self.versions.iter().map(|v| v.version.clone()).collect()
        }
    }
}

/// Single-file repository configuration read by `konflux-apply`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ApplyConfig {
    pub repository: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub upstream: Option<String>,
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub github: Option<GitHubConfig>,
    #[serde(default)]
    pub tekton: Option<TektonConfig>,
    #[serde(default)]
    pub patches: Vec<PatchConfig>,
}

impl ApplyConfig {
    /// Clone URL of the configured repository.
    pub fn repository_url(&self) -> String {
        let org = self
            .organization
            .as_deref()
            .unwrap_or(crate::defaults::GITHUB_ORG);
        format!("https://github.com/{}/{}", org, self.repository)
    }
}

/// A schema stored under a fixed directory of the configuration tree.
pub trait Resource: DeserializeOwned {
    /// Directory, relative to the root document, holding this resource.
    const DIR: &'static str;
}

impl Resource for Release {
    const DIR: &'static str = "releases";
}

impl Resource for ApplicationConfig {
    const DIR: &'static str = "applications";
}

impl Resource for RepositoryConfig {
    const DIR: &'static str = "repos";
}

/// Parse a YAML document into `T`.
///
/// `path` only labels errors.
pub fn parse<T: DeserializeOwned>(yaml_content: &str, path: &Path) -> Result<T> {
    serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read and parse a YAML document into `T`.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Loading {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content, path)
}

/// Path of the resource `name` of kind `T` under `base`.
pub fn resource_path<T: Resource>(base: &Path, name: &str) -> PathBuf {
    base.join(T::DIR).join(format!("{}.yaml", name))
}

/// Load the resource `name` of kind `T` under `base`.
pub fn load_resource<T: Resource>(base: &Path, name: &str) -> Result<T> {
    load(&resource_path::<T>(base, name))
}

/// A root document with every fragment it references.
#[derive(Debug, Clone, Default)]
pub struct ConfigSet {
    pub config: Config,
    /// Releases in the order listed by `config.versions`.
    pub releases: Vec<Release>,
    pub applications: BTreeMap<String, ApplicationConfig>,
    pub repositories: BTreeMap<String, RepositoryConfig>,
}

impl ConfigSet {
    /// Load the root document at `path` and the fragments it references,
    /// relative to the root document's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Config = load(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        let mut set = ConfigSet {
            config,
            ..Default::default()
        };
        for name in &set.config.versions {
            let release: Release = load_resource(base, name)?;
            for application in &release.applications {
                if set.applications.contains_key(application) {
                    continue;
                }
                let app: ApplicationConfig = load_resource(base, application)?;
                for repository in &app.repositories {
                    if !set.repositories.contains_key(repository) {
                        let repo: RepositoryConfig = load_resource(base, repository)?;
                        set.repositories.insert(repository.clone(), repo);
                    }
                }
                set.applications.insert(application.clone(), app);
            }
            set.releases.push(release);
        }
        Ok(set)
    }
}

/// Load the single-file form read by `konflux-apply`.
pub fn load_apply_config(path: &Path) -> Result<ApplyConfig> {
    load(path)
}
