//! # Configuration Merging
//!
//! Turns a loaded [`ConfigSet`] into the records the templates render. Each
//! (release, application, repository) triple becomes one [`Application`],
//! and each component of the repository becomes one [`Component`] carrying
//! every inherited setting. Applications are then grouped into [`Target`]s,
//! one per repository branch, since that is the unit that gets checked out,
//! regenerated and published.
//!
//! ## Inheritance
//!
//! Settings are looked up from the most specific level to the least:
//!
//! | Setting     | Lookup order                                       |
//! |-------------|----------------------------------------------------|
//! | `tekton`    | component, repository, application, root, default  |
//! | `platforms` | repository, application, root, default             |
//! | `github`    | repository, root, default                          |
//!
//! A Tekton value found at some level is taken whole; its fields are not
//! merged with less specific levels, and a field it leaves unset stays
//! empty. An empty `tekton: {}` counts as absent. Only when no level sets
//! anything do the defaults apply ([`defaults::WATCHED_SOURCES`] for both
//! pipelines).
//!
//! An empty `dockerfile` or `prefetch-input` counts as unset.
//!
//! Resolution is pure: no files are read and no commands are run.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{
    ComponentConfig, ConfigSet, EventType, GitHubConfig, Release, ReleaseMode, RepositoryConfig,
    TektonConfig,
};
use crate::defaults;
use crate::error::{Error, Result};
use crate::template::{self, funcs::basename};

/// Resolved Tekton settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tekton {
    /// `None` generates both the pull request and the push pipeline.
    pub event_type: Option<EventType>,
    pub watched_sources: String,
}

impl Tekton {
    fn from_config(config: Option<&TektonConfig>) -> Self {
        match config {
            Some(config) => Tekton {
                event_type: config.event_type,
                watched_sources: config.watched_sources.clone().unwrap_or_default(),
            },
            None => Tekton {
                event_type: None,
                watched_sources: defaults::WATCHED_SOURCES.to_string(),
            },
        }
    }

    /// Whether the pull request pipeline is generated.
    pub fn on_pull_request(&self) -> bool {
        self.event_type != Some(EventType::Push)
    }

    /// Whether the push pipeline is generated.
    pub fn on_push(&self) -> bool {
        self.event_type != Some(EventType::PullRequest)
    }
}

/// Resolved GitHub workflow settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GitHubSettings {
    pub update_sources: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Patch {
    pub name: String,
    pub script: String,
}

/// A component with every inherited setting filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Component {
    pub name: String,
    /// Name of the owning application.
    pub application: String,
    /// `org/repo` path of the repository building this component.
    pub repository: String,
    pub upstream: Option<String>,
    pub branch: String,
    pub version: String,
    pub platforms: Vec<String>,
    pub dockerfile: String,
    pub prefetch_input: String,
    pub image_prefix: String,
    pub image_suffix: String,
    pub tekton: Tekton,
}

/// One release of one application, as built from one repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Application {
    pub name: String,
    /// `org/repo` path of the repository.
    pub repository: String,
    pub upstream: Option<String>,
    pub branch: String,
    pub upstream_branch: String,
    pub version: String,
    pub platforms: Vec<String>,
    pub components: Vec<Component>,
    #[serde(rename = "GitHub")]
    pub github: GitHubSettings,
    pub tekton: Tekton,
    pub patches: Vec<Patch>,
    /// Whether a release plan is generated (release mode `auto`).
    pub release_plan: bool,
}

/// A repository branch and every application generated into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Repository name, as used under `repos/`.
    pub name: String,
    /// `org/repo` path of the repository.
    pub repository: String,
    /// Clone URL.
    pub url: String,
    pub branch: String,
    pub upstream: Option<String>,
    pub applications: Vec<Application>,
}

impl Target {
    /// Directory name of this target's working copy.
    pub fn checkout_name(&self) -> String {
        format!("{}-{}", self.name, self.branch)
    }
}

/// Resolve every target described by `set`.
///
/// Targets come out in the order their first application appears in the
/// configuration: releases in `versions` order, then applications, then
/// repositories.
pub fn resolve(set: &ConfigSet) -> Result<Vec<Target>> {
    let org = set
        .config
        .organization
        .as_deref()
        .unwrap_or(defaults::GITHUB_ORG);

    let mut targets: Vec<Target> = Vec::new();
    let mut index: BTreeMap<(String, String), usize> = BTreeMap::new();

    for release in &set.releases {
        let branch = release
            .branch
            .clone()
            .unwrap_or_else(|| defaults::branch_for_version(&release.version));

        for app_name in &release.applications {
            let app = set.applications.get(app_name).ok_or_else(|| Error::ConfigValidation {
                message: format!(
                    "release '{}' references unknown application '{}'",
                    release.version, app_name
                ),
            })?;

            for repo_name in &app.repositories {
                let repo = set.repositories.get(repo_name).ok_or_else(|| Error::ConfigValidation {
                    message: format!(
                        "application '{}' references unknown repository '{}'",
                        app_name, repo_name
                    ),
                })?;

                let tekton_chain = [repo.tekton.as_ref(), app.tekton.as_ref(), set.config.tekton.as_ref()];
                let platforms = [&repo.platforms, &app.platforms, &set.config.platforms]
                    .into_iter()
                    .find(|p| !p.is_empty())
                    .cloned()
                    .unwrap_or_else(|| defaults::PLATFORMS.iter().map(|p| p.to_string()).collect());

                let mut application = Application {
                    name: app_name.clone(),
                    repository: format!("{}/{}", org, repo_name),
                    upstream: repo.upstream.clone(),
                    branch: branch.clone(),
                    upstream_branch: release
                        .upstream_branch
                        .clone()
                        .unwrap_or_else(|| defaults::UPSTREAM_BRANCH.to_string()),
                    version: release.version.clone(),
                    platforms,
                    components: Vec::new(),
                    github: github_settings(&[repo.github.as_ref(), set.config.github.as_ref()]),
                    tekton: Tekton::from_config(first_present(&tekton_chain)),
                    patches: repo
                        .patches
                        .iter()
                        .map(|p| Patch {
                            name: p.name.clone(),
                            script: p.script.trim_end().to_string(),
                        })
                        .collect(),
                    release_plan: release.release == ReleaseMode::Auto,
                };

                application.components = repo
                    .components
                    .iter()
                    .map(|c| resolve_component(c, &application, release, repo, &tekton_chain))
                    .collect::<Result<_>>()?;

                let key = (repo_name.clone(), branch.clone());
                let position = *index.entry(key).or_insert_with(|| {
                    targets.push(Target {
                        name: repo_name.clone(),
                        repository: application.repository.clone(),
                        url: format!("https://github.com/{}.git", application.repository),
                        branch: branch.clone(),
                        upstream: repo.upstream.clone(),
                        applications: Vec::new(),
                    });
                    targets.len() - 1
                });

                let target = &mut targets[position];
                if let Some(existing) = target
                    .applications
                    .iter()
                    .find(|a| a.version == application.version)
                {
                    return Err(Error::ConfigValidation {
                        message: format!(
                            "applications '{}' and '{}' both generate version '{}' in {} on branch {}",
                            existing.name,
                            application.name,
                            application.version,
                            target.repository,
                            target.branch
                        ),
                    });
                }
                target.applications.push(application);
            }
        }
    }

    Ok(targets)
}

fn first_present<'a>(chain: &[Option<&'a TektonConfig>]) -> Option<&'a TektonConfig> {
    chain.iter().flatten().find(|t| !t.is_unset()).copied()
}

fn github_settings(chain: &[Option<&GitHubConfig>]) -> GitHubSettings {
    let update_sources = chain
        .iter()
        .flatten()
        .find_map(|g| g.update_sources.clone())
        .unwrap_or_else(|| defaults::UPDATE_SOURCES_SCHEDULE.to_string());
    GitHubSettings { update_sources }
}

fn resolve_component(
    config: &ComponentConfig,
    application: &Application,
    release: &Release,
    repo: &RepositoryConfig,
    tekton_chain: &[Option<&TektonConfig>; 3],
) -> Result<Component> {
    let tekton = match config.tekton.as_ref().filter(|t| !t.is_unset()) {
        Some(tekton) => Tekton::from_config(Some(tekton)),
        None => Tekton::from_config(first_present(tekton_chain)),
    };

    let image_suffix = match config.image_suffix.as_deref() {
        None => release.image_suffix.clone(),
        Some(defaults::NO_IMAGE_SUFFIX) => String::new(),
        Some(suffix) => suffix.to_string(),
    };

    let image_prefix = match (&repo.upstream, repo.no_prefix_upstream) {
        (Some(upstream), false) => format!("{}{}-", release.image_prefix, basename(upstream)),
        _ => release.image_prefix.clone(),
    };

    let mut component = Component {
        name: config.name.clone(),
        application: application.name.clone(),
        repository: application.repository.clone(),
        upstream: application.upstream.clone(),
        branch: application.branch.clone(),
        version: application.version.clone(),
        platforms: application.platforms.clone(),
        dockerfile: config.dockerfile.clone().unwrap_or_default(),
        prefetch_input: config
            .prefetch_input
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| defaults::PREFETCH_INPUT.to_string()),
        image_prefix,
        image_suffix,
        tekton,
    };
    if component.dockerfile.is_empty() {
        component.dockerfile = template::eval(defaults::DOCKERFILE_TEMPLATE, &component)?;
    }
    Ok(component)
}
