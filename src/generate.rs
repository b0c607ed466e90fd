//! # Generation Pipeline
//!
//! Drives a generation run from configuration files to published pull
//! requests. For each configuration file:
//!
//! 1. **Load and resolve**: read the root document and its fragments and
//!    merge them into [`Target`]s. Any error here is fatal, since a broken
//!    configuration must not produce partial output.
//! 2. **Per target**, inside a folded log group:
//!    - check out the branch and switch to the automation branch;
//!    - remove previously generated files;
//!    - render the update-sources workflow (repositories with an upstream
//!      only), then the Konflux and Tekton manifests of every application;
//!    - publish, unless this is a dry run.
//!
//! A failing target is logged and recorded in the [`GenerationReport`]; the
//! remaining targets still run.
//!
//! ## Generated Layout
//!
//! ```text
//! .github/workflows/update-sources.<branch>.yaml
//! .konflux/<version>/application.yaml
//! .konflux/<version>/tests.yaml
//! .konflux/<version>/release-plan.yaml           # release mode `auto` only
//! .konflux/<version>/component-<component>.yaml
//! .konflux/<version>/image-<component>.yaml
//! .tekton/<repo>-<version>-<component>-pull-request.yaml
//! .tekton/<repo>-<version>-<component>-push.yaml
//! ```
//!
//! `<repo>` and `<version>` in Tekton file names are hyphenized.

use std::path::{Path, PathBuf};

use log::{error, info};
use serde::Serialize;

use crate::command::CommandRunner;
use crate::config::ConfigSet;
use crate::error::Result;
use crate::git;
use crate::output;
use crate::publish::{self, PublishOutcome};
use crate::render::{self, render_to_file};
use crate::resolve::{self, Application, Component, Target};
use crate::template::funcs::{basename, hyphenize};

/// Outcome of a generation run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GenerationReport {
    /// Targets (as `org/repo@branch`) processed successfully.
    pub succeeded: Vec<String>,
    /// Targets that failed, with the error message.
    pub failed: Vec<(String, String)>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Append the results of `other`.
    pub fn merge(&mut self, other: GenerationReport) {
        self.succeeded.extend(other.succeeded);
        self.failed.extend(other.failed);
    }
}

/// Runs generation for resolved targets.
pub struct Generator<'a> {
    runner: &'a dyn CommandRunner,
    work_dir: PathBuf,
    dry_run: bool,
}

impl<'a> Generator<'a> {
    /// Working copies are created under `work_dir`. With `dry_run`, nothing
    /// is committed or pushed.
    pub fn new(runner: &'a dyn CommandRunner, work_dir: &Path, dry_run: bool) -> Self {
        Self {
            runner,
            work_dir: work_dir.to_path_buf(),
            dry_run,
        }
    }

    /// Load the configuration at `path` and generate each of its targets.
    ///
    /// Fails only when the configuration cannot be loaded or resolved;
    /// per-target failures are reported in the returned report.
    pub fn generate_config(&self, path: &Path) -> Result<GenerationReport> {
        info!("Loading configuration {}", path.display());
        let set = ConfigSet::load(path)?;
        let targets = resolve::resolve(&set)?;
        info!("{} resolved {} target(s)", path.display(), targets.len());
        Ok(self.generate_targets(&targets))
    }

    /// Generate every target, continuing past failures.
    pub fn generate_targets(&self, targets: &[Target]) -> GenerationReport {
        let mut report = GenerationReport::default();
        for target in targets {
            let label = format!("{}@{}", target.repository, target.branch);
            output::group(&format!(
                "generating konflux configuration for {} ({})",
                target.repository, target.branch
            ));
            match self.generate_target(target) {
                Ok(_) => report.succeeded.push(label),
                Err(e) => {
                    error!("Failed to generate {}: {}", label, e);
                    report.failed.push((label, e.to_string()));
                }
            }
            output::end_group();
        }
        report
    }

    /// Check out, regenerate and (unless dry run) publish one target.
    ///
    /// Returns `None` on a dry run.
    pub fn generate_target(&self, target: &Target) -> Result<Option<PublishOutcome>> {
        let dir = self.work_dir.join(target.checkout_name());
        info!(
            "Generating {} ({}) on {} in {}",
            target.repository,
            target.url,
            target.branch,
            dir.display()
        );

        git::checkout(self.runner, &target.url, &target.branch, &dir)?;
        let removed = git::cleanup_autogenerated(&dir)?;
        info!("Removed {} previously generated file(s)", removed.len());

        let written = render_target(target, &dir)?;
        info!("Generated {} file(s)", written.len());

        if self.dry_run {
            info!("Dry run, not publishing {}", target.branch);
            return Ok(None);
        }
        publish::publish(self.runner, &dir, &target.branch).map(Some)
    }
}

/// Render every file of `target` into the working copy `dir`. Returns the
/// written paths in generation order.
pub fn render_target(target: &Target, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if target.upstream.is_some() {
        if let Some(application) = target.applications.first() {
            let path = dir
                .join(".github")
                .join("workflows")
                .join(format!("update-sources.{}.yaml", target.branch));
            info!("Generate github manifests in {}", path.display());
            render_to_file(render::UPDATE_SOURCES, application, &path)?;
            written.push(path);
        }
    }

    for application in &target.applications {
        written.extend(render_konflux(application, &dir.join(".konflux"))?);
        written.extend(render_tekton(application, &dir.join(".tekton"))?);
    }
    Ok(written)
}

fn render_konflux(application: &Application, konflux_dir: &Path) -> Result<Vec<PathBuf>> {
    let target = konflux_dir.join(&application.version);
    info!("Generate konflux manifests in {}", target.display());

    let mut written = Vec::new();
    emit(render::APPLICATION, application, target.join("application.yaml"), &mut written)?;
    emit(render::TESTS, application, target.join("tests.yaml"), &mut written)?;
    if application.release_plan {
        emit(render::RELEASE_PLAN, application, target.join("release-plan.yaml"), &mut written)?;
    }
    for component in &application.components {
        let component_file = target.join(format!("component-{}.yaml", component.name));
        emit(render::COMPONENT, component, component_file, &mut written)?;
        let image_file = target.join(format!("image-{}.yaml", component.name));
        emit(render::IMAGE, component, image_file, &mut written)?;
    }
    Ok(written)
}

fn render_tekton(application: &Application, tekton_dir: &Path) -> Result<Vec<PathBuf>> {
    info!("Generate tekton manifests in {}", tekton_dir.display());
    let mut written = Vec::new();
    for component in &application.components {
        if component.tekton.on_pull_request() {
            let path = tekton_dir.join(pipeline_file_name(component, "pull-request"));
            emit(render::PULL_REQUEST_PIPELINE, component, path, &mut written)?;
        }
        if component.tekton.on_push() {
            let path = tekton_dir.join(pipeline_file_name(component, "push"));
            emit(render::PUSH_PIPELINE, component, path, &mut written)?;
        }
    }
    Ok(written)
}

fn emit<T: Serialize>(template: &str, data: &T, path: PathBuf, written: &mut Vec<PathBuf>) -> Result<()> {
    render_to_file(template, data, &path)?;
    written.push(path);
    Ok(())
}

/// File name of a component's Tekton pipeline for `event`
/// (`pull-request` or `push`).
pub fn pipeline_file_name(component: &Component, event: &str) -> String {
    format!(
        "{}-{}-{}-{}.yaml",
        hyphenize(&basename(&component.repository)),
        hyphenize(&component.version),
        component.name,
        event
    )
}
