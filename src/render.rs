//! # Manifest Rendering
//!
//! The manifest templates are compiled into the binary and loaded into a
//! [`template::environment`] under their file names. This module renders
//! them against a resolved record and writes the result to disk.
//!
//! Files are written atomically: the content goes to a temporary file in the
//! destination directory which is then renamed over the destination, so an
//! interrupted run never leaves a truncated manifest behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::debug;
use minijinja::Environment;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::template;

pub const APPLICATION: &str = "application.yaml";
pub const TESTS: &str = "tests.yaml";
pub const RELEASE_PLAN: &str = "release-plan.yaml";
pub const COMPONENT: &str = "component.yaml";
pub const IMAGE: &str = "image.yaml";
pub const PULL_REQUEST_PIPELINE: &str = "component-pull-request.yaml";
pub const PUSH_PIPELINE: &str = "component-push.yaml";
pub const UPDATE_SOURCES: &str = "update-sources.yaml";

const TEMPLATES: &[(&str, &str)] = &[
    (APPLICATION, include_str!("../templates/konflux/application.yaml")),
    (TESTS, include_str!("../templates/konflux/tests.yaml")),
    (RELEASE_PLAN, include_str!("../templates/konflux/release-plan.yaml")),
    (COMPONENT, include_str!("../templates/konflux/component.yaml")),
    (IMAGE, include_str!("../templates/konflux/image.yaml")),
    (
        PULL_REQUEST_PIPELINE,
        include_str!("../templates/tekton/component-pull-request.yaml"),
    ),
    (PUSH_PIPELINE, include_str!("../templates/tekton/component-push.yaml")),
    (
        UPDATE_SOURCES,
        include_str!("../templates/github/workflows/update-sources.yaml"),
    ),
];

/// A template environment holding every embedded manifest template.
pub fn environment() -> Result<Environment<'static>> {
    let mut env = template::environment();
    for &(name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}

/// Render the embedded template `name` against `data`.
pub fn render<T: Serialize>(name: &str, data: &T) -> Result<String> {
    let env = environment()?;
    let rendered = env.get_template(name)?.render(data)?;
    Ok(rendered)
}

/// Render the embedded template `name` against `data` into `path`, creating
/// parent directories as needed.
pub fn render_to_file<T: Serialize>(name: &str, data: &T, path: &Path) -> Result<()> {
    let content = render(name, data)?;
    debug!("Writing {} from {}", path.display(), name);
    write_atomic(path, &content)
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
        message: format!("Failed to create directory '{}': {}", parent.display(), e),
    })?;

    let mut file = NamedTempFile::new_in(parent).map_err(|e| Error::Filesystem {
        message: format!(
            "Failed to create temporary file in '{}': {}",
            parent.display(),
            e
        ),
    })?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::Filesystem {
            message: format!("Failed to write file '{}': {}", path.display(), e),
        })?;
    file.persist(path).map_err(|e| Error::Filesystem {
        message: format!("Failed to write file '{}': {}", path.display(), e.error),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::AUTOGENERATED_MARKER;
    use serde_json::json;
    use tempfile::TempDir;

    fn component() -> serde_json::Value {
        json!({
            "Name": "controller",
            "Application": "openshift-pipelines-core",
            "Repository": "openshift-pipelines/tektoncd-pipeline",
            "Upstream": "tektoncd/pipeline",
            "Branch": "release-v1.18.x",
            "Version": "1.18",
            "Platforms": ["linux/x86_64", "linux-m2xlarge/arm64"],
            "Dockerfile": ".konflux/dockerfiles/controller.Dockerfile",
            "PrefetchInput": "{\"type\": \"rpm\", \"path\": \".konflux/rpms\"}",
            "ImagePrefix": "pipelines-pipeline-",
            "ImageSuffix": "-rhel9",
            "Tekton": {"EventType": null, "WatchedSources": "\"upstream/***\".pathChanged()"},
        })
    }

    fn application() -> serde_json::Value {
        json!({
            "Name": "openshift-pipelines-core",
            "Repository": "openshift-pipelines/tektoncd-pipeline",
            "Upstream": "tektoncd/pipeline",
            "Branch": "release-v1.18.x",
            "UpstreamBranch": "release-v0.68.x",
            "Version": "1.18",
            "Platforms": ["linux/x86_64"],
            "Components": [component()],
            "GitHub": {"UpdateSources": "0 1 * * *"},
            "Tekton": {"EventType": null, "WatchedSources": "\"upstream/***\".pathChanged()"},
            "Patches": [{"Name": "vendor", "Script": "cd upstream\ngo mod vendor"}],
            "ReleasePlan": true,
        })
    }

    #[test]
    fn test_every_template_starts_with_marker() {
        for (name, source) in TEMPLATES {
            assert!(
                source.starts_with(AUTOGENERATED_MARKER),
                "{} does not start with the marker",
                name
            );
        }
    }

    #[test]
    fn test_environment_loads_every_template() {
        let env = environment().unwrap();
        for (name, _) in TEMPLATES {
            assert!(env.get_template(name).is_ok(), "{} is not loaded", name);
        }
    }

    #[test]
    fn test_missing_field_names_the_template() {
        let err = render(IMAGE, &json!({"Name": "controller"})).unwrap_err();
        assert!(err.to_string().contains("image.yaml"));
    }

    #[test]
    fn test_every_template_renders() {
        for (name, _) in TEMPLATES {
            let data = match *name {
                COMPONENT | IMAGE | PULL_REQUEST_PIPELINE | PUSH_PIPELINE => component(),
                _ => application(),
            };
            let rendered = render(name, &data).unwrap();
            assert!(rendered.starts_with(AUTOGENERATED_MARKER));
        }
    }

    #[test]
    fn test_unknown_template() {
        let err = render("missing.yaml", &json!({})).unwrap_err();
        assert!(matches!(err, Error::Template(_)));
        assert!(err.to_string().contains("missing.yaml"));
    }

    #[test]
    fn test_render_push_pipeline() {
        let rendered = render(PUSH_PIPELINE, &component()).unwrap();
        assert!(rendered.contains("name: controller-1-18-on-push"));
        assert!(rendered.contains("target_branch == \"release-v1.18.x\""));
        assert!(rendered.contains(
            "\".tekton/tektoncd-pipeline-1-18-controller-push.yaml\".pathChanged()"
        ));
        assert!(rendered.contains(
            "tekton-ecosystem-tenant/1-18/pipelines-pipeline-controller-rhel9:{{revision}}"
        ));
        assert!(rendered.contains("        - linux/x86_64\n        - linux-m2xlarge/arm64\n"));
    }

    #[test]
    fn test_render_pull_request_pipeline() {
        let rendered = render(PULL_REQUEST_PIPELINE, &component()).unwrap();
        assert!(rendered.contains("event == \"pull_request\""));
        assert!(rendered.contains(":on-pr-{{revision}}"));
    }

    #[test]
    fn test_render_update_sources_workflow() {
        let rendered = render(UPDATE_SOURCES, &application()).unwrap();
        assert!(rendered.contains("name: update-sources-release-v1.18.x"));
        assert!(rendered.contains("- cron: \"0 1 * * *\""));
        assert!(rendered.contains("git checkout -B release-v0.68.x origin/release-v0.68.x"));
        assert!(rendered.contains(
            "      - name: Patch vendor\n        run: |\n          cd upstream\n          go mod vendor\n"
        ));
        assert!(rendered.contains("GH_TOKEN: ${{ secrets.OPENSHIFT_PIPELINES_ROBOT }}"));
    }

    #[test]
    fn test_rendered_manifests_are_valid_yaml() {
        for (name, data) in [
            (APPLICATION, application()),
            (TESTS, application()),
            (RELEASE_PLAN, application()),
            (COMPONENT, component()),
            (IMAGE, component()),
            (PULL_REQUEST_PIPELINE, component()),
            (PUSH_PIPELINE, component()),
            (UPDATE_SOURCES, application()),
        ] {
            let rendered = render(name, &data).unwrap();
            serde_yaml::from_str::<serde_yaml::Value>(&rendered)
                .unwrap_or_else(|e| panic!("{} is not valid YAML: {}", name, e));
        }
    }

    #[test]
    fn test_render_to_file_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".konflux/1.18/application.yaml");

        render_to_file(APPLICATION, &application(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("name: openshift-pipelines-core-1-18"));
        // only the destination is left behind
        let entries = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_render_to_file_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("application.yaml");
        fs::write(&path, "stale").unwrap();

        render_to_file(APPLICATION, &application(), &path).unwrap();

        assert!(fs::read_to_string(&path).unwrap().starts_with(AUTOGENERATED_MARKER));
    }

    #[test]
    fn test_failed_render_leaves_destination_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("image.yaml");
        fs::write(&path, "previous").unwrap();

        assert!(render_to_file(IMAGE, &json!({"Name": "x"}), &path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
    }
}
