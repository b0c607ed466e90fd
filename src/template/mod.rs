//! # Template Environment
//!
//! Manifests and computed defaults are Jinja templates rendered with
//! `minijinja`. Any `Serialize` record can be rendered; its fields are the
//! template's top-level variables (`{{ Name }}`, `{{ Tekton.EventType }}`).
//!
//! The environment differs from minijinja's defaults in three ways:
//!
//! - an undefined variable is an error, so a typo in a template does not
//!   silently produce empty output;
//! - output is never escaped, whatever the template name;
//! - the trailing newline of a template is kept.
//!
//! The helpers of [`funcs`] are registered on every environment.

pub mod funcs;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

use crate::error::Result;

/// A template environment with the manifest helpers registered and no
/// templates loaded.
pub fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_keep_trailing_newline(true);
    funcs::register(&mut env);
    env
}

/// Render the template `source` against `data`.
///
/// # Examples
///
/// ```
/// use konflux_config::template::eval;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// #[serde(rename_all = "PascalCase")]
/// struct Component {
///     name: String,
/// }
///
/// let component = Component { name: "controller".to_string() };
/// let path = eval(".konflux/dockerfiles/{{ Name }}.Dockerfile", &component).unwrap();
/// assert_eq!(path, ".konflux/dockerfiles/controller.Dockerfile");
/// ```
pub fn eval<T: Serialize>(source: &str, data: &T) -> Result<String> {
    Ok(environment().render_str(source, data)?)
}
