//! Helpers registered on every template environment.
//!
//! | Name        | Kind     | Use                                       |
//! |-------------|----------|-------------------------------------------|
//! | `hyphenize` | filter   | `{{ Version \| hyphenize }}`              |
//! | `basename`  | filter   | `{{ Repository \| basename }}`            |
//! | `indent`    | filter   | `{{ Script \| indent(10) }}`              |
//! | `contains`  | function | `{% if contains(Branch, "release") %}`    |
//! | `eval`      | function | `{{ eval(DockerfileTemplate, component) }}` |
//!
//! `indent` replaces minijinja's built-in filter of the same name: it
//! prefixes every line, the first one included.

use std::sync::LazyLock;

use minijinja::{Environment, Value};
use regex::Regex;

static NAME_FIELD_INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]").expect("valid regex"));

/// Replace every character outside `[a-z0-9]` with `-`, one dash per
/// character.
///
/// # Examples
///
/// ```
/// use konflux_config::template::funcs::hyphenize;
///
/// assert_eq!(hyphenize("1.18"), "1-18");
/// assert_eq!(hyphenize("tektoncd_pipeline"), "tektoncd-pipeline");
/// ```
pub fn hyphenize(value: &str) -> String {
    NAME_FIELD_INVALID_CHARS.replace_all(value, "-").into_owned()
}

/// Last element of a slash-separated path. Trailing slashes are ignored, an
/// empty path yields `.` and a path of only slashes yields `/`.
pub fn basename(value: &str) -> String {
    if value.is_empty() {
        return ".".to_string();
    }
    let trimmed = value.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    match trimmed.rfind('/') {
        Some(index) => trimmed[index + 1..].to_string(),
        None => trimmed.to_string(),
    }
}

/// Prefix every line of `value` with `spaces` spaces.
pub fn indent(spaces: usize, value: &str) -> String {
    let pad = " ".repeat(spaces);
    format!("{}{}", pad, value.replace('\n', &format!("\n{}", pad)))
}

pub(crate) fn register(env: &mut Environment<'static>) {
    env.add_filter("hyphenize", hyphenize_filter);
    env.add_filter("basename", basename_filter);
    env.add_filter("indent", indent_filter);
    env.add_function("contains", contains_function);
    env.add_function("eval", eval_function);
}

fn hyphenize_filter(value: String) -> String {
    hyphenize(&value)
}

fn basename_filter(value: String) -> String {
    basename(&value)
}

fn indent_filter(value: String, spaces: usize) -> String {
    indent(spaces, &value)
}

fn contains_function(haystack: String, needle: String) -> bool {
    haystack.contains(needle.as_str())
}

/// Render `source` against `data` with the same helpers.
fn eval_function(source: String, data: Value) -> Result<String, minijinja::Error> {
    super::environment().render_str(&source, data)
}
