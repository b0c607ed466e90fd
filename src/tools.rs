//! Preflight checks for the external programs a run depends on.

use std::env;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

/// Programs a publishing run invokes besides `git`. `jq` is not called
/// directly but `gh --jq` needs it.
pub const PUBLISH_TOOLS: [&str; 2] = ["gh", "jq"];

/// Look `name` up in the directories of `PATH`.
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    find_in_dirs(name, env::split_paths(&path))
}

/// First executable file called `name` in `dirs`.
pub fn find_in_dirs<I>(name: &str, dirs: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    dirs.into_iter()
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Fail with [`Error::ToolValidation`] naming the first of `tools` missing
/// from `PATH`.
pub fn require_tools(tools: &[&str]) -> Result<()> {
    for tool in tools {
        match find_in_path(tool) {
            Some(path) => debug!("Found {} at {}", tool, path.display()),
            None => {
                return Err(Error::ToolValidation {
                    tool: tool.to_string(),
                    message: format!("couldn't find {} in your PATH", tool),
                })
            }
        }
    }
    Ok(())
}
