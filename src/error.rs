//! # Error Handling
//!
//! This module defines the centralized error type for the `konflux-config`
//! library. It uses `thiserror` to build a single `Error` enum covering every
//! failure mode of a generation or apply run, each variant carrying enough
//! context (paths, stage names, captured command output) to be actionable
//! from a CI log alone.
//!
//! The variants fall into three families:
//!
//! - **Configuration errors** (`ConfigRead`, `ConfigParse`, `ConfigValidation`):
//!   a missing file, a schema violation, or a reference to an unknown
//!   release/application/repository. These are always fatal.
//! - **External command errors** (`Command`, `ToolValidation`): a `git`, `gh`
//!   or `kubectl` invocation exited non-zero or could not be spawned, or a
//!   required executable is missing from `PATH`.
//! - **Filesystem and rendering errors** (`Filesystem`, `Template`): creating
//!   directories, writing or removing generated files, and template
//!   parse/execution problems.
//!
//! `Result<T>` is the crate-wide alias for `std::result::Result<T, Error>`.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for konflux-config operations
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration file could not be read.
    #[error("Failed to read configuration {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid YAML or does not match its schema
    /// (including unknown fields).
    #[error("Configuration parsing error in {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// The configuration parsed but is inconsistent, e.g. it references an
    /// application that has no definition.
    #[error("Invalid configuration: {message}")]
    ConfigValidation { message: String },

    /// An external command failed to start or exited with a non-zero status.
    ///
    /// `output` holds the captured stdout and stderr of the command.
    #[error("{stage} failed ({command}): {output}")]
    Command {
        stage: String,
        command: String,
        output: String,
    },

    /// A filesystem operation on a generated file or directory failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// A template could not be parsed or rendered. The message names the
    /// template and line.
    #[error("Template processing error: {0}")]
    Template(#[from] minijinja::Error),

    /// A required executable could not be found.
    #[error("Tool validation error: {tool} - {message}")]
    ToolValidation { tool: String, message: String },
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
