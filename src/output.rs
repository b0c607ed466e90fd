//! # Output Configuration
//!
//! Logger setup shared by both binaries, and the GitHub Actions log group
//! markers the generator prints around each target so CI logs fold per
//! repository branch.
//!
//! Logging goes through the `log` facade with `env_logger` as the backend.
//! An explicit level (the generator's `--log-level`) wins over `RUST_LOG`
//! for the crate's own messages; without one, `RUST_LOG` decides and
//! defaults to `info`.

use log::{LevelFilter, SetLoggerError};

/// Initialize logging at `level`. Per-module directives from `RUST_LOG` are
/// still honoured.
pub fn init_logging(level: LevelFilter) -> Result<(), SetLoggerError> {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .filter_module(env!("CARGO_CRATE_NAME"), level)
        .try_init()
}

/// Initialize logging from `RUST_LOG`, defaulting to `info`.
pub fn init_logging_from_env() -> Result<(), SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init()
}

/// Line opening a folded log group titled `title`.
pub fn group_line(title: &str) -> String {
    format!("::group::{}", title)
}

/// Line closing the current log group.
pub const END_GROUP: &str = "::endgroup::";

/// Open a folded log group on stdout.
pub fn group(title: &str) {
    println!("{}", group_line(title));
}

/// Close the current log group on stdout.
pub fn end_group() {
    println!("{}", END_GROUP);
}
