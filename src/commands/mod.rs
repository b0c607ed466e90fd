//! # CLI Command Implementations
//!
//! Each command module contains an `Args` struct, derived using `clap`, and
//! an `execute` function that takes the parsed arguments and calls into the
//! `konflux_config` library to do the work.

pub mod generate;
