//! # External Commands
//!
//! Every interaction with git, GitHub and the cluster goes through an
//! external program (`git`, `gh`, `kubectl`). The [`CommandRunner`] trait is
//! the seam between that orchestration logic and the processes themselves:
//! [`SystemRunner`] runs real commands, and tests substitute a recording mock
//! so the synchronizer, publisher and applier can be exercised without a
//! network or a cluster.
//!
//! A failed command becomes [`Error::Command`], labelled with the stage it
//! belongs to (e.g. `clone`, `push`) and carrying the full command line and
//! its captured output.

use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::error::{Error, Result};

/// Runs external commands - allows mocking in tests
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in `dir` and return its standard output.
    ///
    /// `stage` names the step for error messages. A non-zero exit status is
    /// an error.
    fn run(&self, stage: &str, dir: &Path, program: &str, args: &[&str]) -> Result<String>;

    /// Run `program` with `args` in `dir`, passing its standard output and
    /// error straight through to ours.
    fn stream(&self, stage: &str, dir: &Path, program: &str, args: &[&str]) -> Result<()>;
}

/// Runs commands on the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, stage: &str, dir: &Path, program: &str, args: &[&str]) -> Result<String> {
        let command_line = command_line(program, args);
        debug!("Running `{}` in {}", command_line, dir.display());

        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|e| Error::Command {
                stage: stage.to_string(),
                command: command_line.clone(),
                output: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Command {
                stage: stage.to_string(),
                command: command_line,
                output: format!("{}{}", stdout, stderr).trim().to_string(),
            });
        }
        Ok(stdout)
    }

    fn stream(&self, stage: &str, dir: &Path, program: &str, args: &[&str]) -> Result<()> {
        let command_line = command_line(program, args);
        debug!("Running `{}` in {}", command_line, dir.display());

        let status = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::Command {
                stage: stage.to_string(),
                command: command_line.clone(),
                output: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::Command {
                stage: stage.to_string(),
                command: command_line,
                output: status.to_string(),
            });
        }
        Ok(())
    }
}

/// The command line as shown in logs and errors.
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// A recorded invocation.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Call {
        pub stage: String,
        pub dir: PathBuf,
        pub command: String,
        /// Output went to the terminal rather than being captured.
        pub streamed: bool,
    }

    /// Records every command and answers from canned responses keyed by
    /// command-line prefix. Unmatched commands succeed with empty output.
    #[derive(Default, Clone)]
    pub struct MockRunner {
        pub calls: Arc<Mutex<Vec<Call>>>,
        responses: Vec<(String, std::result::Result<String, String>)>,
    }

    impl MockRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_output(mut self, prefix: &str, output: &str) -> Self {
            self.responses
                .push((prefix.to_string(), Ok(output.to_string())));
            self
        }

        pub fn failing_on(mut self, prefix: &str, output: &str) -> Self {
            self.responses
                .push((prefix.to_string(), Err(output.to_string())));
            self
        }

        /// Command lines run so far.
        pub fn commands(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|c| c.command.clone())
                .collect()
        }

        pub fn ran(&self, prefix: &str) -> bool {
            self.commands().iter().any(|c| c.starts_with(prefix))
        }

        fn record(&self, stage: &str, dir: &Path, command: String, streamed: bool) -> Result<String> {
            self.calls.lock().unwrap().push(Call {
                stage: stage.to_string(),
                dir: dir.to_path_buf(),
                command: command.clone(),
                streamed,
            });
            match self
                .responses
                .iter()
                .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            {
                Some((_, Ok(output))) => Ok(output.clone()),
                Some((_, Err(output))) => Err(Error::Command {
                    stage: stage.to_string(),
                    command,
                    output: output.clone(),
                }),
                None => Ok(String::new()),
            }
        }
    }

    impl CommandRunner for MockRunner {
        fn run(&self, stage: &str, dir: &Path, program: &str, args: &[&str]) -> Result<String> {
            self.record(stage, dir, command_line(program, args), false)
        }

        fn stream(&self, stage: &str, dir: &Path, program: &str, args: &[&str]) -> Result<()> {
            self.record(stage, dir, command_line(program, args), true)
                .map(|_| ())
        }
    }
}
