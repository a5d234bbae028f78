//! Execution of workflow step scripts.

use std::path::Path;
use std::process::{Command, Stdio};

use indexmap::IndexMap;
use log::debug;

use crate::error::Result;

/// Runs a step script and reports its exit code.
///
/// The workflow runner only depends on this trait so tests can record
/// scripts instead of spawning processes.
pub trait CommandRunner {
    /// Runs `script` in `cwd` with extra environment variables.
    ///
    /// # Returns
    /// * `Result<i32>` - Exit code of the script; `-1` when terminated by a signal
    fn run(&self, script: &str, cwd: &Path, env: &IndexMap<String, String>) -> Result<i32>;
}

/// Runs scripts through `sh -e -c`, streaming output to the terminal.
#[derive(Debug, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, script: &str, cwd: &Path, env: &IndexMap<String, String>) -> Result<i32> {
        debug!("Running in {}:\n{}", cwd.display(), script);
        let status = Command::new("sh")
            .arg("-e")
            .arg("-c")
            .arg(script)
            .current_dir(cwd)
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        Ok(status.code().unwrap_or(-1))
    }
}
