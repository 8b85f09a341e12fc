//! Synchronous external command execution
//!
//! Every child process blocks the run until it exits, with its streams
//! either inherited (installer output reaches the user in real time) or
//! discarded (availability probes). Only the exit status is observed;
//! stderr is never captured or re-interpreted.

use std::path::Path;
use std::process::{Command, Stdio};

/// Exit signal of one external command invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    pub exited_zero: bool,
}

/// Runs external commands.
///
/// The workflow is generic over this so tests record invocations instead of
/// spawning real package managers.
pub trait RunCommand {
    /// Run `program args..` with `dir` as the working directory when given.
    /// A spawn failure (program not found, permission denied) reports as
    /// `exited_zero = false` like any other failing command.
    fn run_in(
        &self,
        dir: Option<&Path>,
        program: &str,
        args: &[&str],
        inherit_output: bool,
    ) -> CommandResult;

    /// Run in the caller's working directory.
    fn run(&self, program: &str, args: &[&str], inherit_output: bool) -> CommandResult {
        self.run_in(None, program, args, inherit_output)
    }

    /// Check whether a tool answers `--version`, with output suppressed.
    fn probe(&self, program: &str) -> bool {
        self.run(program, &["--version"], false).exited_zero
    }
}

/// Spawns real OS processes.
pub struct SystemRunner;

impl RunCommand for SystemRunner {
    fn run_in(
        &self,
        dir: Option<&Path>,
        program: &str,
        args: &[&str],
        inherit_output: bool,
    ) -> CommandResult {
        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = dir {
            command.current_dir(dir);
        }
        if inherit_output {
            command
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        } else {
            command
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        }
        let exited_zero = command.status().map(|status| status.success()).unwrap_or(false);
        CommandResult { exited_zero }
    }
}
