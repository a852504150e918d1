//! External command invocation.
//!
//! Every provider step boils down to one or more [`Invocation`]s handed to a
//! [`CommandRunner`]. The runner blocks until the child exits and turns a
//! non-zero status into [`Error::CommandFailed`]. Working directories are
//! passed per invocation; the process-wide current directory is never changed.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::{Error, Result};

/// A single external command: program, arguments, optional working directory
/// and optional child-only environment overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: OsString,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
    env: Vec<(String, OsString)>,
}

impl Invocation {
    /// Create an invocation of `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env: Vec::new(),
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the command inside `dir` instead of the caller's directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Set an environment variable for the child process only.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Program name or path.
    #[must_use]
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Program rendered lossily as a string, for messages.
    #[must_use]
    pub fn program_lossy(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Arguments in order.
    #[must_use]
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments rendered lossily as strings.
    #[must_use]
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Working directory override, if any.
    #[must_use]
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Child-only environment overrides.
    #[must_use]
    pub fn get_env(&self) -> &[(String, OsString)] {
        &self.env
    }

    /// Build the `std::process::Command` for this invocation.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Executes invocations.
///
/// The production implementation is [`SystemRunner`]; tests substitute a
/// recording runner to observe the exact sequence of commands.
pub trait CommandRunner {
    /// Run the invocation to completion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandSpawn`] if the program cannot be started and
    /// [`Error::CommandFailed`] if it exits unsuccessfully.
    fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Runs commands as real child processes, inheriting stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        info!(
            command = %invocation,
            cwd = ?invocation.get_current_dir(),
            "Running external command"
        );

        let status = invocation
            .to_command()
            .status()
            .map_err(|e| Error::command_spawn(invocation.program_lossy(), e))?;

        if status.success() {
            debug!(program = ?invocation.program(), "Command completed successfully");
            Ok(())
        } else {
            Err(Error::command_failed(
                invocation.program_lossy(),
                invocation.args_lossy(),
                status.code(),
            ))
        }
    }
}

/// Worker-count hint handed to external build and test tools.
#[must_use]
pub fn parallelism() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}
