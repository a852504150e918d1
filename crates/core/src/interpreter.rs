//! Locating and building the interpreter from a fetched source tree.
//!
//! Finding nothing is a normal outcome here ([`Interpreter::locate`] returns
//! `None`); callers such as the test runner and coverage decide whether that
//! is fatal.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::command::{CommandRunner, Invocation};
use crate::{Error, Result};

/// Where a built interpreter may live, relative to the source tree, in
/// lookup order: UNIX, macOS, 32-bit Windows, 64-bit Windows.
pub const CANDIDATES: [&[&str]; 4] = [
    &["python"],
    &["python.exe"],
    &["PCbuild", "python_d.exe"],
    &["PCbuild", "amd64", "python_d.exe"],
];

/// A CPython source tree that may or may not have been built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    source_dir: PathBuf,
}

impl Interpreter {
    /// Wrap the source tree at `source_dir`.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }

    /// Source tree root.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Candidate executable paths in lookup order.
    #[must_use]
    pub fn candidates(&self) -> Vec<PathBuf> {
        CANDIDATES
            .iter()
            .map(|parts| parts.iter().fold(self.source_dir.clone(), |p, c| p.join(c)))
            .collect()
    }

    /// First candidate that exists as a file, made absolute.
    #[must_use]
    pub fn locate(&self) -> Option<PathBuf> {
        let found = self.candidates().into_iter().find(|c| c.is_file())?;
        debug!(executable = %found.display(), "Found built interpreter");
        Some(std::path::absolute(&found).unwrap_or(found))
    }

    /// Like [`Interpreter::locate`] but absence is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InterpreterNotBuilt`] when no candidate exists.
    pub fn require(&self) -> Result<PathBuf> {
        self.locate()
            .ok_or_else(|| Error::interpreter_not_built(&self.source_dir))
    }

    /// Build the interpreter with its native build system, then locate it.
    ///
    /// `./configure` is skipped when a `Makefile` already exists. A failing
    /// `make` is logged rather than returned: whatever it managed to produce
    /// is still looked up.
    ///
    /// # Errors
    ///
    /// Returns an error if the source tree is missing or `./configure` fails.
    #[instrument(skip(self, runner), fields(source = %self.source_dir.display()))]
    pub fn build(
        &self,
        runner: &dyn CommandRunner,
        make: &str,
        jobs: usize,
    ) -> Result<Option<PathBuf>> {
        if !self.source_dir.is_dir() {
            return Err(Error::missing_dependency(
                "the interpreter",
                "cpython",
                &self.source_dir,
            ));
        }

        if cfg!(windows) {
            warn!("See the devguide's Getting Set Up guide for building under Windows");
            return Ok(self.locate());
        }

        if self.source_dir.join("Makefile").is_file() {
            info!("Makefile already exists; skipping ./configure");
        } else {
            runner.run(
                &Invocation::new("./configure")
                    .args(["--prefix=/dev/null", "--with-pydebug"])
                    .current_dir(&self.source_dir),
            )?;
        }

        let make_invocation = Invocation::new(make)
            .args(["-s", "-j"])
            .arg(jobs.to_string())
            .current_dir(&self.source_dir);
        if let Err(e) = runner.run(&make_invocation) {
            warn!(error = %e, "Interpreter build did not complete cleanly");
        }

        Ok(self.locate())
    }

    /// Return the built interpreter, building it first if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InterpreterNotBuilt`] if nothing could be produced,
    /// or the error from [`Interpreter::build`].
    pub fn ensure_built(
        &self,
        runner: &dyn CommandRunner,
        make: &str,
        jobs: usize,
    ) -> Result<PathBuf> {
        if let Some(found) = self.locate() {
            return Ok(found);
        }
        self.build(runner, make, jobs)?
            .ok_or_else(|| Error::interpreter_not_built(&self.source_dir))
    }
}
