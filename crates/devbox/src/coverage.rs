//! Running coverage.py over the standard library of a built interpreter.
//!
//! Shared by the coverage.py item's build step and the `devbox coverage`
//! subcommand. Every command runs with an explicit working directory; the
//! environment overrides apply to the child process only.

use std::path::{Path, PathBuf};

use devbox_core::{CommandRunner, Error, Invocation, Result};
use tracing::{debug, info};

/// Report directory, relative to the box root.
pub const REPORT_DIR: &str = "coverage_report";

/// Data file coverage.py leaves behind in the interpreter tree.
pub const DATA_FILE: &str = ".coverage";

const OMIT: &str = "Lib/test/*";

/// A coverage.py checkout paired with a built interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coverage {
    python: PathBuf,
    cpython_dir: PathBuf,
    coveragepy_dir: PathBuf,
}

impl Coverage {
    /// Pair the interpreter `python`, built in `cpython_dir`, with the
    /// coverage.py checkout in `coveragepy_dir`.
    #[must_use]
    pub fn new(
        python: impl Into<PathBuf>,
        cpython_dir: impl Into<PathBuf>,
        coveragepy_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            python: python.into(),
            cpython_dir: cpython_dir.into(),
            coveragepy_dir: coveragepy_dir.into(),
        }
    }

    fn python(&self) -> Invocation {
        Invocation::new(self.python.as_os_str())
    }

    /// `python <coveragepy> <command> ...` inside the interpreter tree.
    fn coverage_command(&self, command: &str) -> Invocation {
        self.python()
            .arg(self.coveragepy_dir.as_os_str())
            .arg(command)
            .current_dir(&self.cpython_dir)
    }

    /// Compile the C tracer against the interpreter's headers.
    #[must_use]
    pub fn build_extension(&self) -> Invocation {
        let include = self.cpython_dir.join("Include");
        self.python()
            .args(["setup.py", "build_ext", "--inplace"])
            .current_dir(&self.coveragepy_dir)
            .env(
                "CPPFLAGS",
                format!("-I {} -I {}", self.cpython_dir.display(), include.display()),
            )
    }

    /// `setup.py clean` in the coverage.py checkout.
    #[must_use]
    pub fn clean_build(&self) -> Invocation {
        self.python()
            .args(["setup.py", "clean"])
            .current_dir(&self.coveragepy_dir)
    }

    /// Run the regression test suite (or just `tests`) under coverage.
    #[must_use]
    pub fn run<S: AsRef<str>>(&self, tests: &[S]) -> Invocation {
        let fullcoverage = self.coveragepy_dir.join("coverage").join("fullcoverage");
        self.coverage_command("run")
            .args(["--pylib", "Lib/test/regrtest.py"])
            .args(tests.iter().map(|t| t.as_ref().to_string()))
            .env("PYTHONPATH", fullcoverage)
    }

    /// Write the HTML report into `report_dir`.
    #[must_use]
    pub fn html(&self, report_dir: &Path) -> Invocation {
        self.coverage_command("html")
            .args(["-i", "-d"])
            .arg(report_dir.as_os_str())
            .args(["--omit", OMIT])
    }

    /// Delete previously compiled tracers so the next build picks up the
    /// interpreter's current headers.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a tracer exists but cannot be removed.
    pub fn remove_tracers(&self) -> Result<()> {
        let package = self.coveragepy_dir.join("coverage");
        let Ok(entries) = std::fs::read_dir(&package) else {
            return Ok(());
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("tracer")
                && Path::new(name.as_ref())
                    .extension()
                    .is_some_and(|ext| ext == "so" || ext == "pyd")
            {
                let path = entry.path();
                debug!(path = %path.display(), "Removing stale tracer");
                std::fs::remove_file(&path)
                    .map_err(|e| Error::io(e, Some(path.clone()), "removing tracer"))?;
            }
        }
        Ok(())
    }

    /// Remove the data file from a previous run, if any.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file exists but cannot be removed.
    pub fn remove_data(&self) -> Result<()> {
        remove_if_exists(&self.cpython_dir.join(DATA_FILE))
    }

    /// Compile the tracer from scratch.
    ///
    /// # Errors
    ///
    /// Returns the first failing step.
    pub fn build(&self, runner: &dyn CommandRunner) -> Result<()> {
        self.remove_tracers()?;
        runner.run(&self.clean_build())?;
        runner.run(&self.build_extension())
    }

    /// Generate a fresh HTML report into `report_dir` and return its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the old report cannot be removed or coverage fails.
    pub fn report(&self, runner: &dyn CommandRunner, report_dir: &Path) -> Result<PathBuf> {
        if report_dir.is_dir() {
            std::fs::remove_dir_all(report_dir).map_err(|e| {
                Error::io(e, Some(report_dir.to_path_buf()), "removing old report")
            })?;
        }
        runner.run(&self.html(report_dir))?;
        let index = report_dir.join("index.html");
        info!(index = %index.display(), "Coverage report written");
        Ok(index)
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(e, Some(path.to_path_buf()), "removing file")),
    }
}
