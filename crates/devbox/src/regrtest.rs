//! The interpreter's regression test suite, run as rigorously as possible.

use std::path::Path;

use devbox_core::Invocation;

/// Flags passed before `-m test`: show every warning, make bytes/str
/// comparisons errors and ignore `PYTHON*` variables.
const INTERPRETER_FLAGS: [&str; 4] = ["-W", "default", "-bb", "-E"];

/// `<python> -W default -bb -E -m test -r -w -u all -j <jobs> [tests...]`.
///
/// Runs from `cwd` so relative paths in test names resolve there.
#[must_use]
pub fn invocation<S: AsRef<str>>(
    python: &Path,
    jobs: usize,
    tests: &[S],
    cwd: &Path,
) -> Invocation {
    Invocation::new(python.as_os_str())
        .args(INTERPRETER_FLAGS)
        .args(["-m", "test", "-r", "-w", "-u", "all", "-j"])
        .arg(jobs.to_string())
        .args(tests.iter().map(|t| t.as_ref().to_string()))
        .current_dir(cwd)
}
