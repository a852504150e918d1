use devbox::regrtest;
use devbox_core::{CommandRunner, Result};
use tracing::{info, instrument};

use super::Session;

/// Run the regression tests with the box's interpreter.
#[instrument(skip(session))]
pub fn execute(session: &Session, build: bool, tests: &[String]) -> Result<()> {
    let interpreter = session.interpreter();
    let python = if build {
        interpreter.ensure_built(&session.runner, session.config.make(), session.config.jobs())?
    } else {
        interpreter.require()?
    };
    info!(python = %python.display(), "Running the test suite");

    let invocation = regrtest::invocation(&python, session.config.jobs(), tests, &session.root);
    session.runner.run(&invocation)
}
