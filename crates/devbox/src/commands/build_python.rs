use devbox_core::{Error, Result};
use tracing::instrument;

use super::Session;

/// Build the interpreter and print where it ended up.
#[instrument(skip(session))]
pub fn execute(session: &Session) -> Result<()> {
    let interpreter = session.interpreter();
    let built = interpreter.build(&session.runner, session.config.make(), session.config.jobs())?;
    let Some(python) = built else {
        return Err(Error::interpreter_not_built(interpreter.source_dir()));
    };
    println!("{}", python.display());
    Ok(())
}
