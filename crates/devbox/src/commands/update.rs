use devbox_core::{Orchestrator, Prompter, Result};
use tracing::instrument;

use super::Session;

/// Update `ids`, or every repository already present under the root.
#[instrument(skip(session))]
pub fn execute(session: &Session, ids: &[String]) -> Result<()> {
    let orchestrator = Orchestrator::new(
        &session.catalog,
        &session.config,
        &session.root,
        &session.runner,
        &session.prompter,
    );

    let ids: Vec<&str> = if ids.is_empty() {
        orchestrator.created_ids()
    } else {
        ids.iter().map(String::as_str).collect()
    };
    if ids.is_empty() {
        session.prompter.say("Nothing to update.");
        return Ok(());
    }

    let updated = orchestrator.update(&ids)?;
    session
        .prompter
        .say(&format!("Updated {}.", updated.join(", ")));
    Ok(())
}
