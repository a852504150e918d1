use devbox_core::selection::select_interactively;
use devbox_core::{Orchestrator, Prompter, Result, RunOptions, RunOutcome, Selection};
use tracing::{info, instrument};

use super::Session;
use crate::cli::CreateArgs;
use crate::terminal::TerminalPrompter;

/// Resolve the selection, then run the orchestrator over it.
#[instrument(skip(session))]
pub fn execute(session: &Session, args: &CreateArgs) -> Result<()> {
    let ids = match args.selection() {
        Some(selection) => selection.resolve(&session.catalog),
        None if TerminalPrompter::is_interactive() => {
            session
                .prompter
                .say("Please choose what to provide [answer y/n]:\n");
            select_interactively(&session.catalog, &session.config, &session.prompter)?
        }
        None => {
            info!("No selection given and stdin is not a terminal; providing everything");
            Selection::All.resolve(&session.catalog)
        }
    };

    if ids.is_empty() {
        session.prompter.say("Nothing selected.");
        return Ok(());
    }

    let orchestrator = Orchestrator::new(
        &session.catalog,
        &session.config,
        &session.root,
        &session.runner,
        &session.prompter,
    );
    let options = RunOptions {
        build: args.build,
        assume_yes: args.yes,
    };
    match orchestrator.create(&ids, options)? {
        RunOutcome::Declined { .. } => session.prompter.say("Aborted."),
        RunOutcome::Completed(report) => {
            session.prompter.say(&format!(
                "Done. See {} for where to find the documentation.",
                report.manifest.display()
            ));
        }
    }
    Ok(())
}
