use std::path::PathBuf;

use devbox::coverage::{Coverage, REPORT_DIR};
use devbox_core::{CommandRunner, Error, Result};
use tracing::instrument;

use super::Session;
use crate::cli::CoverageCommands;

fn absolute(path: PathBuf) -> Result<PathBuf> {
    std::path::absolute(&path).map_err(|e| Error::io(e, Some(path), "resolving path"))
}

/// Pair the built interpreter with the box's coverage.py clone.
fn coverage(session: &Session) -> Result<Coverage> {
    let python = session.interpreter().require()?;
    let coveragepy = session.path("coveragepy");
    if !coveragepy.is_dir() {
        return Err(Error::not_created("coveragepy", coveragepy));
    }
    Ok(Coverage::new(
        python,
        absolute(session.path("cpython"))?,
        absolute(coveragepy)?,
    ))
}

#[instrument(skip(session))]
pub fn execute(session: &Session, command: &CoverageCommands) -> Result<()> {
    let coverage = coverage(session)?;
    match command {
        CoverageCommands::Build => coverage.build(&session.runner),
        CoverageCommands::Run { tests } => {
            coverage.remove_data()?;
            session.runner.run(&coverage.run(tests))
        }
        CoverageCommands::Html { directory } => {
            let report = absolute(directory.clone().unwrap_or_else(|| session.path(REPORT_DIR)))?;
            let index = coverage.report(&session.runner, &report)?;
            println!("{}", index.display());
            Ok(())
        }
    }
}
