pub mod build_python;
pub mod coverage;
pub mod create;
pub mod list;
pub mod test;
pub mod update;
pub mod version;

use std::path::{Path, PathBuf};

use devbox_core::config::CONFIG_FILE;
use devbox_core::{BoxConfig, Catalog, Interpreter, Result, SystemRunner};
use tracing::debug;

use crate::cli::Cli;
use crate::terminal::TerminalPrompter;

/// Everything a subcommand needs: where the box lives, its configuration,
/// the catalog and the real process runner and terminal.
#[derive(Debug)]
pub struct Session {
    pub root: PathBuf,
    pub config: BoxConfig,
    pub catalog: Catalog,
    pub runner: SystemRunner,
    pub prompter: TerminalPrompter,
}

impl Session {
    /// Resolve root and configuration from global flags.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => BoxConfig::load(path)?,
            None => BoxConfig::load_or_default(&cli.root.join(CONFIG_FILE))?,
        };
        debug!(root = %cli.root.display(), "Session ready");
        Ok(Self {
            root: cli.root.clone(),
            config,
            catalog: devbox::default_catalog(),
            runner: SystemRunner::new(),
            prompter: TerminalPrompter,
        })
    }

    /// Path inside the box.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// The interpreter source tree inside the box.
    pub fn interpreter(&self) -> Interpreter {
        Interpreter::new(self.path("cpython"))
    }
}
