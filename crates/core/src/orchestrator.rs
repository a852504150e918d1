//! Drives selected providers through `create` and `build`.
//!
//! A run is strictly sequential and fail-fast: the first failing step ends
//! the run, later providers are never touched and no manifest is written.
//! Partially created directories are left in place; VCS-backed providers
//! pick them up again on the next run.

use std::path::{Path, PathBuf};

use tracing::{info, info_span, instrument};

use crate::command::CommandRunner;
use crate::config::BoxConfig;
use crate::manifest::{Manifest, link_docs};
use crate::prompt::Prompter;
use crate::provider::{Catalog, Provider, ProviderContext};
use crate::selection::total_size;
use crate::{Error, Result};

/// Options for a `create` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Also run every provider's build step.
    pub build: bool,
    /// Skip the size confirmation.
    pub assume_yes: bool,
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Ids created, in order.
    pub created: Vec<&'static str>,
    /// Ids built, in order.
    pub built: Vec<&'static str>,
    /// Estimated total size shown to the user, in megabytes.
    pub total_size: u32,
    /// Written manifest.
    pub manifest: PathBuf,
    /// Documentation links created at the root.
    pub links: Vec<PathBuf>,
}

/// Result of [`Orchestrator::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The user declined the size estimate; nothing was touched.
    Declined {
        /// Estimated total size that was declined.
        total_size: u32,
    },
    /// Every selected provider was created (and built, if requested).
    Completed(RunReport),
}

/// Sequences providers from a catalog.
pub struct Orchestrator<'a> {
    catalog: &'a Catalog,
    config: &'a BoxConfig,
    root: PathBuf,
    runner: &'a dyn CommandRunner,
    prompter: &'a dyn Prompter,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator rooted at `root`.
    #[must_use]
    pub fn new(
        catalog: &'a Catalog,
        config: &'a BoxConfig,
        root: impl Into<PathBuf>,
        runner: &'a dyn CommandRunner,
        prompter: &'a dyn Prompter,
    ) -> Self {
        Self {
            catalog,
            config,
            root: root.into(),
            runner,
            prompter,
        }
    }

    /// Box root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn context(&self) -> ProviderContext<'_> {
        ProviderContext::new(&self.root, self.runner, self.prompter, self.config)
    }

    /// Check the catalog, then put `ids` in catalog order without duplicates.
    fn ordered(&self, ids: &[&str]) -> Result<Vec<&'static str>> {
        self.catalog.validate(self.config)?;
        self.catalog.ordered(ids)
    }

    fn instantiate(&self, ids: &[&str]) -> Result<Vec<Box<dyn Provider>>> {
        ids.iter()
            .map(|id| self.catalog.instantiate(id, self.config))
            .collect()
    }

    /// Create (and optionally build) the providers in `ids`, in catalog order.
    ///
    /// The estimated total is confirmed with the user before anything on disk
    /// is touched, unless `options.assume_yes` is set.
    ///
    /// # Errors
    ///
    /// Returns the first error from any provider step or from writing the
    /// manifest.
    #[instrument(skip(self, ids), fields(root = %self.root.display(), count = ids.len()))]
    pub fn create(&self, ids: &[&str], options: RunOptions) -> Result<RunOutcome> {
        let ids = self.ordered(ids)?;
        let providers = self.instantiate(&ids)?;

        let names: Vec<&str> = providers.iter().map(|p| p.info().name.as_str()).collect();
        self.prompter.say(&format!("Getting {}", names.join(", ")));

        let total_size = total_size(self.catalog, self.config, &ids, options.build)?;
        if !options.assume_yes {
            let question = format!("The requested Box will be about {total_size} MB. OK? [y/n] ");
            if !self.prompter.confirm(&question)? {
                info!(total_size, "Run declined by user");
                return Ok(RunOutcome::Declined { total_size });
            }
        }

        std::fs::create_dir_all(&self.root)
            .map_err(|e| Error::io(e, Some(self.root.clone()), "creating box root"))?;

        let ctx = self.context();
        let mut created = Vec::new();
        let mut built = Vec::new();
        for provider in &providers {
            let info = provider.info();
            let _span = info_span!("provider", id = info.id).entered();

            self.prompter.say(&format!("Fetching {} ...", info.name));
            provider.create(&ctx)?;
            created.push(info.id);

            if options.build {
                self.prompter.say(&format!("Building {} ...", info.name));
                provider.build(&ctx)?;
                built.push(info.id);
            }
        }

        let mut manifest = Manifest::today(self.config.title());
        let mut links = Vec::new();
        for provider in &providers {
            let info = provider.info();
            if let Some(docs) = &info.docs {
                manifest.add_docs(&docs.index);
                if let Some(link) = link_docs(&self.root, docs)? {
                    links.push(link);
                }
            }
        }
        let manifest = manifest.write(&self.root)?;

        info!(created = created.len(), built = built.len(), "Box complete");
        Ok(RunOutcome::Completed(RunReport {
            created,
            built,
            total_size,
            manifest,
            links,
        }))
    }

    /// Refresh the providers in `ids` in place, in catalog order.
    ///
    /// Providers that cannot be updated (manual downloads) are skipped.
    /// Returns the ids that were updated.
    ///
    /// # Errors
    ///
    /// Returns the first error, including [`Error::NotCreated`] for an item
    /// that has never been created.
    #[instrument(skip(self, ids), fields(root = %self.root.display()))]
    pub fn update(&self, ids: &[&str]) -> Result<Vec<&'static str>> {
        let ctx = self.context();
        let mut updated = Vec::new();
        for provider in self.instantiate(&self.ordered(ids)?)? {
            if !provider.kind().supports_update() {
                continue;
            }
            let info = provider.info();
            self.prompter.say(&format!("Updating {} ...", info.name));
            provider.update(&ctx)?;
            updated.push(info.id);
        }
        Ok(updated)
    }

    /// Ids of updatable providers whose target directory exists.
    #[must_use]
    pub fn created_ids(&self) -> Vec<&'static str> {
        self.catalog
            .entries()
            .iter()
            .filter(|entry| entry.kind.supports_update())
            .filter(|entry| {
                let provider = entry.instantiate(self.config);
                self.root.join(&provider.info().directory).is_dir()
            })
            .map(|entry| entry.id)
            .collect()
    }
}
