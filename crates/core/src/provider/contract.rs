//! The provider contract shared by every acquisition strategy.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::Result;
use crate::command::CommandRunner;
use crate::config::BoxConfig;
use crate::prompt::Prompter;

/// Which family of external tool backs a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Cloned with a distributed VCS client (Mercurial).
    DistributedVcs,
    /// Checked out with a centralized VCS client (Subversion).
    CentralizedVcs,
    /// Fetched by the user through a web browser.
    ManualDownload,
}

impl ProviderKind {
    /// Whether acquiring this kind of item opens a browser and waits on the user.
    #[must_use]
    pub fn is_interactive(self) -> bool {
        matches!(self, Self::ManualDownload)
    }

    /// Whether the item can be refreshed in place.
    #[must_use]
    pub fn supports_update(self) -> bool {
        !self.is_interactive()
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DistributedVcs => write!(f, "hg"),
            Self::CentralizedVcs => write!(f, "svn"),
            Self::ManualDownload => write!(f, "manual"),
        }
    }
}

/// Estimated size on disk in megabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeEstimate {
    /// Size once fetched.
    pub fetched: u32,
    /// Size once the build step has also run, when it adds anything.
    pub built: Option<u32>,
}

impl SizeEstimate {
    /// An item whose build step adds nothing.
    #[must_use]
    pub const fn fetched(fetched: u32) -> Self {
        Self {
            fetched,
            built: None,
        }
    }

    /// An item that grows to `built` once built.
    #[must_use]
    pub const fn range(fetched: u32, built: u32) -> Self {
        Self {
            fetched,
            built: Some(built),
        }
    }

    /// Size to expect given whether the build step will run.
    #[must_use]
    pub fn expected(&self, with_build: bool) -> u32 {
        if with_build {
            self.built.unwrap_or(self.fetched)
        } else {
            self.fetched
        }
    }
}

impl fmt::Display for SizeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.built {
            Some(built) => write!(f, "{} MB, {} MB built", self.fetched, built),
            None => write!(f, "{} MB", self.fetched),
        }
    }
}

/// Generated documentation exposed by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsEntry {
    /// Index page, relative to the box root.
    pub index: PathBuf,
    /// Name of the convenience link created at the box root.
    pub link: Option<&'static str>,
}

impl DocsEntry {
    /// Docs with no convenience link.
    #[must_use]
    pub fn new(index: impl Into<PathBuf>) -> Self {
        Self {
            index: index.into(),
            link: None,
        }
    }

    /// Also link `name` at the root to the index page.
    #[must_use]
    pub fn with_link(mut self, name: &'static str) -> Self {
        self.link = Some(name);
        self
    }
}

/// Static description of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Catalog identifier, also used on the command line.
    pub id: &'static str,
    /// Human-readable name.
    pub name: String,
    /// One-line description shown when selecting items.
    pub description: String,
    /// Target directory, relative to the box root.
    pub directory: PathBuf,
    /// Estimated size.
    pub size: SizeEstimate,
    /// Documentation entry point, if the item produces one.
    pub docs: Option<DocsEntry>,
}

impl ProviderInfo {
    /// Create info whose directory is named after the id.
    #[must_use]
    pub fn new(id: &'static str, name: impl Into<String>, size: SizeEstimate) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            directory: PathBuf::from(id),
            size,
            docs: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the target directory.
    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Set the documentation entry point.
    #[must_use]
    pub fn with_docs(mut self, docs: DocsEntry) -> Self {
        self.docs = Some(docs);
        self
    }
}

/// Everything a provider step may use.
pub struct ProviderContext<'a> {
    /// Box root; provider directories are relative to it.
    pub root: &'a Path,
    /// Runs external commands.
    pub runner: &'a dyn CommandRunner,
    /// Talks to the user.
    pub prompter: &'a dyn Prompter,
    /// Loaded configuration.
    pub config: &'a BoxConfig,
}

impl<'a> ProviderContext<'a> {
    /// Create a context.
    #[must_use]
    pub fn new(
        root: &'a Path,
        runner: &'a dyn CommandRunner,
        prompter: &'a dyn Prompter,
        config: &'a BoxConfig,
    ) -> Self {
        Self {
            root,
            runner,
            prompter,
            config,
        }
    }

    /// Absolute (root-joined) path of a provider's target directory.
    #[must_use]
    pub fn target_dir(&self, info: &ProviderInfo) -> PathBuf {
        self.root.join(&info.directory)
    }

    /// Resolve a path relative to the box root.
    #[must_use]
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }
}

impl fmt::Debug for ProviderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderContext")
            .field("root", &self.root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// An item that can be acquired into the box and optionally built.
///
/// `create` must tolerate being called when the target directory already
/// exists: VCS-backed items update in place, manual items simply prompt again.
pub trait Provider {
    /// Static description of the item.
    fn info(&self) -> &ProviderInfo;

    /// Acquisition strategy backing the item.
    fn kind(&self) -> ProviderKind;

    /// Ids of catalog items whose `create` output this item's `build` reads.
    fn depends_on(&self) -> &'static [&'static str] {
        &[]
    }

    /// Acquire the item into its target directory.
    ///
    /// # Errors
    ///
    /// Returns an error if any external command fails.
    fn create(&self, ctx: &ProviderContext<'_>) -> Result<()>;

    /// Refresh an existing item in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the item was never created or a command fails.
    fn update(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        let _ = ctx;
        debug!(provider = self.info().id, "Nothing to update");
        Ok(())
    }

    /// Derive secondary artifacts from the fetched content.
    ///
    /// # Errors
    ///
    /// Returns an error if a required dependency is missing or a command fails.
    fn build(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }
}
