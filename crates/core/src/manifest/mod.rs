//! The run manifest written at the root of a finished box, and the
//! convenience links into generated documentation.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::provider::DocsEntry;
use crate::{Error, Result};

/// File name of the manifest at the box root.
pub const MANIFEST_FILE: &str = "README";

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    title: String,
    created: NaiveDate,
    docs: Vec<PathBuf>,
}

impl Manifest {
    /// Start a manifest dated `created`.
    #[must_use]
    pub fn new(title: impl Into<String>, created: NaiveDate) -> Self {
        Self {
            title: title.into(),
            created,
            docs: Vec::new(),
        }
    }

    /// Start a manifest dated today (local time).
    #[must_use]
    pub fn today(title: impl Into<String>) -> Self {
        Self::new(title, chrono::Local::now().date_naive())
    }

    /// Record a documentation index, relative to the box root.
    pub fn add_docs(&mut self, index: impl Into<PathBuf>) {
        self.docs.push(index.into());
    }

    /// Render the manifest text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!(
            "{}: created on {}\n",
            self.title,
            self.created.format("%Y-%m-%d")
        );
        out.push('\n');
        out.push_str("Documentation indices can be found at:\n");
        for index in &self.docs {
            let _ = writeln!(out, "  {}", index.display());
        }
        out
    }

    /// Write the manifest into `root`, returning the written path.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn write(&self, root: &Path) -> Result<PathBuf> {
        let path = root.join(MANIFEST_FILE);
        std::fs::write(&path, self.render())
            .map_err(|e| Error::io(e, Some(path.clone()), "writing manifest"))?;
        info!(path = %path.display(), entries = self.docs.len(), "Wrote manifest");
        Ok(path)
    }
}

/// Create `root/<link>` pointing at a documentation index that exists.
///
/// Returns the link path, or `None` when the entry has no link name or its
/// index has not been generated. An existing link is replaced.
///
/// # Errors
///
/// Returns an I/O error if the link cannot be created.
pub fn link_docs(root: &Path, docs: &DocsEntry) -> Result<Option<PathBuf>> {
    let Some(name) = docs.link else {
        return Ok(None);
    };
    if !root.join(&docs.index).is_file() {
        warn!(index = %docs.index.display(), "Documentation not generated; skipping link");
        return Ok(None);
    }

    let link = root.join(name);
    if link.symlink_metadata().is_ok() {
        debug!(link = %link.display(), "Replacing existing link");
        std::fs::remove_file(&link)
            .map_err(|e| Error::io(e, Some(link.clone()), "removing old link"))?;
    }

    symlink(&docs.index, &link).map_err(|e| Error::io(e, Some(link.clone()), "creating link"))?;
    debug!(link = %link.display(), target = %docs.index.display(), "Linked documentation");
    Ok(Some(link))
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
