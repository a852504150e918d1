//! Choosing which catalog items go into a box.
//!
//! Selection only produces ids; running them is the orchestrator's job.

use tracing::debug;

use crate::Result;
use crate::config::BoxConfig;
use crate::prompt::Prompter;
use crate::provider::{Catalog, Tier};

/// A named subset of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every item.
    #[default]
    All,
    /// Every item that does not need a web browser.
    Basic,
    /// The interpreter source, the developer guide and the PEPs.
    Minimum,
}

impl Selection {
    /// Ids in declared order.
    #[must_use]
    pub fn resolve(self, catalog: &Catalog) -> Vec<&'static str> {
        catalog
            .entries()
            .iter()
            .filter(|entry| match self {
                Self::All => true,
                Self::Basic => !entry.kind.is_interactive() && entry.tier <= Tier::Basic,
                Self::Minimum => entry.tier == Tier::Minimum,
            })
            .map(|entry| entry.id)
            .collect()
    }
}

/// Offer every catalog item with a yes/no question showing its description
/// and estimated size; return the accepted ids in declared order.
///
/// # Errors
///
/// Returns an error if an answer cannot be read.
pub fn select_interactively(
    catalog: &Catalog,
    config: &BoxConfig,
    prompter: &dyn Prompter,
) -> Result<Vec<&'static str>> {
    let mut chosen = Vec::new();
    for entry in catalog.entries() {
        let provider = entry.instantiate(config);
        let info = provider.info();
        let question = format!("{} ({})? ", info.description, info.size);
        if prompter.confirm(&question)? {
            debug!(provider = entry.id, "Selected");
            chosen.push(entry.id);
        }
    }
    Ok(chosen)
}

/// Sum of the expected sizes of `ids` in megabytes.
///
/// # Errors
///
/// Returns [`crate::Error::UnknownProvider`] for an id not in the catalog.
pub fn total_size(
    catalog: &Catalog,
    config: &BoxConfig,
    ids: &[&str],
    with_build: bool,
) -> Result<u32> {
    ids.iter().try_fold(0, |total, id| {
        let provider = catalog.instantiate(id, config)?;
        Ok(total + provider.info().size.expected(with_build))
    })
}
