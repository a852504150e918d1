//! The ordered catalog of items a box can contain.
//!
//! Order is significant: items are created and built in registration order,
//! so an item whose build reads another item's files must be registered after
//! it. [`Catalog::validate`] checks that, plus directory uniqueness.

use std::collections::HashMap;
use std::fmt;

use super::contract::{Provider, ProviderKind};
use crate::config::BoxConfig;
use crate::{Error, Result};

/// Smallest selection an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Part of the minimum box.
    Minimum,
    /// Part of the basic box (everything that needs no browser).
    Basic,
    /// Only part of the full box.
    Full,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minimum => write!(f, "minimum"),
            Self::Basic => write!(f, "basic"),
            Self::Full => write!(f, "all"),
        }
    }
}

/// Builds a provider from configuration.
pub type Constructor = fn(&BoxConfig) -> Box<dyn Provider>;

/// One catalog line: id, provider kind and how to construct it.
#[derive(Clone, Copy)]
pub struct CatalogEntry {
    /// Identifier used on the command line.
    pub id: &'static str,
    /// Acquisition strategy.
    pub kind: ProviderKind,
    /// Smallest selection this entry is part of.
    pub tier: Tier,
    constructor: Constructor,
}

impl CatalogEntry {
    /// Create an entry.
    #[must_use]
    pub const fn new(
        id: &'static str,
        kind: ProviderKind,
        tier: Tier,
        constructor: Constructor,
    ) -> Self {
        Self {
            id,
            kind,
            tier,
            constructor,
        }
    }

    /// Construct the provider for this entry.
    #[must_use]
    pub fn instantiate(&self, config: &BoxConfig) -> Box<dyn Provider> {
        (self.constructor)(config)
    }
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("tier", &self.tier)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of catalog entries.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. A later entry with the same id replaces the earlier one
    /// in place, keeping its position.
    pub fn register(&mut self, entry: CatalogEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    /// Entries in declared order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Position of an entry in the declared order.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// All ids in declared order.
    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Construct the provider registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProvider`] if no entry has that id.
    pub fn instantiate(&self, id: &str, config: &BoxConfig) -> Result<Box<dyn Provider>> {
        self.get(id)
            .map(|entry| entry.instantiate(config))
            .ok_or_else(|| Error::unknown_provider(id))
    }

    /// Sort and deduplicate `ids` into declared order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProvider`] for the first id not in the catalog.
    pub fn ordered<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<&'static str>> {
        for id in ids {
            if self.get(id.as_ref()).is_none() {
                return Err(Error::unknown_provider(id.as_ref()));
            }
        }
        Ok(self
            .entries
            .iter()
            .filter(|e| ids.iter().any(|id| id.as_ref() == e.id))
            .map(|e| e.id)
            .collect())
    }

    /// Check catalog invariants under `config`:
    /// target directories are unique, dependencies are registered before their
    /// dependents, and only full-tier entries are interactive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] describing the first violation.
    pub fn validate(&self, config: &BoxConfig) -> Result<()> {
        let mut directories = HashMap::new();
        for (index, entry) in self.entries.iter().enumerate() {
            let provider = entry.instantiate(config);
            let info = provider.info();

            if info.id != entry.id {
                return Err(Error::configuration(format!(
                    "catalog entry `{}` constructs provider `{}`",
                    entry.id, info.id
                )));
            }

            if let Some(other) = directories.insert(info.directory.clone(), entry.id) {
                return Err(Error::configuration(format!(
                    "`{}` and `{}` both use directory {}",
                    other,
                    entry.id,
                    info.directory.display()
                )));
            }

            for dependency in provider.depends_on() {
                match self.position(dependency) {
                    Some(position) if position < index => {}
                    Some(_) => {
                        return Err(Error::configuration(format!(
                            "`{}` depends on `{dependency}` which is registered after it",
                            entry.id
                        )));
                    }
                    None => {
                        return Err(Error::configuration(format!(
                            "`{}` depends on unknown provider `{dependency}`",
                            entry.id
                        )));
                    }
                }
            }

            if entry.kind.is_interactive() && entry.tier != Tier::Full {
                return Err(Error::configuration(format!(
                    "`{}` needs a browser and cannot be part of the {} selection",
                    entry.id, entry.tier
                )));
            }
        }
        Ok(())
    }
}
