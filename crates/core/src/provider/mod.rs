//! Provider system for the items that make up a box.
//!
//! Every item (a repository clone, a checkout, an installer fetched by hand)
//! is a [`Provider`]. Providers are listed, in dependency order, in a
//! [`Catalog`], and the orchestrator drives them through the same
//! `create` → `build` lifecycle regardless of how they acquire content.
//!
//! # Architecture
//!
//! - [`Provider`] - Trait implemented by every item
//! - [`ProviderInfo`] - Static description of an item (name, directory, size, docs)
//! - [`ProviderKind`] - Which acquisition strategy backs an item
//! - [`ProviderContext`] - Everything a provider needs to do its work
//! - [`Catalog`] / [`CatalogEntry`] - The ordered, fixed set of items
//!
//! # Example
//!
//! ```ignore
//! let mut catalog = Catalog::new();
//! catalog.register(CatalogEntry::new("peps", ProviderKind::CentralizedVcs, Tier::Minimum, peps));
//!
//! let provider = catalog.instantiate("peps", &config)?;
//! provider.create(&ctx)?;
//! provider.build(&ctx)?;
//! ```

mod catalog;
mod contract;

pub use catalog::{Catalog, CatalogEntry, Constructor, Tier};
pub use contract::{DocsEntry, Provider, ProviderContext, ProviderInfo, ProviderKind, SizeEstimate};
