//! Core building blocks for devbox
//!
//! This crate provides everything needed to assemble a contributor's box
//! except the concrete items themselves:
//! - The [`Provider`] contract and the ordered [`Catalog`]
//! - A [`CommandRunner`] seam over external processes
//! - The [`Orchestrator`] that sequences `create` and `build`
//! - Helpers shared by providers (interpreter lookup, scoped env overrides)
//!
//! # Overview
//!
//! A run resolves a selection to catalog ids, confirms the estimated size,
//! then creates (and optionally builds) each item in catalog order. The first
//! failure ends the run. A successful run writes a `README` manifest at the
//! root listing the documentation each item produced.

pub mod command;
pub mod config;
pub mod env;
mod error;
pub mod interpreter;
pub mod manifest;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod selection;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export error types at crate root
pub use error::{Error, Result};

// Re-export main types
pub use command::{CommandRunner, Invocation, SystemRunner};
pub use config::BoxConfig;
pub use env::EnvGuard;
pub use interpreter::Interpreter;
pub use manifest::Manifest;
pub use orchestrator::{Orchestrator, RunOptions, RunOutcome, RunReport};
pub use prompt::Prompter;
pub use provider::{
    Catalog, CatalogEntry, DocsEntry, Provider, ProviderContext, ProviderInfo, ProviderKind,
    SizeEstimate, Tier,
};
pub use selection::Selection;
