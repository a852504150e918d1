//! The concrete items a box can contain.
//!
//! Plain clones and downloads are configured instances of the strategy
//! crates; items with their own build step wrap a strategy and delegate
//! acquisition to it.

mod coveragepy;
mod cpython;
mod devguide;
mod mercurial;
mod peps;

pub use coveragepy::CoveragePy;
pub use cpython::CPython;
pub use devguide::Devguide;
pub use mercurial::Mercurial;
pub use peps::Peps;

use std::path::Path;

use devbox_core::{Error, Result};

/// Fail with [`Error::NotCreated`] unless `dir` exists.
fn require_dir(provider: &str, dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(Error::not_created(provider, dir))
    }
}
