//! The built-in catalog, in creation order.
//!
//! `devguide` and `coveragepy` read files from `cpython` when building, so
//! they must stay after it.

use devbox_core::{
    BoxConfig, Catalog, CatalogEntry, Provider, ProviderInfo, ProviderKind, SizeEstimate, Tier,
};
use devbox_provider_manual::ManualDownload;

use crate::items::{CPython, CoveragePy, Devguide, Mercurial, Peps};

/// Catalog id of the Visual C++ installer.
pub const VISUAL_CPP: &str = "visualcpp";

/// Default Visual C++ Express download page.
pub const VISUAL_CPP_URL: &str = "http://www.microsoft.com/express/Downloads/";

fn cpython(config: &BoxConfig) -> Box<dyn Provider> {
    Box::new(CPython::new(config))
}

fn devguide(config: &BoxConfig) -> Box<dyn Provider> {
    Box::new(Devguide::new(config))
}

fn peps(config: &BoxConfig) -> Box<dyn Provider> {
    Box::new(Peps::new(config))
}

fn coveragepy(config: &BoxConfig) -> Box<dyn Provider> {
    Box::new(CoveragePy::new(config))
}

fn mercurial(config: &BoxConfig) -> Box<dyn Provider> {
    Box::new(Mercurial::new(config))
}

fn visual_cpp(config: &BoxConfig) -> Box<dyn Provider> {
    let info = ProviderInfo::new(VISUAL_CPP, "Visual C++ Express", SizeEstimate::fetched(4))
        .with_description("The Web installer for Visual C++ Express")
        .with_directory("Visual C++ Express");
    Box::new(ManualDownload::new(
        info,
        config.url_for(VISUAL_CPP, VISUAL_CPP_URL),
    ))
}

/// Every item devbox knows about.
#[must_use]
pub fn default_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    for entry in [
        CatalogEntry::new("cpython", ProviderKind::DistributedVcs, Tier::Minimum, cpython),
        CatalogEntry::new("devguide", ProviderKind::DistributedVcs, Tier::Minimum, devguide),
        CatalogEntry::new("peps", ProviderKind::CentralizedVcs, Tier::Minimum, peps),
        CatalogEntry::new("coveragepy", ProviderKind::DistributedVcs, Tier::Basic, coveragepy),
        CatalogEntry::new("mercurial", ProviderKind::ManualDownload, Tier::Full, mercurial),
        CatalogEntry::new(VISUAL_CPP, ProviderKind::ManualDownload, Tier::Full, visual_cpp),
    ] {
        catalog.register(entry);
    }
    catalog
}
