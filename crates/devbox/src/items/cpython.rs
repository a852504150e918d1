use devbox_core::{
    BoxConfig, DocsEntry, Invocation, Provider, ProviderContext, ProviderInfo, ProviderKind,
    Result, SizeEstimate,
};
use devbox_provider_hg::HgRepository;
use tracing::info;

use super::require_dir;

/// Catalog id.
pub const ID: &str = "cpython";

/// Default repository.
pub const URL: &str = "http://hg.python.org/cpython";

/// Clone of CPython plus the tools its documentation build needs.
///
/// Building renders the documentation only; the interpreter itself is built
/// on demand by `devbox build-python`.
#[derive(Debug, Clone)]
pub struct CPython {
    repo: HgRepository,
}

impl CPython {
    /// Create the item, honouring a configured URL override.
    #[must_use]
    pub fn new(config: &BoxConfig) -> Self {
        let info = ProviderInfo::new(ID, "CPython", SizeEstimate::range(245, 325))
            .with_description("Clone of CPython (and requisite tools to build the documentation)")
            .with_docs(DocsEntry::new("cpython/Doc/build/html/index.html"));
        Self {
            repo: HgRepository::new(info, config.url_for(ID, URL)),
        }
    }
}

impl Provider for CPython {
    fn info(&self) -> &ProviderInfo {
        self.repo.info()
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::DistributedVcs
    }

    fn create(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        self.repo.create(ctx)?;

        // Sphinx and friends are fetched by the docs Makefile.
        let doc_dir = ctx.target_dir(self.info()).join("Doc");
        info!("Fetching documentation tools");
        ctx.runner.run(
            &Invocation::new(ctx.config.make())
                .arg("checkout")
                .current_dir(doc_dir),
        )
    }

    fn update(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        self.repo.update(ctx)
    }

    fn build(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        let dir = ctx.target_dir(self.info());
        require_dir(ID, &dir)?;
        ctx.runner.run(
            &Invocation::new(ctx.config.make())
                .arg("html")
                .current_dir(dir.join("Doc")),
        )
    }
}
