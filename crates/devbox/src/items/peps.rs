use devbox_core::{
    BoxConfig, DocsEntry, Invocation, Provider, ProviderContext, ProviderInfo, ProviderKind,
    Result, SizeEstimate,
};
use devbox_provider_svn::SvnCheckout;

use super::require_dir;

/// Catalog id.
pub const ID: &str = "peps";

/// Default checkout URL.
pub const URL: &str = "http://svn.python.org/projects/peps/trunk/";

/// Checkout of the Python Enhancement Proposals, rendered to HTML by `make`.
#[derive(Debug, Clone)]
pub struct Peps {
    checkout: SvnCheckout,
}

impl Peps {
    /// Create the item, honouring a configured URL override.
    #[must_use]
    pub fn new(config: &BoxConfig) -> Self {
        let info = ProviderInfo::new(ID, "PEPs", SizeEstimate::range(14, 20))
            .with_description("Checkout of the Python Enhancement Proposals (for PEPs 7 & 8)")
            .with_docs(DocsEntry::new("peps/pep-0000.html").with_link("peps.html"));
        Self {
            checkout: SvnCheckout::new(info, config.url_for(ID, URL)),
        }
    }
}

impl Provider for Peps {
    fn info(&self) -> &ProviderInfo {
        self.checkout.info()
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::CentralizedVcs
    }

    fn create(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        self.checkout.create(ctx)
    }

    fn update(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        self.checkout.update(ctx)
    }

    fn build(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        let dir = ctx.target_dir(self.info());
        require_dir(ID, &dir)?;
        ctx.runner
            .run(&Invocation::new(ctx.config.make()).current_dir(dir))
    }
}
