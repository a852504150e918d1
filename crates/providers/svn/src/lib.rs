//! Subversion acquisition strategy for devbox.

use devbox_core::{
    Error, Invocation, Provider, ProviderContext, ProviderInfo, ProviderKind, Result,
};
use tracing::info;

/// A provider backed by a Subversion checkout.
#[derive(Debug, Clone)]
pub struct SvnCheckout {
    info: ProviderInfo,
    url: String,
}

impl SvnCheckout {
    /// Create a provider checking out `url` into `info.directory`.
    #[must_use]
    pub fn new(info: ProviderInfo, url: impl Into<String>) -> Self {
        Self {
            info,
            url: url.into(),
        }
    }

    /// Checkout URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn svn_update(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        let dir = ctx.target_dir(&self.info);
        ctx.runner.run(
            &Invocation::new(ctx.config.svn())
                .arg("update")
                .arg(dir.as_os_str()),
        )
    }
}

impl Provider for SvnCheckout {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::CentralizedVcs
    }

    fn create(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        let dir = ctx.target_dir(&self.info);
        if dir.is_dir() {
            info!(provider = self.info.id, "Checkout exists; updating instead");
            return self.svn_update(ctx);
        }

        ctx.runner.run(
            &Invocation::new(ctx.config.svn())
                .arg("checkout")
                .arg(&self.url)
                .arg(dir.as_os_str()),
        )
    }

    fn update(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        let dir = ctx.target_dir(&self.info);
        if !dir.is_dir() {
            return Err(Error::not_created(self.info.id, dir));
        }
        self.svn_update(ctx)
    }
}
