//! Mercurial acquisition strategy for devbox.
//!
//! Clones a repository into the provider's directory on first use and pulls
//! with update on every later `create`, so re-running a box is safe.

use devbox_core::{
    Error, Invocation, Provider, ProviderContext, ProviderInfo, ProviderKind, Result,
};
use tracing::{debug, info};

/// A provider backed by a Mercurial repository.
///
/// Items that only need a clone use this directly; items with a build step
/// wrap it and delegate `create`/`update`.
#[derive(Debug, Clone)]
pub struct HgRepository {
    info: ProviderInfo,
    url: String,
}

impl HgRepository {
    /// Create a provider cloning `url` into `info.directory`.
    #[must_use]
    pub fn new(info: ProviderInfo, url: impl Into<String>) -> Self {
        Self {
            info,
            url: url.into(),
        }
    }

    /// Repository URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Provider for HgRepository {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::DistributedVcs
    }

    fn create(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        let hg = ctx.config.hg();
        let dir = ctx.target_dir(&self.info);

        if dir.is_dir() {
            info!(
                provider = self.info.id,
                dir = %dir.display(),
                "Repository already cloned; pulling instead"
            );
            return ctx.runner.run(
                &Invocation::new(hg)
                    .args(["pull", "-u"])
                    .arg(&self.url)
                    .current_dir(&dir),
            );
        }

        debug!(provider = self.info.id, url = %self.url, "Cloning");
        ctx.runner.run(
            &Invocation::new(hg)
                .arg("clone")
                .arg(&self.url)
                .arg(dir.as_os_str()),
        )
    }

    fn update(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        let dir = ctx.target_dir(&self.info);
        if !dir.is_dir() {
            return Err(Error::not_created(self.info.id, dir));
        }

        let hg = ctx.config.hg();
        ctx.runner
            .run(&Invocation::new(hg).arg("pull").current_dir(&dir))?;
        ctx.runner
            .run(&Invocation::new(hg).arg("update").current_dir(&dir))
    }
}
