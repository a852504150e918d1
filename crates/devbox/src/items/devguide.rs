use devbox_core::{
    BoxConfig, DocsEntry, EnvGuard, Error, Invocation, Provider, ProviderContext, ProviderInfo,
    ProviderKind, Result, SizeEstimate,
};
use devbox_provider_hg::HgRepository;
use tracing::debug;

use super::require_dir;

/// Catalog id.
pub const ID: &str = "devguide";

/// Default repository.
pub const URL: &str = "http://hg.python.org/devguide";

/// Where CPython keeps its documentation toolchain, relative to the box root.
const TOOLS_DIR: &str = "cpython/Doc/tools";

/// Clone of the developer's guide.
///
/// The guide is rendered with the Sphinx that CPython's own docs build
/// fetched, so building requires a created `cpython` item.
#[derive(Debug, Clone)]
pub struct Devguide {
    repo: HgRepository,
}

impl Devguide {
    /// Create the item, honouring a configured URL override.
    #[must_use]
    pub fn new(config: &BoxConfig) -> Self {
        let info = ProviderInfo::new(ID, "Devguide", SizeEstimate::range(1, 4))
            .with_description("Clone of the Python Developer's Guide")
            .with_docs(
                DocsEntry::new("devguide/_build/html/index.html").with_link("devguide.html"),
            );
        Self {
            repo: HgRepository::new(info, config.url_for(ID, URL)),
        }
    }
}

impl Provider for Devguide {
    fn info(&self) -> &ProviderInfo {
        self.repo.info()
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::DistributedVcs
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["cpython"]
    }

    fn create(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        self.repo.create(ctx)
    }

    fn update(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        self.repo.update(ctx)
    }

    fn build(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        let tools = ctx.path(TOOLS_DIR);
        if !tools.is_dir() {
            return Err(Error::missing_dependency(ID, "cpython", tools));
        }
        let dir = ctx.target_dir(self.info());
        require_dir(ID, &dir)?;

        let tools = std::path::absolute(&tools)
            .map_err(|e| Error::io(e, Some(tools.clone()), "resolving Sphinx tools"))?;
        let sphinx_build = tools.join("sphinx-build.py");
        debug!(tools = %tools.display(), "Building with CPython's Sphinx");

        // Process-wide until `_env` drops.
        let _env = EnvGuard::new()
            .set("PYTHONPATH", &tools)
            .set("SPHINXBUILD", format!("python {}", sphinx_build.display()));
        ctx.runner.run(
            &Invocation::new(ctx.config.make())
                .arg("html")
                .current_dir(dir),
        )
    }
}
