use devbox_core::{
    BoxConfig, Provider, ProviderContext, ProviderInfo, ProviderKind, Result, SizeEstimate,
};
use devbox_provider_manual::{ensure_dir, request_download};
use devbox_provider_pypi::{DEFAULT_INDEX, PyPiClient};
use tracing::info;

/// Catalog id.
pub const ID: &str = "mercurial";

/// Project name on the package index.
const PROJECT: &str = "Mercurial";

/// Default TortoiseHg download page.
pub const TORTOISEHG_URL: &str = "http://tortoisehg.bitbucket.org/download/";

/// Latest Mercurial source release, plus TortoiseHg fetched by hand.
#[derive(Debug, Clone)]
pub struct Mercurial {
    info: ProviderInfo,
    index: String,
    tortoisehg_url: String,
}

impl Mercurial {
    /// Create the item. The package index and the TortoiseHg page can be
    /// overridden with the `pypi` and `tortoisehg` URL keys.
    #[must_use]
    pub fn new(config: &BoxConfig) -> Self {
        // Includes TortoiseHg for 32/64-bit Windows.
        let info = ProviderInfo::new(ID, "Mercurial", SizeEstimate::fetched(47))
            .with_description("Source release of Mercurial along with TortoiseHg")
            .with_directory("Mercurial");
        Self {
            info,
            index: config.url_for("pypi", DEFAULT_INDEX),
            tortoisehg_url: config.url_for("tortoisehg", TORTOISEHG_URL),
        }
    }
}

impl Provider for Mercurial {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::ManualDownload
    }

    fn create(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        let dir = ctx.target_dir(&self.info);
        ensure_dir(&dir)?;

        let client = PyPiClient::new(&self.index)?;
        let version = client.latest_version(PROJECT)?;
        let url = client.release_download_url(PROJECT, &version)?;
        info!(%version, %url, "Downloading Mercurial source release");
        ctx.prompter
            .say(&format!("Downloading Mercurial {version} from {url} ..."));
        client.download(&url, &dir)?;

        request_download(ctx, "TortoiseHg", &self.tortoisehg_url, &dir)
    }
}
