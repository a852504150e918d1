//! Browser-assisted manual download strategy for devbox.
//!
//! Some items (installers behind license pages, platform-specific binaries)
//! cannot be fetched unattended. For those we open the download page in the
//! user's browser and wait until they confirm the file is in place.

use std::path::Path;

use devbox_core::{
    BoxConfig, Error, Invocation, Provider, ProviderContext, ProviderInfo, ProviderKind, Result,
};
use tracing::{debug, warn};

/// Browser opener for the current platform, used when no `browser` is configured.
#[must_use]
pub fn default_opener() -> Vec<String> {
    if cfg!(windows) {
        vec!["cmd".into(), "/C".into(), "start".into(), String::new()]
    } else if cfg!(target_os = "macos") {
        vec!["open".into()]
    } else {
        vec!["xdg-open".into()]
    }
}

/// The invocation that opens `url` under `config`.
#[must_use]
pub fn browser_invocation(config: &BoxConfig, url: &str) -> Invocation {
    let opener = config.browser.clone().unwrap_or_else(default_opener);
    let mut parts = opener.into_iter();
    let program = parts.next().unwrap_or_else(|| "xdg-open".to_string());
    Invocation::new(program).args(parts).arg(url)
}

/// Open `url` in a browser. Failing to launch one is logged, never returned:
/// the user can still open the page by hand from the prompt that follows.
pub fn open_browser(ctx: &ProviderContext<'_>, url: &str) {
    let invocation = browser_invocation(ctx.config, url);
    match ctx.runner.run(&invocation) {
        Ok(()) => debug!(url, "Opened browser"),
        Err(e) => warn!(url, error = %e, "Could not open a browser"),
    }
}

/// Open `url` and block until the user says `what` has been saved into `dir`.
///
/// # Errors
///
/// Returns an error if the acknowledgement cannot be read.
pub fn request_download(
    ctx: &ProviderContext<'_>,
    what: &str,
    url: &str,
    dir: &Path,
) -> Result<()> {
    open_browser(ctx, url);
    ctx.prompter.pause(&format!(
        "Download {what} from {url} and put in {}",
        dir.display()
    ))
}

/// Create `dir` if needed.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::io(e, Some(dir.to_path_buf()), "creating download directory"))
}

/// An item the user downloads by hand from a web page.
#[derive(Debug, Clone)]
pub struct ManualDownload {
    info: ProviderInfo,
    url: String,
}

impl ManualDownload {
    /// Create a provider pointing the user at `url`.
    #[must_use]
    pub fn new(info: ProviderInfo, url: impl Into<String>) -> Self {
        Self {
            info,
            url: url.into(),
        }
    }

    /// Download page.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Provider for ManualDownload {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::ManualDownload
    }

    fn create(&self, ctx: &ProviderContext<'_>) -> Result<()> {
        let dir = ctx.target_dir(&self.info);
        ensure_dir(&dir)?;
        request_download(ctx, &self.info.name, &self.url, &dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devbox_core::SizeEstimate;
    use devbox_core::test_utils::{RecordingRunner, ScriptedPrompter};
    use tempfile::TempDir;

    fn visual_cpp() -> ManualDownload {
        ManualDownload::new(
            ProviderInfo::new("visualcpp", "Visual C++ Express", SizeEstimate::fetched(4))
                .with_directory("Visual C++ Express"),
            "http://www.microsoft.com/express/Downloads/",
        )
    }

    #[test]
    fn test_browser_invocation_uses_configured_opener() {
        let config = BoxConfig::from_toml_str("browser = [\"firefox\", \"--new-tab\"]\n").unwrap();
        let inv = browser_invocation(&config, "http://example.org/");
        assert_eq!(inv.program(), "firefox");
        assert_eq!(inv.args_lossy(), vec!["--new-tab", "http://example.org/"]);
    }

    #[test]
    fn test_browser_invocation_defaults_per_platform() {
        let inv = browser_invocation(&BoxConfig::default(), "http://example.org/");
        assert_eq!(inv.program(), default_opener()[0].as_str());
        assert_eq!(
            inv.args_lossy().last().map(String::as_str),
            Some("http://example.org/")
        );
    }

    #[test]
    fn test_create_opens_browser_and_waits() {
        let temp = TempDir::new().unwrap();
        let config = BoxConfig::from_toml_str("browser = [\"browser\"]\n").unwrap();
        let runner = RecordingRunner::new();
        let prompter = ScriptedPrompter::always_yes();
        let ctx = ProviderContext::new(temp.path(), &runner, &prompter, &config);

        visual_cpp().create(&ctx).unwrap();

        let dir = temp.path().join("Visual C++ Express");
        assert!(dir.is_dir());
        assert_eq!(
            runner.command_lines(),
            vec!["browser http://www.microsoft.com/express/Downloads/"]
        );
        let pauses = prompter.pauses();
        assert_eq!(pauses.len(), 1);
        assert!(
            pauses[0].starts_with("Download Visual C++ Express from http://www.microsoft.com/")
        );
        assert!(pauses[0].ends_with(&dir.display().to_string()));
    }

    #[test]
    fn test_browser_failure_is_ignored() {
        let temp = TempDir::new().unwrap();
        let config = BoxConfig::default();
        let runner = RecordingRunner::new().fail_when(|_| true, 3);
        let prompter = ScriptedPrompter::always_yes();
        let ctx = ProviderContext::new(temp.path(), &runner, &prompter, &config);

        visual_cpp().create(&ctx).unwrap();
        assert_eq!(prompter.pauses().len(), 1);
    }

    #[test]
    fn test_create_again_only_prompts_again() {
        let temp = TempDir::new().unwrap();
        let config = BoxConfig::default();
        let runner = RecordingRunner::new();
        let prompter = ScriptedPrompter::always_yes();
        let ctx = ProviderContext::new(temp.path(), &runner, &prompter, &config);

        let item = visual_cpp();
        item.create(&ctx).unwrap();
        item.create(&ctx).unwrap();
        assert_eq!(prompter.pauses().len(), 2);
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_update_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let config = BoxConfig::default();
        let runner = RecordingRunner::new();
        let prompter = ScriptedPrompter::always_yes();
        let ctx = ProviderContext::new(temp.path(), &runner, &prompter, &config);

        visual_cpp().update(&ctx).unwrap();
        assert!(runner.invocations().is_empty());
        assert!(!visual_cpp().kind().supports_update());
    }
}
