use std::path::{Path, PathBuf};

use devbox_core::{
    BoxConfig, DocsEntry, Error, Interpreter, Invocation, Provider, ProviderContext, ProviderInfo,
    ProviderKind, Result, SizeEstimate,
};
use devbox_provider_hg::HgRepository;
use tracing::warn;

use super::require_dir;
use crate::coverage::{Coverage, REPORT_DIR};

/// Catalog id.
pub const ID: &str = "coveragepy";

/// Default repository.
pub const URL: &str = "https://bitbucket.org/ned/coveragepy";

/// Clone of coverage.py.
///
/// Building is expensive: it builds the interpreter from the `cpython` item,
/// runs the whole test suite under coverage, writes the HTML report to
/// `coverage_report/` and finally `make distclean`s the interpreter tree.
/// Failing tests do not stop the report, and the tree is cleaned even when
/// an earlier step fails.
#[derive(Debug, Clone)]
pub struct CoveragePy {
    repo: HgRepository,
}

impl CoveragePy {
    /// Create the item, honouring a configured URL override.
    #[must_use]
    pub fn new(config: &BoxConfig) -> Self {
        let info = ProviderInfo::new(ID, "coverage.py", SizeEstimate::range(5, 133))
            .with_description("Clone of coverage.py (WARNING: building takes a while)")
            .with_docs(DocsEntry::new("coverage_report/index.html").with_link("coverage.html"));
        Self {
            repo: HgRepository::new(info, config.url_for(ID, URL)),
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| Error::io(e, Some(path.to_path_buf()), "resolving path"))
}

impl Provider for CoveragePy {
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
        let cpython_dir = ctx.path("cpython");
        if !cpython_dir.is_dir() {
            return Err(Error::missing_dependency(ID, "cpython", cpython_dir));
        }
        let coveragepy_dir = ctx.target_dir(self.info());
        require_dir(ID, &coveragepy_dir)?;
        let cpython_dir = absolute(&cpython_dir)?;

        let measured = measure(ctx, &cpython_dir, &absolute(&coveragepy_dir)?);

        ctx.prompter.say("Cleaning up the CPython build ...");
        let cleaned = ctx.runner.run(
            &Invocation::new(ctx.config.make())
                .arg("distclean")
                .current_dir(&cpython_dir),
        );
        if let (Err(_), Err(e)) = (&measured, &cleaned) {
            warn!(error = %e, "Could not clean the CPython build");
        }
        measured.and(cleaned)
    }
}

/// Build the interpreter and the tracer, run the suite and write the report.
fn measure(ctx: &ProviderContext<'_>, cpython_dir: &Path, coveragepy_dir: &Path) -> Result<()> {
    let python = Interpreter::new(cpython_dir).ensure_built(
        ctx.runner,
        ctx.config.make(),
        ctx.config.jobs(),
    )?;
    let coverage = Coverage::new(python, cpython_dir, coveragepy_dir);

    ctx.prompter.say("Compiling coverage.py extension(s) ...");
    ctx.runner.run(&coverage.build_extension())?;

    ctx.prompter.say("Running coverage ...");
    coverage.remove_data()?;
    match ctx.runner.run(&coverage.run(&[] as &[&str])) {
        Ok(()) => {}
        // Failing stdlib tests still leave usable coverage data.
        Err(e @ Error::CommandFailed { .. }) => {
            warn!(error = %e, "Test suite reported failures; reporting coverage anyway");
        }
        Err(e) => return Err(e),
    }

    ctx.prompter.say("Generating report ...");
    coverage.report(ctx.runner, &absolute(&ctx.path(REPORT_DIR))?)?;
    coverage.remove_data()
}
