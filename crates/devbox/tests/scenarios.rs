//! End-to-end runs of the built-in catalog with recorded commands.

use std::path::Path;

use devbox::default_catalog;
use devbox_core::manifest::MANIFEST_FILE;
use devbox_core::test_utils::{RecordingRunner, ScriptedPrompter};
use devbox_core::{BoxConfig, Error, Orchestrator, RunOptions, RunOutcome, Selection};
use tempfile::TempDir;

fn config() -> BoxConfig {
    BoxConfig::from_toml_str("browser = [\"browser\"]\njobs = 2\n").unwrap()
}

fn directories(root: &Path) -> Vec<String> {
    let mut dirs: Vec<String> = std::fs::read_dir(root)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    dirs.sort();
    dirs
}

fn manifest_docs(root: &Path) -> Vec<String> {
    std::fs::read_to_string(root.join(MANIFEST_FILE))
        .unwrap()
        .lines()
        .filter(|line| line.starts_with("  "))
        .map(|line| line.trim().to_string())
        .collect()
}

#[test]
fn minimum_box_creates_three_directories() {
    let temp = TempDir::new().unwrap();
    let catalog = default_catalog();
    let config = config();
    let runner = RecordingRunner::new().materializing_checkouts();
    let prompter = ScriptedPrompter::always_yes();

    let ids = Selection::Minimum.resolve(&catalog);
    let orchestrator = Orchestrator::new(&catalog, &config, temp.path(), &runner, &prompter);
    let outcome = orchestrator.create(&ids, RunOptions::default()).unwrap();

    assert!(matches!(outcome, RunOutcome::Completed(_)));
    assert_eq!(directories(temp.path()), vec!["cpython", "devguide", "peps"]);
    assert_eq!(runner.count("browser"), 0);
    assert!(prompter.pauses().is_empty());

    let docs = manifest_docs(temp.path());
    assert!(docs.len() <= 3);
    assert!(docs.contains(&"peps/pep-0000.html".to_string()));
}

#[test]
fn failing_clone_stops_before_the_next_item() {
    let temp = TempDir::new().unwrap();
    let catalog = default_catalog();
    let config = config();
    let runner = RecordingRunner::new().materializing_checkouts().fail_when(
        |inv| {
            inv.program() == "hg"
                && inv
                    .args_lossy()
                    .iter()
                    .any(|a| a == "http://hg.python.org/devguide")
        },
        255,
    );
    let prompter = ScriptedPrompter::always_yes();

    let ids = Selection::Minimum.resolve(&catalog);
    let orchestrator = Orchestrator::new(&catalog, &config, temp.path(), &runner, &prompter);
    let err = orchestrator.create(&ids, RunOptions::default()).unwrap_err();

    assert_eq!(err.exit_code(), 255);
    assert_eq!(runner.count("svn"), 0);
    assert!(!temp.path().join(MANIFEST_FILE).exists());
    assert!(!temp.path().join("peps").exists());
}

#[test]
fn basic_box_never_opens_a_browser() {
    let temp = TempDir::new().unwrap();
    let catalog = default_catalog();
    let config = config();
    let runner = RecordingRunner::new().materializing_checkouts();
    let prompter = ScriptedPrompter::always_yes();

    let ids = Selection::Basic.resolve(&catalog);
    let orchestrator = Orchestrator::new(&catalog, &config, temp.path(), &runner, &prompter);
    let RunOutcome::Completed(report) = orchestrator.create(&ids, RunOptions::default()).unwrap()
    else {
        panic!("run should complete");
    };

    assert_eq!(report.created, vec!["cpython", "devguide", "peps", "coveragepy"]);
    assert_eq!(runner.count("browser"), 0);
    assert!(prompter.pauses().is_empty());
    assert_eq!(prompter.confirm_calls(), 1);
}

#[test]
fn declining_the_estimate_leaves_no_trace() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("box");
    let catalog = default_catalog();
    let config = config();
    let runner = RecordingRunner::new().materializing_checkouts();
    let prompter = ScriptedPrompter::always_no();

    let ids = Selection::Minimum.resolve(&catalog);
    let orchestrator = Orchestrator::new(&catalog, &config, &root, &runner, &prompter);
    let outcome = orchestrator.create(&ids, RunOptions::default()).unwrap();

    assert_eq!(outcome, RunOutcome::Declined { total_size: 260 });
    assert_eq!(
        prompter.questions(),
        vec!["The requested Box will be about 260 MB. OK? [y/n] "]
    );
    assert!(!root.exists());
    assert!(runner.invocations().is_empty());
}

#[test]
fn devguide_build_without_cpython_fails_clearly() {
    let temp = TempDir::new().unwrap();
    let catalog = default_catalog();
    let config = config();
    let runner = RecordingRunner::new().materializing_checkouts();
    let prompter = ScriptedPrompter::always_yes();

    let orchestrator = Orchestrator::new(&catalog, &config, temp.path(), &runner, &prompter);
    let options = RunOptions {
        build: true,
        assume_yes: true,
    };
    let err = orchestrator.create(&["devguide"], options).unwrap_err();

    assert!(matches!(
        err,
        Error::MissingDependency { ref requires, .. } if requires == "cpython"
    ));
    assert_eq!(runner.count("make"), 0);
    assert!(!temp.path().join(MANIFEST_FILE).exists());
}

#[test]
fn coverage_build_without_cpython_fails_clearly() {
    let temp = TempDir::new().unwrap();
    let catalog = default_catalog();
    let config = config();
    let runner = RecordingRunner::new().materializing_checkouts();
    let prompter = ScriptedPrompter::always_yes();

    let orchestrator = Orchestrator::new(&catalog, &config, temp.path(), &runner, &prompter);
    let options = RunOptions {
        build: true,
        assume_yes: true,
    };
    let err = orchestrator.create(&["coveragepy"], options).unwrap_err();
    assert!(matches!(err, Error::MissingDependency { .. }));
    assert_eq!(runner.count("./configure"), 0);
}

#[test]
fn running_create_twice_updates_in_place() {
    let temp = TempDir::new().unwrap();
    let catalog = default_catalog();
    let config = config();
    let runner = RecordingRunner::new().materializing_checkouts();
    let prompter = ScriptedPrompter::always_yes();

    let ids = Selection::Minimum.resolve(&catalog);
    let orchestrator = Orchestrator::new(&catalog, &config, temp.path(), &runner, &prompter);
    orchestrator.create(&ids, RunOptions::default()).unwrap();
    orchestrator.create(&ids, RunOptions::default()).unwrap();

    let lines = runner.command_lines();
    assert_eq!(lines.iter().filter(|l| l.starts_with("hg clone")).count(), 2);
    assert_eq!(lines.iter().filter(|l| l.starts_with("hg pull -u")).count(), 2);
    assert_eq!(lines.iter().filter(|l| l.starts_with("svn checkout")).count(), 1);
    assert_eq!(lines.iter().filter(|l| l.starts_with("svn update")).count(), 1);
    assert_eq!(directories(temp.path()), vec!["cpython", "devguide", "peps"]);
}

#[cfg(unix)]
#[test]
fn minimum_build_links_generated_docs() {
    temp_env::with_vars_unset(["SPHINXBUILD", "PYTHONPATH"], || {
        let temp = TempDir::new().unwrap();
        let catalog = default_catalog();
        let config = config();
        let runner = RecordingRunner::new()
            .materializing_checkouts()
            // `make checkout` in cpython/Doc fetches the Sphinx tools.
            .on(
                |inv| inv.program() == "make" && inv.args_lossy() == ["checkout"],
                |inv| std::fs::create_dir_all(inv.get_current_dir().unwrap().join("tools")),
            )
            .on(
                |inv| inv.program() == "make" && inv.get_args().is_empty(),
                |inv| std::fs::write(inv.get_current_dir().unwrap().join("pep-0000.html"), ""),
            )
            .on(
                |inv| {
                    inv.program() == "make"
                        && inv.args_lossy() == ["html"]
                        && inv.get_current_dir().is_some_and(|d| d.ends_with("devguide"))
                },
                |inv| {
                    let html = inv.get_current_dir().unwrap().join("_build/html");
                    std::fs::create_dir_all(&html)?;
                    let sphinx = std::env::var("SPHINXBUILD").unwrap_or_default();
                    std::fs::write(html.join("index.html"), sphinx)
                },
            );
        let prompter = ScriptedPrompter::always_yes();

        let ids = Selection::Minimum.resolve(&catalog);
        let orchestrator = Orchestrator::new(&catalog, &config, temp.path(), &runner, &prompter);
        let options = RunOptions {
            build: true,
            assume_yes: true,
        };
        let RunOutcome::Completed(report) = orchestrator.create(&ids, options).unwrap() else {
            panic!("run should complete");
        };

        assert_eq!(report.built, vec!["cpython", "devguide", "peps"]);
        assert_eq!(
            report.links,
            vec![temp.path().join("devguide.html"), temp.path().join("peps.html")]
        );

        // The Sphinx override was visible during the build only.
        let index = std::fs::read_to_string(temp.path().join("devguide.html")).unwrap();
        assert!(index.starts_with("python "));
        assert!(index.ends_with("cpython/Doc/tools/sphinx-build.py"));
        assert!(std::env::var_os("SPHINXBUILD").is_none());
        assert!(std::env::var_os("PYTHONPATH").is_none());
    });
}

/// A runner whose `make -s -j N` leaves a `python` executable behind.
#[cfg(unix)]
fn building_interpreter(runner: RecordingRunner) -> RecordingRunner {
    runner.on(
        |inv| inv.program() == "make" && inv.args_lossy().first().is_some_and(|a| a == "-s"),
        |inv| std::fs::write(inv.get_current_dir().unwrap().join("python"), ""),
    )
}

#[cfg(unix)]
fn coverage_lines(runner: &RecordingRunner) -> Vec<String> {
    runner
        .command_lines()
        .into_iter()
        .skip_while(|line| !line.starts_with("./configure"))
        .collect()
}

#[cfg(unix)]
#[test]
fn coverage_build_runs_every_step_in_order() {
    let temp = TempDir::new().unwrap();
    let catalog = default_catalog();
    let config = config();
    let runner = building_interpreter(RecordingRunner::new().materializing_checkouts());
    let prompter = ScriptedPrompter::always_yes();

    let orchestrator = Orchestrator::new(&catalog, &config, temp.path(), &runner, &prompter);
    let options = RunOptions {
        build: true,
        assume_yes: true,
    };
    let outcome = orchestrator.create(&["cpython", "coveragepy"], options).unwrap();
    let RunOutcome::Completed(report) = outcome else {
        panic!("run should complete");
    };
    assert_eq!(report.built, vec!["cpython", "coveragepy"]);

    let lines = coverage_lines(&runner);
    assert_eq!(lines.len(), 6, "{lines:#?}");
    assert_eq!(lines[0], "./configure --prefix=/dev/null --with-pydebug");
    assert_eq!(lines[1], "make -s -j 2");
    assert!(lines[2].ends_with("python setup.py build_ext --inplace"));
    assert!(lines[3].ends_with("run --pylib Lib/test/regrtest.py"));
    assert!(lines[4].contains(" html -i -d "));
    assert!(lines[4].ends_with("coverage_report --omit Lib/test/*"));
    assert_eq!(lines[5], "make distclean");
}

#[cfg(unix)]
#[test]
fn failing_stdlib_tests_still_produce_a_report() {
    let temp = TempDir::new().unwrap();
    let catalog = default_catalog();
    let config = config();
    let runner = building_interpreter(RecordingRunner::new().materializing_checkouts())
        .fail_when(|inv| inv.args_lossy().iter().any(|a| a == "--pylib"), 1);
    let prompter = ScriptedPrompter::always_yes();

    let orchestrator = Orchestrator::new(&catalog, &config, temp.path(), &runner, &prompter);
    let options = RunOptions {
        build: true,
        assume_yes: true,
    };
    let outcome = orchestrator.create(&["cpython", "coveragepy"], options).unwrap();

    assert!(matches!(outcome, RunOutcome::Completed(_)));
    let lines = coverage_lines(&runner);
    assert!(lines.iter().any(|l| l.contains(" html -i -d ")));
    assert_eq!(lines.last().map(String::as_str), Some("make distclean"));
    assert!(temp.path().join(MANIFEST_FILE).exists());
}

#[cfg(unix)]
#[test]
fn failed_coverage_build_still_cleans_the_interpreter_tree() {
    let temp = TempDir::new().unwrap();
    let catalog = default_catalog();
    let config = config();
    let runner = building_interpreter(RecordingRunner::new().materializing_checkouts())
        .fail_when(|inv| inv.args_lossy().iter().any(|a| a == "build_ext"), 3);
    let prompter = ScriptedPrompter::always_yes();

    let orchestrator = Orchestrator::new(&catalog, &config, temp.path(), &runner, &prompter);
    let options = RunOptions {
        build: true,
        assume_yes: true,
    };
    let err = orchestrator
        .create(&["cpython", "coveragepy"], options)
        .unwrap_err();

    assert_eq!(err.exit_code(), 3);
    let lines = coverage_lines(&runner);
    assert!(!lines.iter().any(|l| l.contains("--pylib")));
    assert_eq!(lines.last().map(String::as_str), Some("make distclean"));
    assert!(!temp.path().join(MANIFEST_FILE).exists());
}
