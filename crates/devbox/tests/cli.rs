//! Binary-level tests that need neither network nor VCS clients.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn devbox(root: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("devbox").unwrap();
    cmd.env_remove("DEVBOX_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--root")
        .arg(root);
    cmd
}

#[test]
fn version_prints_package_version() {
    let temp = TempDir::new().unwrap();
    devbox(temp.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "devbox {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn list_shows_catalog() {
    let temp = TempDir::new().unwrap();
    devbox(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("cpython"))
        .stdout(predicate::str::contains("Visual C++ Express"));
}

#[test]
fn declining_the_estimate_exits_cleanly() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("box");
    devbox(&root)
        .args(["create", "--minimum"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The requested Box will be about 260 MB. OK? [y/n]",
        ))
        .stdout(predicate::str::contains("Aborted."));
    assert!(!root.exists());
}

#[test]
fn closed_stdin_declines() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("box");
    devbox(&root)
        .args(["create", "--basic", "--build"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("about 482 MB"));
    assert!(!root.exists());
}

#[test]
fn conflicting_selections_are_rejected() {
    let temp = TempDir::new().unwrap();
    devbox(temp.path())
        .args(["create", "--all", "--minimum"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_suite_requires_a_built_interpreter() {
    let temp = TempDir::new().unwrap();
    devbox(temp.path())
        .arg("test")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("CPython is not built"));
}

#[test]
fn coverage_requires_a_built_interpreter() {
    let temp = TempDir::new().unwrap();
    devbox(temp.path())
        .args(["coverage", "html"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("CPython is not built"));
}

#[test]
fn update_with_nothing_fetched() {
    let temp = TempDir::new().unwrap();
    devbox(temp.path())
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to update."));
}

#[test]
fn update_of_unknown_item_fails() {
    let temp = TempDir::new().unwrap();
    devbox(temp.path())
        .args(["update", "pypy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown provider `pypy`"));
}

#[test]
fn invalid_configuration_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("devbox.toml"), "colour = \"blue\"\n").unwrap();
    devbox(temp.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
