//! Integration tests for CLI argument parsing.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gantry() -> Command {
    Command::new(cargo_bin("gantry"))
}

#[test]
fn cli_shows_help() {
    gantry()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("project scaffolding"));
}

#[test]
fn cli_shows_version() {
    gantry()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_no_args_prints_usage() {
    let home = TempDir::new().unwrap();
    gantry()
        .env("GANTRY_HOME", home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn cli_rejects_unknown_subcommand() {
    gantry().arg("publish").assert().failure();
}

#[test]
fn cli_generates_completions() {
    gantry()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gantry"));
}

#[test]
fn init_fails_fast_when_catalog_unreachable() {
    let home = TempDir::new().unwrap();
    gantry()
        .env("GANTRY_HOME", home.path())
        .env("GANTRY_CATALOG_URL", "http://127.0.0.1:1")
        .env("GANTRY_REGISTRY", "http://127.0.0.1:1")
        .env("CI", "1")
        .args(["init", "my-app"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_with_target_path_requires_an_entry_file() {
    let home = TempDir::new().unwrap();
    let pkg = TempDir::new().unwrap();
    std::fs::write(pkg.path().join("package.json"), r#"{"name": "x"}"#).unwrap();

    gantry()
        .env("GANTRY_HOME", home.path())
        .env("CI", "1")
        .args(["init", "my-app", "--target-path"])
        .arg(pkg.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("entry file"));
}
