//! End-to-end tests for the scaffold pipeline.
//!
//! These drive `ScaffoldInstaller` against a mock registry serving a real
//! template tarball, with a recording runner standing in for the package
//! managers.

use std::fs;

use flate2::write::GzEncoder;
use flate2::Compression;
use httpmock::prelude::*;
use semver::Version;
use tempfile::TempDir;

use gantry::cache::PackageCache;
use gantry::error::GantryError;
use gantry::project::{ProjectInfo, ProjectKind};
use gantry::registry::{RegistryClient, TemplateDescriptor, TemplateKind};
use gantry::scaffold::{InstallState, ScaffoldInstaller, ScaffoldOutcome};
use gantry::shell::RecordingRunner;
use gantry::ui::MockUI;

fn make_tarball(files: &[(&str, &str)]) -> Vec<u8> {
    let gz = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(gz);

    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, path, content.as_bytes())
            .unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap()
}

/// Serve a vue-flavored template package at 1.0.0 from the mock server.
fn mock_template_package(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/gantry-template-vue3");
        then.status(200).json_body(serde_json::json!({
            "versions": {
                "1.0.0": {
                    "dist": { "tarball": server.url("/tarballs/vue3-1.0.0.tgz") }
                }
            }
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/tarballs/vue3-1.0.0.tgz");
        then.status(200).body(make_tarball(&[
            (
                "package/package.json",
                r#"{"name": "gantry-template-vue3", "version": "1.0.0"}"#,
            ),
            (
                "package/template/package.json",
                r#"{"name": "${projectName}", "version": "${version}"}"#,
            ),
            (
                "package/template/index.html",
                "<title>${projectName}</title>",
            ),
            ("package/template/public/raw.html", "<b>${projectName}</b>"),
        ]));
    });
}

fn descriptor(install: Option<&str>, start: Option<&str>) -> TemplateDescriptor {
    TemplateDescriptor {
        name: "vue3 standard".to_string(),
        npm_name: "gantry-template-vue3".to_string(),
        version: "1.0.0".to_string(),
        kind: TemplateKind::Normal,
        tags: vec!["project".to_string()],
        ignore: vec!["**/public/**".to_string()],
        install_command: install.map(|s| s.to_string()),
        start_command: start.map(|s| s.to_string()),
    }
}

fn project_info() -> ProjectInfo {
    ProjectInfo {
        kind: ProjectKind::Project,
        name: "my-app".to_string(),
        version: Version::parse("1.0.0").unwrap(),
        template: "gantry-template-vue3".to_string(),
        description: None,
    }
}

#[test]
fn pipeline_completes_and_runs_install_command() {
    let server = MockServer::start();
    mock_template_package(&server);

    let store = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let cache = PackageCache::new(store.path(), RegistryClient::new(server.base_url()));
    let runner = RecordingRunner::new();
    let mut ui = MockUI::new();

    let mut installer = ScaffoldInstaller::new(&cache, &runner, target.path(), false);
    let outcome = installer
        .run(&mut ui, &descriptor(Some("npm install"), None), &project_info())
        .unwrap();

    assert_eq!(outcome, ScaffoldOutcome::Completed);
    assert_eq!(installer.state(), InstallState::Done);

    // Rendered files carry the project data.
    assert_eq!(
        fs::read_to_string(target.path().join("package.json")).unwrap(),
        r#"{"name": "my-app", "version": "1.0.0"}"#
    );
    assert_eq!(
        fs::read_to_string(target.path().join("index.html")).unwrap(),
        "<title>my-app</title>"
    );

    // Exactly the install command ran, in the target directory.
    let commands = runner.commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].0, "npm install");
    assert_eq!(commands[0].1, target.path());

    assert!(!ui.successes().is_empty());
}

#[test]
fn ignored_files_are_copied_verbatim() {
    let server = MockServer::start();
    mock_template_package(&server);

    let store = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let cache = PackageCache::new(store.path(), RegistryClient::new(server.base_url()));
    let runner = RecordingRunner::new();
    let mut ui = MockUI::new();

    let mut installer = ScaffoldInstaller::new(&cache, &runner, target.path(), false);
    installer
        .run(&mut ui, &descriptor(Some("npm install"), None), &project_info())
        .unwrap();

    // The public/ glob kept the placeholder untouched.
    assert_eq!(
        fs::read_to_string(target.path().join("public/raw.html")).unwrap(),
        "<b>${projectName}</b>"
    );
}

#[test]
fn start_command_runs_after_install() {
    let server = MockServer::start();
    mock_template_package(&server);

    let store = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let cache = PackageCache::new(store.path(), RegistryClient::new(server.base_url()));
    let runner = RecordingRunner::new();
    let mut ui = MockUI::new();

    let mut installer = ScaffoldInstaller::new(&cache, &runner, target.path(), false);
    installer
        .run(
            &mut ui,
            &descriptor(Some("npm install"), Some("npm run serve")),
            &project_info(),
        )
        .unwrap();

    let commands: Vec<String> = runner.commands().into_iter().map(|(c, _)| c).collect();
    assert_eq!(commands, vec!["npm install", "npm run serve"]);
}

#[test]
fn declining_confirmation_aborts_without_touching_target() {
    let server = MockServer::start();
    mock_template_package(&server);

    let store = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    fs::write(target.path().join("precious.txt"), "keep me").unwrap();

    let cache = PackageCache::new(store.path(), RegistryClient::new(server.base_url()));
    let runner = RecordingRunner::new();
    // Confirm prompts default to "no"; an unconfigured MockUI declines.
    let mut ui = MockUI::new();

    let mut installer = ScaffoldInstaller::new(&cache, &runner, target.path(), false);
    let outcome = installer
        .run(&mut ui, &descriptor(Some("npm install"), None), &project_info())
        .unwrap();

    assert_eq!(outcome, ScaffoldOutcome::Aborted);
    assert_eq!(
        fs::read_to_string(target.path().join("precious.txt")).unwrap(),
        "keep me"
    );
    assert!(runner.commands().is_empty());
}

#[test]
fn force_empties_target_without_prompting() {
    let server = MockServer::start();
    mock_template_package(&server);

    let store = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    fs::write(target.path().join("stale.txt"), "old").unwrap();

    let cache = PackageCache::new(store.path(), RegistryClient::new(server.base_url()));
    let runner = RecordingRunner::new();
    let mut ui = MockUI::new();

    let mut installer = ScaffoldInstaller::new(&cache, &runner, target.path(), true);
    let outcome = installer
        .run(&mut ui, &descriptor(Some("npm install"), None), &project_info())
        .unwrap();

    assert_eq!(outcome, ScaffoldOutcome::Completed);
    assert!(ui.prompts_shown().is_empty());
    assert!(!target.path().join("stale.txt").exists());
    assert!(target.path().join("index.html").exists());
}

#[test]
fn missing_install_command_fails_before_running_anything() {
    let server = MockServer::start();
    mock_template_package(&server);

    let store = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let cache = PackageCache::new(store.path(), RegistryClient::new(server.base_url()));
    let runner = RecordingRunner::new();
    let mut ui = MockUI::new();

    let mut installer = ScaffoldInstaller::new(&cache, &runner, target.path(), false);
    let result = installer.run(&mut ui, &descriptor(None, None), &project_info());

    assert!(matches!(
        result,
        Err(GantryError::InstallCommandMissing { .. })
    ));
    assert_eq!(installer.state(), InstallState::Failed);
    assert!(runner.commands().is_empty());
}

#[test]
fn non_whitelisted_install_command_is_rejected() {
    let server = MockServer::start();
    mock_template_package(&server);

    let store = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let cache = PackageCache::new(store.path(), RegistryClient::new(server.base_url()));
    let runner = RecordingRunner::new();
    let mut ui = MockUI::new();

    let mut installer = ScaffoldInstaller::new(&cache, &runner, target.path(), false);
    let result = installer.run(
        &mut ui,
        &descriptor(Some("rm -rf /"), None),
        &project_info(),
    );

    assert!(matches!(
        result,
        Err(GantryError::CommandNotWhitelisted { .. })
    ));
    assert!(runner.commands().is_empty());
}

#[test]
fn failed_install_command_fails_the_pipeline() {
    let server = MockServer::start();
    mock_template_package(&server);

    let store = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let cache = PackageCache::new(store.path(), RegistryClient::new(server.base_url()));
    let runner = RecordingRunner::failing_on("install");
    let mut ui = MockUI::new();

    let mut installer = ScaffoldInstaller::new(&cache, &runner, target.path(), false);
    let result = installer.run(
        &mut ui,
        &descriptor(Some("npm install"), Some("npm run serve")),
        &project_info(),
    );

    assert!(matches!(result, Err(GantryError::CommandFailed { .. })));
    assert_eq!(installer.state(), InstallState::Failed);
    // The start command never ran.
    assert_eq!(runner.commands().len(), 1);
}
