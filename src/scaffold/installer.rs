//! Scaffold pipeline.
//!
//! Drives one `init` run through its fixed stage order: check the target
//! directory, fetch the template package into the store, copy its
//! `template/` payload, render placeholders, then run the template's
//! declared commands. A user declining a confirmation aborts the run as a
//! normal outcome, not an error. Stage failures leave the target as-is;
//! no rollback is attempted.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::cache::{normalize_separators, PackageCache, PackageSpec};
use crate::error::{GantryError, Result};
use crate::project::ProjectInfo;
use crate::registry::{TemplateDescriptor, TemplateKind};
use crate::shell::{interpreter, CommandRunner};
use crate::ui::{Prompt, UserInterface};

use super::ignore::IgnoreSet;
use super::render::render_dir;

/// Where a scaffold run is in its pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    /// Nothing done yet.
    Idle,
    /// Target directory verified usable (empty or emptied).
    TargetChecked,
    /// Template package present in the local store.
    TemplateFetched,
    /// Template payload copied into the target.
    FilesCopied,
    /// Placeholders resolved in the target.
    Rendered,
    /// Declared commands finished.
    CommandsRun,
    /// Pipeline completed.
    Done,
    /// A stage failed; the target may be partially written.
    Failed,
}

/// How a scaffold run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldOutcome {
    /// All stages ran.
    Completed,
    /// The user declined a confirmation; nothing beyond the target check
    /// happened.
    Aborted,
}

/// One scaffold run.
pub struct ScaffoldInstaller<'a> {
    cache: &'a PackageCache,
    runner: &'a dyn CommandRunner,
    target_dir: PathBuf,
    force: bool,
    state: InstallState,
}

impl<'a> ScaffoldInstaller<'a> {
    pub fn new(
        cache: &'a PackageCache,
        runner: &'a dyn CommandRunner,
        target_dir: impl Into<PathBuf>,
        force: bool,
    ) -> Self {
        Self {
            cache,
            runner,
            target_dir: target_dir.into(),
            force,
            state: InstallState::Idle,
        }
    }

    /// Current pipeline stage.
    pub fn state(&self) -> InstallState {
        self.state
    }

    /// Run the full pipeline for `template` with the collected `info`.
    pub fn run(
        &mut self,
        ui: &mut dyn UserInterface,
        template: &TemplateDescriptor,
        info: &ProjectInfo,
    ) -> Result<ScaffoldOutcome> {
        match self.run_stages(ui, template, info) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.state = InstallState::Failed;
                Err(e)
            }
        }
    }

    fn run_stages(
        &mut self,
        ui: &mut dyn UserInterface,
        template: &TemplateDescriptor,
        info: &ProjectInfo,
    ) -> Result<ScaffoldOutcome> {
        if !self.check_target(ui)? {
            return Ok(ScaffoldOutcome::Aborted);
        }
        self.state = InstallState::TargetChecked;

        let cached = self.fetch_template(ui, template)?;
        self.state = InstallState::TemplateFetched;

        if template.kind == TemplateKind::Custom {
            return self.run_custom(template, info, &cached.cache_dir);
        }

        let copied = copy_template_payload(&cached.cache_dir, &self.target_dir)?;
        tracing::debug!("Copied {} files into {}", copied, self.target_dir.display());
        self.state = InstallState::FilesCopied;

        let ignore = IgnoreSet::new(&template.ignore);
        let rendered = render_dir(&self.target_dir, &ignore, &info.render_context())?;
        tracing::debug!("Rendered {} files", rendered);
        self.state = InstallState::Rendered;

        self.run_commands(ui, template)?;
        self.state = InstallState::CommandsRun;

        self.state = InstallState::Done;
        ui.success(&format!("Created {} from {}", info.name, template.name));
        Ok(ScaffoldOutcome::Completed)
    }

    /// Ensure the target directory exists and is empty.
    ///
    /// Returns `false` when the user declines to empty a non-empty
    /// target. With `--force`, empties without asking.
    fn check_target(&mut self, ui: &mut dyn UserInterface) -> Result<bool> {
        if !self.target_dir.exists() {
            std::fs::create_dir_all(&self.target_dir).with_context(|| {
                format!("Failed to create {}", self.target_dir.display())
            })?;
            return Ok(true);
        }

        if is_effectively_empty(&self.target_dir)? {
            return Ok(true);
        }

        if !self.force {
            let proceed = ui
                .prompt(&Prompt::confirm(
                    "continue",
                    "The target directory is not empty. Continue?",
                    false,
                ))?
                .as_bool()
                .unwrap_or(false);
            if !proceed {
                return Ok(false);
            }

            let confirmed = ui
                .prompt(&Prompt::confirm(
                    "emptyTarget",
                    "All existing files in the target directory will be deleted. Are you sure?",
                    false,
                ))?
                .as_bool()
                .unwrap_or(false);
            if !confirmed {
                return Ok(false);
            }
        }

        empty_dir(&self.target_dir)?;
        Ok(true)
    }

    /// Make sure the template package is in the store, spinning while any
    /// network work happens.
    fn fetch_template(
        &self,
        ui: &mut dyn UserInterface,
        template: &TemplateDescriptor,
    ) -> Result<crate::cache::CachedPackage> {
        let spec = PackageSpec::new(&template.npm_name, &template.version)?;
        let mut spinner = ui.start_spinner(&format!("Fetching template {}", template.name));

        match self.cache.ensure_present(&spec) {
            Ok(cached) => {
                spinner.finish_success(&format!(
                    "Template {}@{} ready",
                    cached.name, cached.version
                ));
                Ok(cached)
            }
            Err(e) => {
                spinner.finish_error(&format!("Failed to fetch template {}", template.name));
                Err(e)
            }
        }
    }

    /// Custom templates bring their own scaffolding logic: resolve the
    /// package entry file and run it out of process with the collected
    /// project data. The entry owns everything after the fetch stage.
    fn run_custom(
        &mut self,
        template: &TemplateDescriptor,
        info: &ProjectInfo,
        package_root: &Path,
    ) -> Result<ScaffoldOutcome> {
        let entry = crate::cache::entry_file(package_root)?.ok_or_else(|| {
            GantryError::EntryResolutionFailed {
                name: template.npm_name.clone(),
            }
        })?;

        let args = serde_json::json!([{
            "targetPath": normalize_separators(&self.target_dir),
            "sourcePath": normalize_separators(package_root),
            "template": template.npm_name,
            "projectInfo": info.render_context(),
        }]);

        tracing::info!("Handing off to custom template {}", template.npm_name);
        let code = interpreter::run_entry_file(&entry, &args, &self.target_dir)?;
        if code != 0 {
            return Err(GantryError::CommandFailed {
                command: format!("custom template {}", template.npm_name),
                code: Some(code),
            });
        }

        self.state = InstallState::Done;
        Ok(ScaffoldOutcome::Completed)
    }

    /// Run the template's declared commands in the target directory.
    ///
    /// An install command is mandatory; a start command is optional.
    /// Both go through the whitelisted runner.
    fn run_commands(
        &self,
        ui: &mut dyn UserInterface,
        template: &TemplateDescriptor,
    ) -> Result<()> {
        let install = template.install_command.as_deref().ok_or_else(|| {
            GantryError::InstallCommandMissing {
                template: template.name.clone(),
            }
        })?;

        ui.message(&format!("Installing dependencies: {}", install));
        self.runner.run(install, &self.target_dir)?;

        if let Some(start) = template.start_command.as_deref() {
            ui.message(&format!("Starting project: {}", start));
            self.runner.run(start, &self.target_dir)?;
        }

        Ok(())
    }
}

/// Whether a directory holds no meaningful content.
///
/// Dotfiles and a `node_modules` directory do not count; a target with
/// only those is treated as empty (and they are left in place).
pub fn is_effectively_empty(dir: &Path) -> Result<bool> {
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || name == "node_modules" {
            continue;
        }
        return Ok(false);
    }
    Ok(true)
}

/// Delete every entry inside `dir`, keeping the directory itself.
fn empty_dir(dir: &Path) -> Result<()> {
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        } else {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
    }
    Ok(())
}

/// Copy the template payload (`<package>/template/`) into the target.
///
/// A package without a `template/` directory is malformed.
fn copy_template_payload(package_root: &Path, target: &Path) -> Result<usize> {
    let payload = package_root.join("template");
    if !payload.is_dir() {
        return Err(anyhow::anyhow!(
            "Template package at {} has no template directory",
            package_root.display()
        )
        .into());
    }
    copy_dir_recursive(&payload, target)
}

fn copy_dir_recursive(from: &Path, to: &Path) -> Result<usize> {
    std::fs::create_dir_all(to).with_context(|| format!("Failed to create {}", to.display()))?;

    let mut copied = 0;
    for entry in
        std::fs::read_dir(from).with_context(|| format!("Failed to list {}", from.display()))?
    {
        let entry = entry?;
        let src = entry.path();
        let dst = to.join(entry.file_name());
        if src.is_dir() {
            copied += copy_dir_recursive(&src, &dst)?;
        } else {
            std::fs::copy(&src, &dst)
                .with_context(|| format!("Failed to copy {}", src.display()))?;
            copied += 1;
        }
    }

    Ok(copied)
}
