//! The `init` command.
//!
//! Scaffolds a new project: loads the template catalog, collects project
//! metadata, then runs the scaffold pipeline against a target directory
//! named after the project under the current directory.
//!
//! When a target-path override is active the command instead dispatches
//! to the bound package out of process, which is how command packages are
//! developed against a local checkout.

use anyhow::{anyhow, Context};

use crate::cache::PackageCache;
use crate::cli::args::InitArgs;
use crate::config::Settings;
use crate::dispatch::{self, Dispatcher, ExecutionMode, InitOptions};
use crate::error::{GantryError, Result};
use crate::project::collect_project_info;
use crate::registry::{CatalogClient, RegistryClient};
use crate::scaffold::{ScaffoldInstaller, ScaffoldOutcome};
use crate::shell::WhitelistedRunner;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The init command implementation.
pub struct InitCommand<'a> {
    settings: &'a Settings,
    args: InitArgs,
}

impl<'a> InitCommand<'a> {
    /// Create a new init command.
    pub fn new(settings: &'a Settings, args: InitArgs) -> Self {
        Self { settings, args }
    }

    fn run_in_process(
        &self,
        ui: &mut dyn UserInterface,
        cache: &PackageCache,
    ) -> Result<CommandResult> {
        let catalog = CatalogClient::new(&self.settings.catalog_url);
        let templates = catalog.list_templates()?;
        if templates.is_empty() {
            return Err(anyhow!(
                "Template catalog at {} lists no templates",
                self.settings.catalog_url
            )
            .into());
        }

        let info = collect_project_info(ui, &templates, self.args.project_name.as_deref())?;

        let template = templates
            .iter()
            .find(|t| t.npm_name == info.template)
            .ok_or_else(|| GantryError::TemplateNotFound {
                name: info.template.clone(),
            })?;

        let target_dir = std::env::current_dir()
            .context("Cannot determine current directory")?
            .join(&info.name);

        let runner = WhitelistedRunner::new();
        let mut installer = ScaffoldInstaller::new(cache, &runner, target_dir, self.args.force);

        match installer.run(ui, template, &info)? {
            ScaffoldOutcome::Completed => Ok(CommandResult::success()),
            ScaffoldOutcome::Aborted => {
                ui.warning("Aborted; target directory left untouched.");
                Ok(CommandResult::success())
            }
        }
    }
}

impl Command for InitCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let binding = dispatch::binding("init")
            .ok_or_else(|| anyhow!("Command 'init' is not registered"))?;

        let registry = RegistryClient::new(&self.settings.registry_url);
        let cache = PackageCache::new(self.settings.store_dir(), registry);

        // A local override always runs the bound package out of process,
        // regardless of the binding's default mode.
        if self.settings.target_path.is_some() || binding.mode == ExecutionMode::Subprocess {
            let dispatcher = Dispatcher::new(self.settings, &cache);
            let opts = InitOptions {
                project_name: self.args.project_name.clone(),
                force: self.args.force,
            };

            let code = dispatcher.exec(binding, &opts.to_args())?;
            return Ok(if code == 0 {
                CommandResult::success()
            } else {
                CommandResult::failure(code)
            });
        }

        self.run_in_process(ui, &cache)
    }
}
