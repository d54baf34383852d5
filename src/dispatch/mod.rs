//! Command dispatch.
//!
//! Maps CLI command names to the packages that implement them through a
//! static registry. A binding either runs in-process (built into this
//! binary) or out of process, where the dispatcher acquires the package,
//! resolves its entry file, and hands off to a child interpreter.
//!
//! Setting `GANTRY_TARGET_PATH` short-circuits acquisition for any
//! binding: the package is loaded from that local directory and always
//! executed out of process, which is the development loop for command
//! packages.

use serde::Serialize;

use crate::cache::{PackageCache, PackageLocation, PackageSpec, VersionConstraint};
use crate::config::Settings;
use crate::error::{GantryError, Result};
use crate::shell::interpreter;

/// How a bound command executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Implemented in this binary; no package acquisition by default.
    InProcess,
    /// Implemented by the bound package's entry file, run under `node`.
    Subprocess,
}

/// One entry in the command registry.
#[derive(Debug, Clone, Copy)]
pub struct CommandBinding {
    /// CLI command name.
    pub name: &'static str,
    /// Package implementing the command.
    pub package: &'static str,
    /// Version constraint to acquire the package at.
    pub constraint: &'static str,
    /// Execution mode.
    pub mode: ExecutionMode,
}

/// The static command registry. Compiled in; never mutated at runtime.
pub const BINDINGS: &[CommandBinding] = &[CommandBinding {
    name: "init",
    package: "@gantry/init",
    constraint: "latest",
    mode: ExecutionMode::InProcess,
}];

/// Look up a command binding by CLI name.
pub fn binding(name: &str) -> Option<&'static CommandBinding> {
    BINDINGS.iter().find(|b| b.name == name)
}

/// Options forwarded to an out-of-process `init`.
///
/// This is the sanitized payload: only declared fields cross the process
/// boundary, serialized camelCase for the JavaScript side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitOptions {
    /// Project name given on the command line, if any.
    pub project_name: Option<String>,
    /// Whether to empty a non-empty target without asking.
    pub force: bool,
}

impl InitOptions {
    /// Argument array passed to the entry file.
    pub fn to_args(&self) -> serde_json::Value {
        serde_json::json!([self.project_name, { "force": self.force }])
    }
}

/// Resolves command packages and runs their entry files.
pub struct Dispatcher<'a> {
    settings: &'a Settings,
    cache: &'a PackageCache,
}

impl<'a> Dispatcher<'a> {
    pub fn new(settings: &'a Settings, cache: &'a PackageCache) -> Self {
        Self { settings, cache }
    }

    /// Locate the package implementing a binding.
    ///
    /// With a target-path override the package is used straight from that
    /// directory. Otherwise a `latest` binding refreshes to the newest
    /// published version and anything else installs on first use.
    pub fn locate(&self, binding: &CommandBinding) -> Result<PackageLocation> {
        if let Some(path) = &self.settings.target_path {
            tracing::info!(
                "Using local override for {} at {}",
                binding.package,
                path.display()
            );
            return Ok(PackageLocation::Local {
                name: binding.package.to_string(),
                path: path.clone(),
            });
        }

        let spec = PackageSpec::new(binding.package, binding.constraint)?;
        let cached = match spec.constraint() {
            VersionConstraint::Latest => self.cache.update(binding.package)?,
            _ => self.cache.ensure_present(&spec)?,
        };

        Ok(PackageLocation::Cached(cached))
    }

    /// Run a binding out of process and return the child's exit code.
    ///
    /// The package must resolve to an entry file; a package without one is
    /// a hard dispatch failure, never a silent no-op.
    pub fn exec(&self, binding: &CommandBinding, args: &serde_json::Value) -> Result<i32> {
        let location = self.locate(binding)?;

        let entry =
            location
                .entry_file()?
                .ok_or_else(|| GantryError::EntryResolutionFailed {
                    name: location.name().to_string(),
                })?;

        let cwd = std::env::current_dir().map_err(GantryError::Io)?;
        tracing::debug!("Dispatching {} via {}", binding.name, entry);

        interpreter::run_entry_file(&entry, args, &cwd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryClient;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn settings(target_path: Option<PathBuf>) -> Settings {
        Settings {
            home_dir: PathBuf::from("/tmp/gantry-dispatch-test"),
            registry_url: "http://127.0.0.1:1".to_string(),
            catalog_url: "http://127.0.0.1:1".to_string(),
            target_path,
        }
    }

    #[test]
    fn registry_binds_init() {
        let b = binding("init").unwrap();
        assert_eq!(b.package, "@gantry/init");
        assert_eq!(b.mode, ExecutionMode::InProcess);
    }

    #[test]
    fn unknown_command_has_no_binding() {
        assert!(binding("publish").is_none());
    }

    #[test]
    fn target_path_override_yields_local_location() {
        let temp = TempDir::new().unwrap();
        let settings = settings(Some(temp.path().to_path_buf()));
        let cache = PackageCache::new("/store", RegistryClient::new("http://127.0.0.1:1"));
        let dispatcher = Dispatcher::new(&settings, &cache);

        let location = dispatcher.locate(binding("init").unwrap()).unwrap();
        assert!(matches!(location, PackageLocation::Local { .. }));
        assert_eq!(location.root(), temp.path());
    }

    #[test]
    fn exec_fails_when_entry_unresolvable() {
        let temp = TempDir::new().unwrap();
        // Manifest present but no `main` field: resolution yields nothing.
        fs::write(temp.path().join("package.json"), r#"{"name": "x"}"#).unwrap();

        let settings = settings(Some(temp.path().to_path_buf()));
        let cache = PackageCache::new("/store", RegistryClient::new("http://127.0.0.1:1"));
        let dispatcher = Dispatcher::new(&settings, &cache);

        let result = dispatcher.exec(binding("init").unwrap(), &serde_json::json!([]));
        assert!(matches!(
            result,
            Err(GantryError::EntryResolutionFailed { .. })
        ));
    }

    #[test]
    fn init_options_serialize_camel_case() {
        let opts = InitOptions {
            project_name: Some("my-app".to_string()),
            force: true,
        };

        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["projectName"], "my-app");
        assert_eq!(json["force"], true);

        let args = opts.to_args();
        assert_eq!(args[0], "my-app");
        assert_eq!(args[1]["force"], true);
    }
}
