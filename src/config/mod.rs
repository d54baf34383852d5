//! Runtime configuration.
//!
//! Gantry is configured entirely through the environment (plus an optional
//! `<home>/.env` file):
//!
//! - `GANTRY_HOME` - root directory for the package cache (default `~/.gantry`)
//! - `GANTRY_REGISTRY` - package registry base URL
//! - `GANTRY_CATALOG_URL` - template catalog base URL
//! - `GANTRY_TARGET_PATH` - local-override path that bypasses the registry
//!   and cache entirely (development mode)

pub mod env_file;

pub use env_file::{load_env_file, parse_dotenv};

use std::path::PathBuf;

use anyhow::{anyhow, Context};

use crate::error::Result;

/// Environment variable naming the gantry home directory.
pub const HOME_ENV: &str = "GANTRY_HOME";

/// Environment variable overriding the registry base URL.
pub const REGISTRY_ENV: &str = "GANTRY_REGISTRY";

/// Environment variable overriding the template catalog base URL.
pub const CATALOG_ENV: &str = "GANTRY_CATALOG_URL";

/// Environment variable pointing dispatch at a local package directory.
pub const TARGET_PATH_ENV: &str = "GANTRY_TARGET_PATH";

/// Default registry when `GANTRY_REGISTRY` is unset.
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

/// Default template catalog when `GANTRY_CATALOG_URL` is unset.
pub const DEFAULT_CATALOG: &str = "http://127.0.0.1:7001";

/// Directory under the home dir holding dispatched command packages.
const DEPENDENCIES_DIR: &str = "dependencies";

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Gantry home directory (cache root lives under it).
    pub home_dir: PathBuf,

    /// Package registry base URL.
    pub registry_url: String,

    /// Template catalog base URL.
    pub catalog_url: String,

    /// Local package path that bypasses the registry and cache.
    pub target_path: Option<PathBuf>,
}

impl Settings {
    /// Resolve settings from the environment.
    ///
    /// Loads `<home>/.env` first (existing environment variables win), then
    /// reads the `GANTRY_*` variables.
    pub fn from_env() -> Result<Self> {
        let home_dir = resolve_home_dir()?;

        if home_dir.exists() {
            load_env_file(&home_dir)?;
        }

        Ok(Self {
            home_dir,
            registry_url: std::env::var(REGISTRY_ENV)
                .unwrap_or_else(|_| DEFAULT_REGISTRY.to_string()),
            catalog_url: std::env::var(CATALOG_ENV)
                .unwrap_or_else(|_| DEFAULT_CATALOG.to_string()),
            target_path: std::env::var_os(TARGET_PATH_ENV).map(PathBuf::from),
        })
    }

    /// Root directory for dispatched command packages.
    pub fn dependencies_dir(&self) -> PathBuf {
        self.home_dir.join(DEPENDENCIES_DIR)
    }

    /// Store directory the package cache installs into.
    pub fn store_dir(&self) -> PathBuf {
        self.dependencies_dir().join("node_modules")
    }
}

/// Resolve the gantry home directory.
///
/// `GANTRY_HOME` wins; otherwise `~/.gantry`.
fn resolve_home_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }

    let user_home = dirs::home_dir()
        .ok_or_else(|| anyhow!("Cannot determine user home directory"))
        .context("GANTRY_HOME is not set and no fallback is available")?;

    Ok(user_home.join(".gantry"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Settings tests mutate process env; keep keys distinct per test since
    // the test harness runs them on shared process state.

    #[test]
    fn home_env_takes_precedence() {
        std::env::set_var(HOME_ENV, "/tmp/gantry-test-home");
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.home_dir, PathBuf::from("/tmp/gantry-test-home"));
        std::env::remove_var(HOME_ENV);
    }

    #[test]
    fn store_dir_nests_under_dependencies() {
        let settings = Settings {
            home_dir: PathBuf::from("/home/user/.gantry"),
            registry_url: DEFAULT_REGISTRY.to_string(),
            catalog_url: DEFAULT_CATALOG.to_string(),
            target_path: None,
        };

        assert_eq!(
            settings.store_dir(),
            PathBuf::from("/home/user/.gantry/dependencies/node_modules")
        );
    }

    #[test]
    fn default_urls_applied_when_unset() {
        std::env::remove_var(REGISTRY_ENV);
        std::env::remove_var(CATALOG_ENV);
        std::env::set_var(HOME_ENV, "/tmp/gantry-test-home2");

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.registry_url, DEFAULT_REGISTRY);
        assert_eq!(settings.catalog_url, DEFAULT_CATALOG);

        std::env::remove_var(HOME_ENV);
    }
}
