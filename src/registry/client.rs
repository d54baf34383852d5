//! Package registry client.
//!
//! Queries a remote package index for version metadata and computes
//! "latest" and constraint-satisfying versions. The registry contract is
//! `GET {base}/{name}` returning JSON with a `versions` map keyed by
//! semver string; any non-200 response is treated as "no data", not a
//! transport failure.

use std::collections::HashMap;
use std::time::Duration;

use semver::{Version, VersionReq};
use serde::Deserialize;

use crate::error::{GantryError, Result};

/// Default request timeout for registry calls.
const REGISTRY_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only client for a package registry.
pub struct RegistryClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

/// Registry metadata for one package.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageMetadata {
    /// Per-version metadata keyed by semver string.
    #[serde(default)]
    pub versions: HashMap<String, VersionMetadata>,
}

/// Registry metadata for one published version.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionMetadata {
    /// Distribution info (tarball location).
    pub dist: DistInfo,
}

/// Distribution block of a published version.
#[derive(Debug, Clone, Deserialize)]
pub struct DistInfo {
    /// URL of the package tarball.
    pub tarball: String,
}

impl RegistryClient {
    /// Create a client against the given registry base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::builder()
                .user_agent("gantry")
                .timeout(REGISTRY_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// The registry base URL this client queries.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn package_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    /// Fetch the full metadata document for a package.
    ///
    /// Returns `None` when the registry has no data for the name (any
    /// non-200 status). Transport errors map to `RegistryUnreachable`.
    pub fn metadata(&self, name: &str) -> Result<Option<PackageMetadata>> {
        let url = self.package_url(name);
        tracing::debug!("Fetching registry metadata from {}", url);

        let response =
            self.client
                .get(&url)
                .send()
                .map_err(|e| GantryError::RegistryUnreachable {
                    message: e.to_string(),
                })?;

        if !response.status().is_success() {
            tracing::debug!("Registry returned {} for {}", response.status(), name);
            return Ok(None);
        }

        let metadata = response
            .json::<PackageMetadata>()
            .map_err(|e| GantryError::RegistryUnreachable {
                message: format!("Invalid registry response for {}: {}", name, e),
            })?;

        Ok(Some(metadata))
    }

    /// List all published versions of a package, unordered.
    ///
    /// A package unknown to the registry yields an empty list; callers that
    /// require data map emptiness to [`GantryError::PackageNotFound`].
    /// Version keys that do not parse as semver are skipped.
    pub fn list_versions(&self, name: &str) -> Result<Vec<Version>> {
        let Some(metadata) = self.metadata(name)? else {
            return Ok(Vec::new());
        };

        let mut versions: Vec<Version> = metadata
            .versions
            .keys()
            .filter_map(|v| Version::parse(v).ok())
            .collect();
        versions.sort();

        Ok(versions)
    }

    /// Resolve the newest published version of a package.
    pub fn resolve_latest(&self, name: &str) -> Result<Option<Version>> {
        Ok(self.list_versions(name)?.into_iter().max())
    }

    /// Resolve the newest version satisfying `^base`.
    ///
    /// Used for self-update checks, not for template resolution.
    pub fn resolve_satisfying(&self, base: &Version, name: &str) -> Result<Option<Version>> {
        let req = VersionReq::parse(&format!("^{}", base))
            .map_err(|e| anyhow::anyhow!("Invalid base version {}: {}", base, e))?;

        Ok(self
            .list_versions(name)?
            .into_iter()
            .filter(|v| req.matches(v))
            .max())
    }

    /// Get the tarball URL for a specific published version.
    pub fn tarball_url(&self, name: &str, version: &Version) -> Result<Option<String>> {
        let Some(metadata) = self.metadata(name)? else {
            return Ok(None);
        };

        Ok(metadata
            .versions
            .get(&version.to_string())
            .map(|v| v.dist.tarball.clone()))
    }

    /// Download a package tarball.
    pub fn download(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Downloading tarball from {}", url);

        let response =
            self.client
                .get(url)
                .send()
                .map_err(|e| GantryError::RegistryUnreachable {
                    message: e.to_string(),
                })?;

        if !response.status().is_success() {
            return Err(GantryError::RegistryUnreachable {
                message: format!("HTTP {} downloading {}", response.status(), url),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| GantryError::RegistryUnreachable {
                message: e.to_string(),
            })?;

        Ok(bytes.to_vec())
    }
}
