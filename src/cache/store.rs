//! Versioned package cache.
//!
//! Maps a `(name, version)` pair to a deterministic on-disk directory
//! under a shared store, and knows how to check existence, install,
//! update, and locate the entry file of a cached package.
//!
//! # Cache directory naming
//!
//! `_{name with '/' replaced by '_'}@{version}@{name}` nested under the
//! store directory. This literal scheme is a persisted-state contract:
//! cache directories created by previous runs must remain valid, so the
//! path is a pure function of its inputs (no timestamps, no randomness).

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use semver::{Version, VersionReq};

use super::{fetch, manifest};
use crate::error::{GantryError, Result};
use crate::registry::RegistryClient;

/// A version constraint attached to a package request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionConstraint {
    /// The newest published version at resolution time.
    Latest,
    /// An exact version.
    Exact(Version),
    /// A semver range, e.g. `^1.2.0`.
    Range(VersionReq),
}

impl VersionConstraint {
    /// Parse a constraint string: `"latest"`, an exact semver, or a range.
    pub fn parse(input: &str) -> Result<Self> {
        if input == "latest" {
            return Ok(Self::Latest);
        }

        if let Ok(version) = Version::parse(input) {
            return Ok(Self::Exact(version));
        }

        let req = VersionReq::parse(input)
            .with_context(|| format!("Invalid version constraint '{}'", input))?;
        Ok(Self::Range(req))
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Exact(v) => write!(f, "{}", v),
            Self::Range(r) => write!(f, "{}", r),
        }
    }
}

/// An immutable request for one package at one constraint.
#[derive(Debug, Clone)]
pub struct PackageSpec {
    name: String,
    constraint: VersionConstraint,
}

impl PackageSpec {
    /// Create a spec from a name and constraint string.
    pub fn new(name: impl Into<String>, constraint: &str) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            constraint: VersionConstraint::parse(constraint)?,
        })
    }

    /// Create a spec pinned to `"latest"`.
    pub fn latest(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: VersionConstraint::Latest,
        }
    }

    /// The package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version constraint.
    pub fn constraint(&self) -> &VersionConstraint {
        &self.constraint
    }
}

/// A package pinned to one concrete version and present in the cache.
#[derive(Debug, Clone)]
pub struct CachedPackage {
    /// Package name.
    pub name: String,
    /// The pinned version, fixed for the remainder of the invocation.
    pub version: Version,
    /// Deterministic cache directory holding the installed package.
    pub cache_dir: PathBuf,
}

/// Where a dispatched package's files live.
#[derive(Debug, Clone)]
pub enum PackageLocation {
    /// Installed under the shared store at a pinned version.
    Cached(CachedPackage),
    /// Loaded directly from a local path (development override); the
    /// registry and cache are never touched.
    Local { name: String, path: PathBuf },
}

impl PackageLocation {
    /// The package name.
    pub fn name(&self) -> &str {
        match self {
            Self::Cached(pkg) => &pkg.name,
            Self::Local { name, .. } => name,
        }
    }

    /// The directory the package's files live under.
    pub fn root(&self) -> &Path {
        match self {
            Self::Cached(pkg) => &pkg.cache_dir,
            Self::Local { path, .. } => path,
        }
    }

    /// Resolve the package's entry file (forward-slash normalized).
    pub fn entry_file(&self) -> Result<Option<String>> {
        manifest::entry_file(self.root())
    }
}

/// On-disk cache of installed packages, shared across all package names.
pub struct PackageCache {
    store_dir: PathBuf,
    registry: RegistryClient,
}

impl PackageCache {
    /// Create a cache rooted at `store_dir`, resolving against `registry`.
    pub fn new(store_dir: impl Into<PathBuf>, registry: RegistryClient) -> Self {
        Self {
            store_dir: store_dir.into(),
            registry,
        }
    }

    /// The store directory all cache entries nest under.
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// The registry this cache resolves versions against.
    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    /// Compute the cache directory for a package at a version.
    ///
    /// Pure and deterministic: identical inputs always yield the identical
    /// path. Scoped names keep their `/`, so their entries nest one level
    /// deeper, matching the persisted naming contract.
    pub fn cache_dir(&self, name: &str, version: &Version) -> PathBuf {
        let prefix = name.replace('/', "_");
        self.store_dir
            .join(format!("_{}@{}@{}", prefix, version, name))
    }

    /// Resolve a spec's constraint to a concrete pinned version.
    ///
    /// This performs at most one registry resolution; the returned version
    /// must be threaded through subsequent calls rather than re-resolved,
    /// so a single run pins a single version.
    pub fn pin(&self, spec: &PackageSpec) -> Result<Version> {
        match spec.constraint() {
            VersionConstraint::Exact(version) => Ok(version.clone()),
            VersionConstraint::Latest => self
                .registry
                .resolve_latest(spec.name())?
                .ok_or_else(|| GantryError::PackageNotFound {
                    name: spec.name().to_string(),
                }),
            VersionConstraint::Range(req) => self
                .registry
                .list_versions(spec.name())?
                .into_iter()
                .filter(|v| req.matches(v))
                .max()
                .ok_or_else(|| GantryError::PackageNotFound {
                    name: spec.name().to_string(),
                }),
        }
    }

    /// Check whether a package at a pinned version is cached.
    pub fn exists(&self, name: &str, version: &Version) -> bool {
        self.cache_dir(name, version).exists()
    }

    /// Install a package at a pinned version into its cache directory.
    ///
    /// Only call when `exists` is false; this does not re-check. Fails
    /// with `InstallFailed` when the version is unpublished or the tarball
    /// cannot be fetched or unpacked.
    pub fn install(&self, name: &str, version: &Version) -> Result<()> {
        std::fs::create_dir_all(&self.store_dir).with_context(|| {
            format!("Failed to create store directory {}", self.store_dir.display())
        })?;

        let url = self.registry.tarball_url(name, version)?.ok_or_else(|| {
            GantryError::InstallFailed {
                name: name.to_string(),
                version: version.to_string(),
                message: "version is not published".to_string(),
            }
        })?;

        let bytes = self
            .registry
            .download(&url)
            .map_err(|e| GantryError::InstallFailed {
                name: name.to_string(),
                version: version.to_string(),
                message: e.to_string(),
            })?;

        let cache_dir = self.cache_dir(name, version);
        tracing::debug!("Unpacking {}@{} into {}", name, version, cache_dir.display());

        fetch::unpack_tarball(&bytes, &cache_dir).map_err(|e| GantryError::InstallFailed {
            name: name.to_string(),
            version: version.to_string(),
            message: e.to_string(),
        })?;

        Ok(())
    }

    /// Refresh a package to the newest published version.
    ///
    /// Resolves latest; installs fresh only when that version's directory
    /// is absent; adopts it as the pinned version either way. Repeated
    /// calls with no new remote version cost one registry round-trip and
    /// nothing else.
    pub fn update(&self, name: &str) -> Result<CachedPackage> {
        let latest =
            self.registry
                .resolve_latest(name)?
                .ok_or_else(|| GantryError::PackageNotFound {
                    name: name.to_string(),
                })?;

        if !self.exists(name, &latest) {
            tracing::info!("Updating {} to {}", name, latest);
            self.install(name, &latest)?;
        }

        Ok(CachedPackage {
            name: name.to_string(),
            version: latest.clone(),
            cache_dir: self.cache_dir(name, &latest),
        })
    }

    /// Ensure a spec is present in the cache and return its pinned form.
    ///
    /// Resolves the constraint exactly once; if the resolved version is
    /// already cached this is a no-op beyond the existence check, which
    /// makes repeated calls idempotent (at most one resolution and at most
    /// one install per call).
    pub fn ensure_present(&self, spec: &PackageSpec) -> Result<CachedPackage> {
        let version = self.pin(spec)?;

        if !self.exists(spec.name(), &version) {
            tracing::info!("Installing {}@{}", spec.name(), version);
            self.install(spec.name(), &version)?;
        } else {
            tracing::debug!("{}@{} already cached", spec.name(), version);
        }

        Ok(CachedPackage {
            name: spec.name().to_string(),
            version: version.clone(),
            cache_dir: self.cache_dir(spec.name(), &version),
        })
    }

    /// Resolve the entry file of a cached package.
    pub fn entry_file(&self, package: &CachedPackage) -> Result<Option<String>> {
        manifest::entry_file(&package.cache_dir)
    }
}
