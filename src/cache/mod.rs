//! Deterministic on-disk package cache.
//!
//! Packages are installed from registry tarballs into directories whose
//! names are a pure function of `(store dir, package name, version)`,
//! which is what makes existence checks and idempotent reuse possible.

pub mod fetch;
pub mod manifest;
pub mod store;

pub use manifest::{entry_file, find_manifest_dir, normalize_separators, PackageManifest};
pub use store::{CachedPackage, PackageCache, PackageLocation, PackageSpec, VersionConstraint};
