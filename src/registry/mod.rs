//! Remote package index and template catalog clients.
//!
//! [`RegistryClient`] resolves package versions against the package
//! registry; [`CatalogClient`] fetches the list of scaffoldable templates.
//! Both are read-only over HTTP.

pub mod catalog;
pub mod client;

pub use catalog::{filter_by_tag, CatalogClient, TemplateDescriptor, TemplateKind};
pub use client::{DistInfo, PackageMetadata, RegistryClient, VersionMetadata};
