//! Template catalog client.
//!
//! The catalog is an external HTTP API returning the list of scaffoldable
//! templates. Gantry only consumes this list; it never produces it.

use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Request timeout for catalog calls.
const CATALOG_TIMEOUT: Duration = Duration::from_secs(5);

/// Catalog path listing project templates.
const TEMPLATE_PATH: &str = "/project/template";

/// How a template is realized after its package is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Copy the package's `template/` directory and render it.
    Normal,
    /// Run the package's entry file, which performs its own scaffolding.
    Custom,
}

impl Default for TemplateKind {
    fn default() -> Self {
        Self::Normal
    }
}

/// Metadata describing one scaffoldable template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    /// Display name shown in the selection prompt.
    pub name: String,

    /// Package name backing this template.
    pub npm_name: String,

    /// Pinned package version.
    pub version: String,

    /// Template kind.
    #[serde(rename = "type", default)]
    pub kind: TemplateKind,

    /// Tags matched against the chosen project kind.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Glob patterns excluded from rendering.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Command that installs the scaffolded project's dependencies.
    #[serde(default)]
    pub install_command: Option<String>,

    /// Command that starts the scaffolded project.
    #[serde(default)]
    pub start_command: Option<String>,
}

/// Client for the template catalog API.
pub struct CatalogClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl CatalogClient {
    /// Create a client against the given catalog base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::builder()
                .user_agent("gantry")
                .timeout(CATALOG_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Fetch all template descriptors.
    pub fn list_templates(&self) -> Result<Vec<TemplateDescriptor>> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), TEMPLATE_PATH);
        tracing::debug!("Fetching template catalog from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to reach template catalog at {}", url))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Template catalog returned HTTP {}", response.status()).into());
        }

        let templates = response
            .json::<Vec<TemplateDescriptor>>()
            .context("Template catalog returned malformed data")?;

        Ok(templates)
    }
}

/// Filter templates whose tags include the given tag.
pub fn filter_by_tag(templates: &[TemplateDescriptor], tag: &str) -> Vec<TemplateDescriptor> {
    templates
        .iter()
        .filter(|t| t.tags.iter().any(|s| s == tag))
        .cloned()
        .collect()
}
