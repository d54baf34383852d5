//! Project metadata collection.
//!
//! Gathers and validates the name, version, and template choice for one
//! `init` invocation and produces the immutable [`ProjectInfo`] consumed
//! by the scaffold installer.

use std::collections::HashMap;
use std::sync::LazyLock;

use anyhow::anyhow;
use regex::Regex;
use semver::Version;

use crate::error::{GantryError, Result};
use crate::registry::{filter_by_tag, TemplateDescriptor};
use crate::ui::{Prompt, PromptOption, UserInterface};

/// What kind of thing is being scaffolded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    /// A standalone application project.
    Project,
    /// A reusable component.
    Component,
}

impl ProjectKind {
    /// The catalog tag this kind selects templates by.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Component => "component",
        }
    }
}

/// Validated metadata for one scaffold run. Immutable after creation.
#[derive(Debug, Clone)]
pub struct ProjectInfo {
    /// Project or component.
    pub kind: ProjectKind,
    /// Validated project name.
    pub name: String,
    /// Project version.
    pub version: Version,
    /// Package name of the chosen template.
    pub template: String,
    /// Description (components only).
    pub description: Option<String>,
}

impl ProjectInfo {
    /// Variables exposed to template rendering.
    ///
    /// Keys are camelCase to match template placeholder conventions.
    pub fn render_context(&self) -> HashMap<String, String> {
        let mut ctx = HashMap::new();
        ctx.insert("projectName".to_string(), self.name.clone());
        ctx.insert("className".to_string(), class_name(&self.name));
        ctx.insert("version".to_string(), self.version.to_string());
        ctx.insert(
            "description".to_string(),
            self.description.clone().unwrap_or_default(),
        );
        ctx
    }
}

/// Derive a kebab-case class name from a project name.
fn class_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == '_' {
            out.push('-');
        } else {
            out.push(c);
        }
    }
    out
}

static NAME_RULE: LazyLock<Regex> = LazyLock::new(|| {
    // First character a letter; words separated by - or _ start with a
    // letter; must end alphanumeric.
    Regex::new(r"^[a-zA-Z]+([-_][a-zA-Z][a-zA-Z0-9]*|[a-zA-Z0-9])*$").unwrap()
});

/// Check whether a project name is acceptable.
pub fn is_valid_project_name(name: &str) -> bool {
    NAME_RULE.is_match(name)
}

/// Collect and validate project metadata through the UI.
///
/// `initial_name` is the name given on the command line, if any; an
/// invalid or missing one falls back to a prompt.
pub fn collect_project_info(
    ui: &mut dyn UserInterface,
    templates: &[TemplateDescriptor],
    initial_name: Option<&str>,
) -> Result<ProjectInfo> {
    let kind = prompt_kind(ui)?;

    let candidates = filter_by_tag(templates, kind.tag());
    if candidates.is_empty() {
        return Err(GantryError::TemplateNotFound {
            name: kind.tag().to_string(),
        });
    }

    let name = match initial_name {
        Some(name) if is_valid_project_name(name) => name.to_string(),
        given => {
            if let Some(invalid) = given {
                ui.warning(&format!("'{}' is not a valid project name", invalid));
            }
            let answer = ui
                .prompt(&Prompt::input("projectName", "Project name", None))?
                .as_string();
            if !is_valid_project_name(&answer) {
                return Err(anyhow!(
                    "Invalid project name '{}': must start with a letter, use - or _ \
                     separators, and end with a letter or digit",
                    answer
                )
                .into());
            }
            answer
        }
    };

    let version_input = ui
        .prompt(&Prompt::input("version", "Version", Some("1.0.0")))?
        .as_string();
    let version = Version::parse(version_input.trim())
        .map_err(|e| anyhow!("Invalid version '{}': {}", version_input, e))?;

    let template = prompt_template(ui, &candidates)?;

    let description = match kind {
        ProjectKind::Project => None,
        ProjectKind::Component => Some(
            ui.prompt(&Prompt::input("description", "Description", Some("")))?
                .as_string(),
        ),
    };

    let info = ProjectInfo {
        kind,
        name,
        version,
        template,
        description,
    };
    tracing::debug!("Collected project info: {:?}", info);

    Ok(info)
}

fn prompt_kind(ui: &mut dyn UserInterface) -> Result<ProjectKind> {
    let answer = ui
        .prompt(&Prompt::select(
            "kind",
            "What do you want to create?",
            vec![
                PromptOption {
                    label: "Project".to_string(),
                    value: "project".to_string(),
                },
                PromptOption {
                    label: "Component".to_string(),
                    value: "component".to_string(),
                },
            ],
        ))?
        .as_string();

    Ok(if answer == "component" {
        ProjectKind::Component
    } else {
        ProjectKind::Project
    })
}

fn prompt_template(
    ui: &mut dyn UserInterface,
    candidates: &[TemplateDescriptor],
) -> Result<String> {
    let options = candidates
        .iter()
        .map(|t| PromptOption {
            label: t.name.clone(),
            value: t.npm_name.clone(),
        })
        .collect();

    let chosen = ui
        .prompt(&Prompt::select("template", "Choose a template", options))?
        .as_string();

    Ok(chosen)
}
