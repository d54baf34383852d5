//! Gantry - project scaffolding from versioned template packages.
//!
//! Gantry is a CLI tool that creates new projects from templates published
//! to a package registry, caching each template package on disk so repeated
//! runs at the same version never touch the network twice.
//!
//! # Modules
//!
//! - [`cache`] - Deterministic on-disk package cache and entry resolution
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Environment-driven runtime configuration
//! - [`dispatch`] - Static command registry and out-of-process execution
//! - [`error`] - Error types and result aliases
//! - [`project`] - Project metadata collection and validation
//! - [`registry`] - Package registry and template catalog clients
//! - [`scaffold`] - Template copy, render, and command pipeline
//! - [`shell`] - Whitelisted subprocess execution
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use gantry::scaffold::render_string;
//!
//! let mut ctx = HashMap::new();
//! ctx.insert("projectName".to_string(), "my-app".to_string());
//! let rendered = render_string("Welcome to ${projectName}!", &ctx).unwrap();
//! assert_eq!(rendered, "Welcome to my-app!");
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod project;
pub mod registry;
pub mod scaffold;
pub mod shell;
pub mod ui;

pub use error::{GantryError, Result};
