//! Error types for gantry operations.
//!
//! This module defines [`GantryError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `GantryError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `GantryError::Other`) for unexpected errors
//! - All errors surface at the top-level invocation, which logs the message
//!   and exits non-zero; none are retried automatically

use thiserror::Error;

/// Core error type for gantry operations.
#[derive(Debug, Error)]
pub enum GantryError {
    /// The package registry could not be reached.
    #[error("Registry unreachable: {message}")]
    RegistryUnreachable { message: String },

    /// The registry returned no version data for a package.
    #[error("Package not found in registry: {name}")]
    PackageNotFound { name: String },

    /// Installing a package into the cache failed.
    #[error("Failed to install {name}@{version}: {message}")]
    InstallFailed {
        name: String,
        version: String,
        message: String,
    },

    /// A cached package has no resolvable entry file.
    #[error("Cannot resolve entry file for package '{name}'")]
    EntryResolutionFailed { name: String },

    /// A template command's program is not on the allow-list.
    #[error("Command '{program}' is not a whitelisted package manager")]
    CommandNotWhitelisted { program: String },

    /// A spawned command exited non-zero.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// The selected template declares no install command.
    #[error("Template '{template}' declares no install command")]
    InstallCommandMissing { template: String },

    /// No template matched the request.
    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for gantry operations.
pub type Result<T> = std::result::Result<T, GantryError>;
