//! Project scaffolding.
//!
//! Turns a fetched template package into a ready project directory. The
//! [`installer`] module drives the stage pipeline; [`render`] handles
//! placeholder substitution and [`ignore`] decides which files are copied
//! verbatim.

pub mod ignore;
pub mod installer;
pub mod render;

pub use ignore::IgnoreSet;
pub use installer::{InstallState, ScaffoldInstaller, ScaffoldOutcome};
pub use render::{render_dir, render_file, render_string};
