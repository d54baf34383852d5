//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Gantry - project scaffolding from versioned template packages.
#[derive(Debug, Parser)]
#[command(name = "gantry")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Load command packages from a local directory instead of the registry
    #[arg(long, global = true, value_name = "PATH")]
    pub target_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scaffold a new project from a template
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InitArgs {
    /// Name of the project to create
    pub project_name: Option<String>,

    /// Empty a non-empty target directory without asking
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_init_with_name_and_force() {
        let cli = Cli::try_parse_from(["gantry", "init", "my-app", "--force"]).unwrap();
        match cli.command {
            Some(Commands::Init(args)) => {
                assert_eq!(args.project_name.as_deref(), Some("my-app"));
                assert!(args.force);
            }
            other => panic!("expected init, got {:?}", other),
        }
    }

    #[test]
    fn parses_init_without_name() {
        let cli = Cli::try_parse_from(["gantry", "init"]).unwrap();
        match cli.command {
            Some(Commands::Init(args)) => {
                assert!(args.project_name.is_none());
                assert!(!args.force);
            }
            other => panic!("expected init, got {:?}", other),
        }
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = Cli::try_parse_from(["gantry", "init", "--debug", "--quiet"]).unwrap();
        assert!(cli.debug);
        assert!(cli.quiet);
    }

    #[test]
    fn target_path_is_global() {
        let cli =
            Cli::try_parse_from(["gantry", "init", "--target-path", "/dev/pkg"]).unwrap();
        assert_eq!(cli.target_path, Some(PathBuf::from("/dev/pkg")));
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["gantry"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_completions_shell() {
        let cli = Cli::try_parse_from(["gantry", "completions", "bash"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Completions(_))));
    }
}
