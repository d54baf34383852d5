//! Whitelisted subprocess execution.
//!
//! This is the only point where strings coming out of a template manifest
//! are turned into process execution. The allow-list check runs before any
//! spawn, never after; it is a security-relevant invariant, not incidental
//! code.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{GantryError, Result};

/// Package managers a template is allowed to invoke.
pub const WHITELIST: &[&str] = &["npm", "cnpm", "yarn", "pnpm"];

/// Runs template-declared commands through the whitelist.
///
/// The trait seam exists so the scaffold pipeline can be exercised in
/// tests without spawning real package managers.
pub trait CommandRunner {
    /// Run a whitespace-split command line in `cwd`, inheriting stdio.
    ///
    /// Fails with `CommandNotWhitelisted` before spawning anything when the
    /// program is not on the allow-list, and with `CommandFailed` when the
    /// process exits non-zero.
    fn run(&self, command_line: &str, cwd: &Path) -> Result<()>;
}

/// The production runner: whitelist check, then spawn with inherited stdio.
#[derive(Debug, Default)]
pub struct WhitelistedRunner;

impl WhitelistedRunner {
    /// Create a runner.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for WhitelistedRunner {
    fn run(&self, command_line: &str, cwd: &Path) -> Result<()> {
        let mut parts = command_line.split_whitespace();
        let program = parts.next().ok_or_else(|| GantryError::CommandFailed {
            command: command_line.to_string(),
            code: None,
        })?;
        let args: Vec<&str> = parts.collect();

        if !WHITELIST.contains(&program) {
            return Err(GantryError::CommandNotWhitelisted {
                program: program.to_string(),
            });
        }

        tracing::info!("Running '{}' in {}", command_line, cwd.display());

        let status = spawn_platform(program, &args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| GantryError::CommandFailed {
                command: format!("{} ({})", command_line, e),
                code: None,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(GantryError::CommandFailed {
                command: command_line.to_string(),
                code: status.code(),
            })
        }
    }
}

/// Build a [`Command`], routing through `cmd /c` on Windows so that
/// `.cmd`/`.bat` shims (npm and friends) resolve.
pub fn spawn_platform(program: &str, args: &[&str]) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.arg("/c").arg(program).args(args);
        cmd
    } else {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd
    }
}

/// A runner that records commands instead of spawning them.
///
/// Still enforces the whitelist, so tests observe the same rejection
/// behavior as production.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: std::sync::Mutex<Vec<(String, PathBuf)>>,
    fail_on: Option<String>,
}

impl RecordingRunner {
    /// Create a recorder that accepts every whitelisted command.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder that fails commands containing `needle`.
    pub fn failing_on(needle: impl Into<String>) -> Self {
        Self {
            commands: std::sync::Mutex::new(Vec::new()),
            fail_on: Some(needle.into()),
        }
    }

    /// Commands recorded so far.
    pub fn commands(&self) -> Vec<(String, PathBuf)> {
        self.commands.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command_line: &str, cwd: &Path) -> Result<()> {
        let program = command_line.split_whitespace().next().unwrap_or_default();

        if !WHITELIST.contains(&program) {
            return Err(GantryError::CommandNotWhitelisted {
                program: program.to_string(),
            });
        }

        self.commands
            .lock()
            .unwrap()
            .push((command_line.to_string(), cwd.to_path_buf()));

        if let Some(needle) = &self.fail_on {
            if command_line.contains(needle.as_str()) {
                return Err(GantryError::CommandFailed {
                    command: command_line.to_string(),
                    code: Some(1),
                });
            }
        }

        Ok(())
    }
}
