//! Out-of-process entry-file execution.
//!
//! Dispatched command packages and custom templates are JavaScript
//! packages; their entry files run in a fresh `node` process executing a
//! one-line script that `require`s the entry file and invokes it with a
//! JSON-serialized argument array. Standard streams are inherited.

use std::path::Path;

use crate::error::{GantryError, Result};

use super::spawn_platform;

/// Build the one-line loader script for an entry file.
///
/// `entry` must be forward-slash normalized (see
/// [`crate::cache::normalize_separators`]) so the embedded path is
/// host-portable.
pub fn loader_script(entry: &str, args: &serde_json::Value) -> String {
    format!("require('{}').call(null, {})", entry, args)
}

/// Run an entry file in a child interpreter and return its exit code.
///
/// A failed spawn maps to `CommandFailed` with no code; callers treat it
/// as fatal. A clean exit propagates the child's code.
pub fn run_entry_file(entry: &str, args: &serde_json::Value, cwd: &Path) -> Result<i32> {
    let code = loader_script(entry, args);
    tracing::debug!("Spawning interpreter: node -e {}", code);

    let status = spawn_platform("node", &["-e", &code])
        .current_dir(cwd)
        .stdin(std::process::Stdio::inherit())
        .stdout(std::process::Stdio::inherit())
        .stderr(std::process::Stdio::inherit())
        .status()
        .map_err(|e| GantryError::CommandFailed {
            command: format!("node -e ({})", e),
            code: None,
        })?;

    Ok(status.code().unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_script_embeds_entry_and_args() {
        let args = serde_json::json!(["my-app", {"force": true}]);
        let script = loader_script("/cache/pkg/lib/index.js", &args);

        assert_eq!(
            script,
            r#"require('/cache/pkg/lib/index.js').call(null, ["my-app",{"force":true}])"#
        );
    }

    #[test]
    fn loader_script_uses_forward_slashes_verbatim() {
        let args = serde_json::json!([]);
        let script = loader_script("C:/cache/pkg/index.js", &args);
        assert!(script.contains("C:/cache/pkg/index.js"));
        assert!(!script.contains('\\'));
    }
}
