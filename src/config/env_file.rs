//! Dotenv file parsing.
//!
//! Gantry reads `<home>/.env` on startup so users can pin the registry,
//! catalog URL, or a local target-path override without exporting
//! variables in their shell profile.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Result};

/// Parse dotenv-format content into a key/value map.
///
/// Supports:
/// - `KEY=value` lines
/// - Single- or double-quoted values (quotes stripped)
/// - `#` comment lines and blank lines (skipped)
///
/// # Errors
///
/// Returns an error for lines that are neither comments nor `KEY=value`.
pub fn parse_dotenv(content: &str, path: &Path) -> Result<HashMap<String, String>> {
    let mut env = HashMap::new();

    for (lineno, raw) in content.lines().enumerate() {
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            bail!(
                "Invalid line {} in {}: expected KEY=value",
                lineno + 1,
                path.display()
            );
        };

        let key = key.trim().to_string();
        let value = strip_quotes(value.trim()).to_string();

        env.insert(key, value);
    }

    Ok(env)
}

/// Strip matching single or double quotes from a value.
fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 {
        let bytes = value.as_bytes();
        let first = bytes[0];
        let last = bytes[value.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Load `<dir>/.env` into the process environment.
///
/// Variables already present in the environment win; the file only fills
/// gaps. A missing file is not an error.
pub fn load_env_file(dir: &Path) -> Result<()> {
    let path = dir.join(".env");
    if !path.exists() {
        return Ok(());
    }

    let content = std::fs::read_to_string(&path)?;
    let parsed = parse_dotenv(&content, &path)?;

    for (key, value) in parsed {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(&key, &value);
        }
    }

    Ok(())
}
