//! Package manifest reading and entry-file resolution.
//!
//! A cached package's entry point is declared by the `main` field of the
//! nearest `package.json` at or above its installed location. Resolved
//! entry paths are normalized to forward slashes regardless of host
//! convention, so they can be embedded in generated `require(...)` code.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::error::Result;

/// The subset of `package.json` gantry cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageManifest {
    /// Package name.
    #[serde(default)]
    pub name: Option<String>,

    /// Package version.
    #[serde(default)]
    pub version: Option<String>,

    /// Relative path of the package entry file.
    #[serde(default)]
    pub main: Option<String>,
}

/// Find the nearest directory at or above `start` containing `package.json`.
pub fn find_manifest_dir(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);

    while let Some(current) = dir {
        if current.join("package.json").is_file() {
            return Some(current.to_path_buf());
        }
        dir = current.parent();
    }

    None
}

/// Read and parse `<dir>/package.json`.
pub fn read_manifest(dir: &Path) -> Result<PackageManifest> {
    let path = dir.join("package.json");
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read manifest at {}", path.display()))?;

    let manifest: PackageManifest = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse manifest at {}", path.display()))?;

    Ok(manifest)
}

/// Resolve the entry file declared by the nearest manifest above `start`.
///
/// Returns `None` when no manifest is found or the manifest declares no
/// `main` field; callers must treat that as a resolution failure, never as
/// an implicit no-op.
pub fn entry_file(start: &Path) -> Result<Option<String>> {
    let Some(dir) = find_manifest_dir(start) else {
        return Ok(None);
    };

    let manifest = read_manifest(&dir)?;

    let Some(main) = manifest.main else {
        return Ok(None);
    };

    Ok(Some(normalize_separators(&dir.join(main))))
}

/// Render a path with forward slashes regardless of host convention.
pub fn normalize_separators(path: &Path) -> String {
    let rendered = path.display().to_string();
    if std::path::MAIN_SEPARATOR == '/' {
        rendered
    } else {
        rendered.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn find_manifest_dir_at_start() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();

        let found = find_manifest_dir(temp.path()).unwrap();
        assert_eq!(found, temp.path());
    }

    #[test]
    fn find_manifest_dir_walks_up() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();
        let nested = temp.path().join("lib").join("deep");
        fs::create_dir_all(&nested).unwrap();

        let found = find_manifest_dir(&nested).unwrap();
        assert_eq!(found, temp.path());
    }

    #[test]
    fn find_manifest_dir_none_when_absent() {
        let temp = TempDir::new().unwrap();
        // No package.json anywhere under the temp root; the walk may still
        // find one above it on exotic setups, so scope to a fresh subdir
        // only when the machine root is clean.
        let nested = temp.path().join("empty");
        fs::create_dir_all(&nested).unwrap();

        if find_manifest_dir(temp.path()).is_none() {
            assert!(find_manifest_dir(&nested).is_none());
        }
    }

    #[test]
    fn entry_file_resolves_main() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"name": "pkg", "version": "1.0.0", "main": "lib/index.js"}"#,
        )
        .unwrap();

        let entry = entry_file(temp.path()).unwrap().unwrap();
        assert!(entry.ends_with("lib/index.js"));
        assert!(!entry.contains('\\'));
    }

    #[test]
    fn entry_file_none_without_main() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), r#"{"name": "pkg"}"#).unwrap();

        assert!(entry_file(temp.path()).unwrap().is_none());
    }

    #[test]
    fn entry_file_errors_on_malformed_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), "not json").unwrap();

        assert!(entry_file(temp.path()).is_err());
    }

    #[test]
    fn normalize_separators_keeps_forward_slashes() {
        let normalized = normalize_separators(Path::new("/a/b/c.js"));
        assert_eq!(normalized, "/a/b/c.js");
    }
}
