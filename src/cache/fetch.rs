//! Registry tarball unpacking.
//!
//! Published packages ship as gzipped tarballs whose contents sit under a
//! leading `package/` component. Installation strips that component and
//! unpacks the remainder into the package's cache directory.

use std::io::Cursor;
use std::path::{Component, Path};

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use tar::Archive;

/// Unpack a gzipped package tarball into `dest`.
///
/// The leading path component of every archive entry (conventionally
/// `package/`) is stripped. Entries that would escape `dest` via `..`
/// components are rejected.
pub fn unpack_tarball(bytes: &[u8], dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create cache directory {}", dest.display()))?;

    let decoder = GzDecoder::new(Cursor::new(bytes));
    let mut archive = Archive::new(decoder);

    for entry in archive.entries().context("Malformed tarball")? {
        let mut entry = entry.context("Malformed tarball entry")?;
        let path = entry.path().context("Malformed entry path")?.into_owned();

        let Some(stripped) = strip_root_component(&path) else {
            continue;
        };

        if stripped
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            bail!("Tarball entry escapes destination: {}", path.display());
        }

        let target = dest.join(&stripped);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        entry
            .unpack(&target)
            .with_context(|| format!("Failed to unpack {}", target.display()))?;
    }

    Ok(())
}

/// Drop the leading path component; `None` when nothing remains.
fn strip_root_component(path: &Path) -> Option<std::path::PathBuf> {
    let mut components = path.components();
    components.next()?;
    let rest = components.as_path();
    if rest.as_os_str().is_empty() {
        None
    } else {
        Some(rest.to_path_buf())
    }
}
