//! Template rendering.
//!
//! Rendered files use `${variable}` placeholders resolved from
//! [`ProjectInfo`](crate::project::ProjectInfo) fields. `$${escaped}`
//! produces a literal `${escaped}` in the output.
//!
//! Rendering a directory fans out across files on threads (each file is a
//! disjoint on-disk resource) and joins before returning; the first error
//! aborts the step. No rollback is attempted — a partially rendered
//! target after a failure is a declared inconsistent state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};

use super::ignore::IgnoreSet;
use crate::error::Result;

/// A segment of a templated string.
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    /// Literal text.
    Literal(String),
    /// Variable reference: `${name}`.
    Variable(String),
}

/// Parse a string containing `${var}` placeholders.
fn parse_placeholders(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut chars = input.chars().peekable();
    let mut current_literal = String::new();

    while let Some(c) = chars.next() {
        if c == '$' {
            match chars.peek() {
                Some('$') => {
                    chars.next();
                    if chars.peek() == Some(&'{') {
                        // $${...} -> literal ${...}
                        chars.next();
                        current_literal.push('$');
                        current_literal.push('{');
                        while let Some(&c) = chars.peek() {
                            chars.next();
                            current_literal.push(c);
                            if c == '}' {
                                break;
                            }
                        }
                    } else {
                        current_literal.push('$');
                    }
                }
                Some('{') => {
                    chars.next();

                    if !current_literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut current_literal)));
                    }

                    let mut var_name = String::new();
                    while let Some(&c) = chars.peek() {
                        if c == '}' {
                            chars.next();
                            break;
                        }
                        var_name.push(chars.next().unwrap());
                    }

                    segments.push(Segment::Variable(var_name));
                }
                _ => {
                    current_literal.push(c);
                }
            }
        } else {
            current_literal.push(c);
        }
    }

    if !current_literal.is_empty() {
        segments.push(Segment::Literal(current_literal));
    }

    segments
}

/// Resolve all placeholders in a string.
///
/// # Errors
///
/// Fails when a placeholder names a variable absent from the context.
pub fn render_string(input: &str, context: &HashMap<String, String>) -> Result<String> {
    let mut result = String::with_capacity(input.len());

    for segment in parse_placeholders(input) {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Variable(name) => {
                let value = context
                    .get(&name)
                    .ok_or_else(|| anyhow!("Unresolved template variable: ${{{}}}", name))?;
                result.push_str(value);
            }
        }
    }

    Ok(result)
}

/// Rewrite one file in place, substituting placeholders.
///
/// Files that are not valid UTF-8 are left untouched (binary assets that
/// slipped past the ignore set). Returns whether the file was rewritten.
pub fn render_file(path: &Path, context: &HashMap<String, String>) -> Result<bool> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let Ok(content) = String::from_utf8(bytes) else {
        tracing::debug!("Skipping non-text file {}", path.display());
        return Ok(false);
    };

    let rendered = render_string(&content, context)
        .map_err(|e| anyhow!("Failed to render {}: {}", path.display(), e))?;

    if rendered == content {
        return Ok(false);
    }

    std::fs::write(path, rendered)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(true)
}

/// Render every non-ignored file under `target` in place.
///
/// Files are processed concurrently; the whole step completes (or fails)
/// before returning. Returns the number of rewritten files.
pub fn render_dir(
    target: &Path,
    ignore: &IgnoreSet,
    context: &HashMap<String, String>,
) -> Result<usize> {
    let mut files = Vec::new();
    collect_files(target, target, ignore, &mut files)?;

    let mut rendered = 0;
    let results: Vec<Result<bool>> = std::thread::scope(|scope| {
        let handles: Vec<_> = files
            .iter()
            .map(|path| scope.spawn(move || render_file(path, context)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("render thread panicked"))
            .collect()
    });

    for result in results {
        if result? {
            rendered += 1;
        }
    }

    Ok(rendered)
}

/// Collect non-directory, non-ignored files under `dir` recursively.
fn collect_files(
    root: &Path,
    dir: &Path,
    ignore: &IgnoreSet,
    out: &mut Vec<PathBuf>,
) -> Result<()> {
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        let rel = relative_slash_path(root, &path);

        if path.is_dir() {
            collect_files(root, &path, ignore, out)?;
        } else if !ignore.is_ignored(&rel) {
            out.push(path);
        }
    }

    Ok(())
}

/// Relative path from `root`, rendered with forward slashes.
fn relative_slash_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
