//! Render-exclusion globs.
//!
//! Templates declare glob patterns for files that must be copied verbatim
//! (binary assets, public directories). The combined ignore set always
//! contains `node_modules/**` in addition to the template's own patterns.
//!
//! Patterns match `/`-separated paths relative to the target directory;
//! `*` matches within a segment, `**` matches zero or more segments.

/// Pattern always excluded from rendering.
const ALWAYS_IGNORED: &str = "node_modules/**";

/// The combined set of render-exclusion patterns for one template.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    patterns: Vec<String>,
}

impl IgnoreSet {
    /// Build the combined set from a template's declared patterns.
    pub fn new(template_patterns: &[String]) -> Self {
        let mut patterns = vec![ALWAYS_IGNORED.to_string()];
        patterns.extend(template_patterns.iter().cloned());
        Self { patterns }
    }

    /// Check a `/`-separated relative path against the set.
    pub fn is_ignored(&self, rel_path: &str) -> bool {
        self.patterns.iter().any(|p| glob_match(p, rel_path))
    }
}

/// Match a glob pattern against a relative path.
pub fn glob_match(pattern: &str, path: &str) -> bool {
    let pattern_segs: Vec<&str> = pattern.split('/').collect();
    let path_segs: Vec<&str> = path.split('/').collect();
    match_segments(&pattern_segs, &path_segs)
}

fn match_segments(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.first() {
        None => path.is_empty(),
        Some(&"**") => {
            // Zero or more segments.
            if match_segments(&pattern[1..], path) {
                return true;
            }
            !path.is_empty() && match_segments(pattern, &path[1..])
        }
        Some(seg) => match path.first() {
            Some(first) if segment_match(seg, first) => match_segments(&pattern[1..], &path[1..]),
            _ => false,
        },
    }
}

/// Match one path segment against one pattern segment (`*` wildcard).
fn segment_match(pattern: &str, segment: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == segment;
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let mut rest = segment;

    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            let Some(stripped) = rest.strip_prefix(part) else {
                return false;
            };
            rest = stripped;
        } else if i == parts.len() - 1 {
            let Some(idx) = rest.rfind(part) else {
                return false;
            };
            if idx + part.len() != rest.len() {
                return false;
            }
            rest = "";
        } else {
            let Some(idx) = rest.find(part) else {
                return false;
            };
            rest = &rest[idx + part.len()..];
        }
    }

    // A pattern not ending in '*' must have consumed the whole segment.
    parts.last().map(|p| p.is_empty()).unwrap_or(false) || rest.is_empty()
}
