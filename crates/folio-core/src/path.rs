use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Characters that are stripped from caller-supplied folder and item names.
const NAME_DENY_LIST: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Maps caller-supplied relative paths onto the store root.
///
/// Traversal never fails: a path that would climb above the root resolves to
/// the root itself.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn resolve(&self, relative: &str) -> PathBuf {
        let key = normalize(relative);
        let mut out = self.root.clone();
        for segment in split_key(&key) {
            out.push(segment);
        }
        if self.escapes_root(&out) {
            warn!(target: "folio::path", path = %relative, "resolved path escapes root; clamped");
            return self.root.clone();
        }
        out
    }

    /// Snapshot key for an absolute path under the root, if it is one.
    #[must_use]
    pub fn key_for(&self, absolute: &Path) -> Option<String> {
        let relative = absolute.strip_prefix(&self.root).ok()?;
        let segments = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect::<Vec<_>>();
        Some(normalize(&segments.join("/")))
    }

    fn escapes_root(&self, path: &Path) -> bool {
        if !path.exists() {
            return false;
        }
        let (Ok(root), Ok(resolved)) = (fs::canonicalize(&self.root), fs::canonicalize(path))
        else {
            return false;
        };
        !resolved.starts_with(root)
    }
}

/// Normalizes a relative path into a snapshot key.
///
/// Both `/` and `\` separate segments, empty and `.` segments are dropped and
/// `..` pops the previous segment. Climbing above the root yields the root key
/// (the empty string).
#[must_use]
pub fn normalize(relative: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for segment in relative.split(['/', '\\']) {
        match segment.trim() {
            "" | "." => {}
            ".." => {
                if out.pop().is_none() {
                    return String::new();
                }
            }
            _ => out.push(segment),
        }
    }
    out.join("/")
}

#[must_use]
pub fn join(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        normalize(child)
    } else {
        normalize(&format!("{parent}/{child}"))
    }
}

#[must_use]
pub fn parent_of(key: &str) -> Option<&str> {
    if key.is_empty() {
        return None;
    }
    Some(key.rsplit_once('/').map_or("", |(parent, _)| parent))
}

#[must_use]
pub fn last_segment(key: &str) -> &str {
    key.rsplit_once('/').map_or(key, |(_, leaf)| leaf)
}

/// True when `key` equals `prefix` or lies beneath it.
#[must_use]
pub fn is_within(key: &str, prefix: &str) -> bool {
    prefix.is_empty()
        || key == prefix
        || (key.starts_with(prefix)
            && key
                .as_bytes()
                .get(prefix.len())
                .is_some_and(|boundary| *boundary == b'/'))
}

/// Every key from `key` up to and including the root, nearest first.
pub fn ancestors(key: &str) -> impl Iterator<Item = &str> {
    let mut next = Some(key);
    std::iter::from_fn(move || {
        let current = next?;
        next = parent_of(current);
        Some(current)
    })
}

/// Strips characters that are unsafe in a single path segment.
#[must_use]
pub fn sanitize_name(input: &str) -> String {
    let cleaned = input
        .chars()
        .filter(|c| !NAME_DENY_LIST.contains(c) && !c.is_control())
        .collect::<String>();
    cleaned.trim().trim_matches('.').trim().to_string()
}

fn split_key(key: &str) -> impl Iterator<Item = &str> {
    key.split('/').filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn normalize_collapses_separators_and_dots() {
        assert_eq!(normalize("Movies//Action/./2024"), "Movies/Action/2024");
        assert_eq!(normalize("Movies\\Action"), "Movies/Action");
        assert_eq!(normalize("/Movies/"), "Movies");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_applies_parent_segments_inside_root() {
        assert_eq!(normalize("Movies/Action/../Drama"), "Movies/Drama");
        assert_eq!(normalize("Movies/.."), "");
    }

    #[test]
    fn normalize_clamps_escape_to_root() {
        assert_eq!(normalize(".."), "");
        assert_eq!(normalize("Movies/../../etc/passwd"), "");
        assert_eq!(normalize("../../../../tmp"), "");
    }

    #[test]
    fn resolve_never_leaves_root_for_traversal_inputs() {
        let temp = tempdir().expect("tempdir");
        let resolver = PathResolver::new(temp.path());
        for input in [
            "..",
            "../..",
            "a/../../b",
            "a/b/../../../c",
            "..\\..\\windows",
            "/../../etc",
            "./././..",
            "a/./b/../../..",
        ] {
            let resolved = resolver.resolve(input);
            assert!(
                resolved.starts_with(temp.path()),
                "{input} resolved outside root: {}",
                resolved.display()
            );
        }
        assert_eq!(resolver.resolve("a/../../b"), temp.path());
    }

    #[test]
    fn resolve_joins_normal_paths() {
        let temp = tempdir().expect("tempdir");
        let resolver = PathResolver::new(temp.path());
        assert_eq!(
            resolver.resolve("Movies/Action"),
            temp.path().join("Movies").join("Action")
        );
    }

    #[cfg(unix)]
    #[test]
    fn resolve_clamps_symlink_escape() {
        let temp = tempdir().expect("tempdir");
        let outside = tempdir().expect("outside");
        std::os::unix::fs::symlink(outside.path(), temp.path().join("escape"))
            .expect("symlink");

        let resolver = PathResolver::new(temp.path());
        assert_eq!(resolver.resolve("escape"), temp.path());
    }

    #[test]
    fn key_for_maps_absolute_paths_back() {
        let temp = tempdir().expect("tempdir");
        let resolver = PathResolver::new(temp.path());
        let abs = temp.path().join("Movies").join("Action");
        assert_eq!(resolver.key_for(&abs).as_deref(), Some("Movies/Action"));
        assert_eq!(resolver.key_for(temp.path()).as_deref(), Some(""));
    }

    #[test]
    fn path_helpers_walk_the_hierarchy() {
        assert_eq!(join("", "Movies"), "Movies");
        assert_eq!(join("Movies", "Action"), "Movies/Action");
        assert_eq!(parent_of("Movies/Action"), Some("Movies"));
        assert_eq!(parent_of("Movies"), Some(""));
        assert_eq!(parent_of(""), None);
        assert_eq!(last_segment("Movies/Action"), "Action");
        assert_eq!(
            ancestors("A/B/C").collect::<Vec<_>>(),
            vec!["A/B/C", "A/B", "A", ""]
        );
    }

    #[test]
    fn is_within_respects_segment_boundaries() {
        assert!(is_within("Movies/Action", "Movies"));
        assert!(is_within("Movies", "Movies"));
        assert!(is_within("anything", ""));
        assert!(!is_within("MoviesExtra", "Movies"));
    }

    #[test]
    fn sanitize_name_strips_deny_list() {
        assert_eq!(sanitize_name("Lost: Season 1?"), "Lost Season 1");
        assert_eq!(sanitize_name("../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_name("  a<b>c|d  "), "abcd");
        assert_eq!(sanitize_name("..."), "");
    }
}
