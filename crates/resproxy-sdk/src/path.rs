//! Repository path helpers
//!
//! Paths are `/`-separated. The root is `/`. Absolute paths start with `/`;
//! anything else is relative to some base resource.

/// Path separator
pub const SEPARATOR: char = '/';

/// The repository root
pub const ROOT: &str = "/";

/// Whether `path` is absolute
pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEPARATOR)
}

/// Normalise an absolute path: collapse repeated separators, drop `.`
/// segments, apply `..` segments and strip a trailing separator.
///
/// Returns `None` if the path is not absolute or `..` climbs above the root.
pub fn normalize(path: &str) -> Option<String> {
    if !is_absolute(path) {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        Some(ROOT.to_string())
    } else {
        Some(format!("/{}", segments.join("/")))
    }
}

/// Resolve `path` against `base`. Absolute paths ignore the base.
pub fn resolve(base: &str, path: &str) -> Option<String> {
    if is_absolute(path) {
        normalize(path)
    } else {
        normalize(&format!("{}/{}", base, path))
    }
}

/// Parent of a normalised absolute path; the root has no parent
pub fn parent(path: &str) -> Option<&str> {
    if path == ROOT {
        return None;
    }
    match path.rfind(SEPARATOR) {
        Some(0) => Some(ROOT),
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}

/// Last segment of a path (empty for the root)
pub fn name(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/").as_deref(), Some("/"));
        assert_eq!(normalize("/content//test/").as_deref(), Some("/content/test"));
        assert_eq!(normalize("/content/./a/../b").as_deref(), Some("/content/b"));
        assert_eq!(normalize("/.."), None);
        assert_eq!(normalize("content"), None);
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("/content/test", "jcr:content").as_deref(), Some("/content/test/jcr:content"));
        assert_eq!(resolve("/content/test", "../other").as_deref(), Some("/content/other"));
        assert_eq!(resolve("/content/test", "/etc/tags").as_deref(), Some("/etc/tags"));
        assert_eq!(resolve("/", "a").as_deref(), Some("/a"));
        assert_eq!(resolve("/a", "../.."), None);
    }

    #[test]
    fn test_parent_and_name() {
        assert_eq!(parent("/content/test"), Some("/content"));
        assert_eq!(parent("/content"), Some("/"));
        assert_eq!(parent("/"), None);
        assert_eq!(name("/content/test"), "test");
        assert_eq!(name("/"), "");
    }
}
