//! Path resolution for method descriptors
//!
//! - a path starting with `/` is absolute
//! - any other non-empty path is relative to the backing resource
//! - no path means the backing resource itself
//!
//! `.` and `..` segments are normalised; climbing above the root resolves
//! to nothing.

use resproxy_sdk::{path as repo_path, ResourceRef};

/// `path/name` when both are present, else whichever is present
pub fn compound_key(path: Option<&str>, name: &str) -> String {
    match path {
        Some(path) if !path.is_empty() && !name.is_empty() => {
            format!("{}/{}", path.trim_end_matches(repo_path::SEPARATOR), name)
        }
        Some(path) if name.is_empty() => path.to_string(),
        _ => name.to_string(),
    }
}

/// Fold the directory part of a property name into the path:
/// `(None, "jcr:content/title")` becomes `(Some("jcr:content"), "title")`.
pub fn split_property(path: Option<String>, name: &str) -> (Option<String>, String) {
    match name.rfind(repo_path::SEPARATOR) {
        Some(idx) => {
            let dir = &name[..idx];
            let leaf = name[idx + 1..].to_string();
            let folded = if dir.is_empty() {
                path.or_else(|| Some(repo_path::ROOT.to_string()))
            } else {
                match path {
                    Some(path) => Some(compound_key(Some(&path), dir)),
                    None => Some(dir.to_string()),
                }
            };
            (folded, leaf)
        }
        None => (path, name.to_string()),
    }
}

/// Absolute path a descriptor path points at, relative to `base`
pub fn resolve_location(base: &str, path: Option<&str>) -> Option<String> {
    match path {
        None => repo_path::normalize(base),
        Some(path) => repo_path::resolve(base, path),
    }
}

/// Resource a descriptor path points at. `None` path is the backing
/// resource itself and needs no repository lookup.
pub fn locate(backing: &ResourceRef, path: Option<&str>) -> Option<ResourceRef> {
    match path {
        None => Some(backing.clone()),
        Some(path) => {
            let absolute = resolve_location(backing.path(), Some(path))?;
            if absolute == backing.path() {
                return Some(backing.clone());
            }
            backing.resolver().get_resource(&absolute)
        }
    }
}
