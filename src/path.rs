//! Path manipulation utilities for gil
//!
//! Manifest paths are resolved lexically: `.` and `..` components are folded
//! without consulting the filesystem, so a path declared through a symlinked
//! directory keeps the location the manifest asked for rather than the
//! physical target of the link.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path, folding `.` and `..` components.
///
/// A `..` directly below the root is dropped (the parent of `/` is `/`).
/// Leading `..` components of a relative path are preserved.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::RootDir => result.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match result.components().next_back() {
                Some(Component::Normal(_)) => {
                    result.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => result.push(".."),
            },
            Component::Normal(name) => result.push(name),
        }
    }

    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

/// Resolve `relative` against the directory `base`.
///
/// If `relative` is already absolute it replaces `base`, matching
/// `Path::join` semantics. The result is normalized.
pub fn resolve(base: &Path, relative: &str) -> PathBuf {
    normalize(&base.join(relative))
}

/// Return every ancestor of `path` including `path` itself, outermost first.
///
/// For `/a/b` this yields `/`, `/a`, `/a/b`.
pub fn ancestors_outermost_first(path: &Path) -> Vec<PathBuf> {
    let mut chain: Vec<PathBuf> = path.ancestors().map(Path::to_path_buf).collect();
    chain.reverse();
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_dots() {
        assert_eq!(
            normalize(Path::new("/work/./vendor/../lib")),
            PathBuf::from("/work/lib")
        );
        assert_eq!(normalize(Path::new("/work/a/b/../../c")), PathBuf::from("/work/c"));
    }

    #[test]
    fn test_normalize_parent_of_root_is_root() {
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize(Path::new("/../../a")), PathBuf::from("/a"));
    }

    #[test]
    fn test_normalize_relative_keeps_leading_parents() {
        assert_eq!(normalize(Path::new("../a/./b")), PathBuf::from("../a/b"));
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_resolve_relative_to_manifest_dir() {
        assert_eq!(
            resolve(Path::new("/work/project"), "./vendor/libcore"),
            PathBuf::from("/work/project/vendor/libcore")
        );
        assert_eq!(
            resolve(Path::new("/work/project"), "../shared"),
            PathBuf::from("/work/shared")
        );
    }

    #[test]
    fn test_resolve_absolute_token_wins() {
        assert_eq!(
            resolve(Path::new("/work/project"), "/opt/lib"),
            PathBuf::from("/opt/lib")
        );
    }

    #[test]
    fn test_ancestors_outermost_first() {
        assert_eq!(
            ancestors_outermost_first(Path::new("/a/b")),
            vec![
                PathBuf::from("/"),
                PathBuf::from("/a"),
                PathBuf::from("/a/b")
            ]
        );
        assert_eq!(
            ancestors_outermost_first(Path::new("/")),
            vec![PathBuf::from("/")]
        );
    }
}
