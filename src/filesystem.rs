//! Filesystem capability used by link reconciliation and manifest reading
//!
//! The engine never touches `std::fs` directly. Everything it needs (existence
//! checks, directory symlinks, reading manifests) goes through the
//! [`FileSystem`] trait so the algorithms can run against [`MemoryFS`] in tests
//! and against [`OsFileSystem`] in the binary.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::path::normalize;

/// Maximum number of symlinks followed while resolving a single path.
const MAX_SYMLINK_DEPTH: usize = 40;

/// Trait for filesystem operations - allows an in-memory fake in tests
pub trait FileSystem: Send + Sync {
    /// Whether `path` exists, following symlinks. A dangling symlink does not
    /// exist.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory, following symlinks.
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether `path` is a regular file, following symlinks.
    fn is_file(&self, path: &Path) -> bool;

    /// Whether `path` is a directory with at least one entry.
    ///
    /// Missing paths, files and empty directories are not populated.
    fn is_populated(&self, path: &Path) -> bool;

    /// Whether `path` itself is a symlink (not followed).
    fn is_symlink(&self, path: &Path) -> bool;

    /// Read the target of the symlink at `path`.
    fn read_link(&self, path: &Path) -> Result<PathBuf>;

    /// Resolve `path` to its physical location, following every symlink.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Create `path` and all of its missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Remove a file, an empty directory or a symlink at `path`.
    fn remove(&self, path: &Path) -> Result<()>;

    /// Create a directory symlink at `link` pointing to `target`.
    fn symlink_dir(&self, target: &Path, link: &Path) -> Result<()>;

    /// Read a UTF-8 text file.
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// The default implementation of `FileSystem`, backed by the host
/// filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_populated(&self, path: &Path) -> bool {
        fs::read_dir(path)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|metadata| metadata.file_type().is_symlink())
            .unwrap_or(false)
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        Ok(fs::read_link(path)?)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        Ok(fs::canonicalize(path)?)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        Ok(fs::create_dir_all(path)?)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let metadata = fs::symlink_metadata(path)?;
        let file_type = metadata.file_type();

        if file_type.is_symlink() {
            remove_symlink(path)?;
        } else if file_type.is_dir() {
            fs::remove_dir(path)?;
        } else {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn symlink_dir(&self, target: &Path, link: &Path) -> Result<()> {
        #[cfg(unix)]
        std::os::unix::fs::symlink(target, link)?;
        #[cfg(windows)]
        std::os::windows::fs::symlink_dir(target, link)?;
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }
}

#[cfg(unix)]
fn remove_symlink(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

// Directory symlinks on Windows are removed as directories.
#[cfg(windows)]
fn remove_symlink(path: &Path) -> io::Result<()> {
    fs::remove_dir(path).or_else(|_| fs::remove_file(path))
}

/// An entry of the in-memory filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File(String),
    Symlink(PathBuf),
}

/// In-memory filesystem with directories, files and symlinks
///
/// Entries are keyed by absolute physical path. Clones share the same
/// underlying tree, so a test can hand one handle to the engine and another to
/// a mock git implementation that "clones" by writing files.
#[derive(Debug, Clone, Default)]
pub struct MemoryFS {
    nodes: Arc<Mutex<BTreeMap<PathBuf, Node>>>,
}

impl MemoryFS {
    /// Create a new empty filesystem (only `/` exists)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory and all of its parents
    pub fn add_dir<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.create_dir_all(path.as_ref())
    }

    /// Add or replace a text file, creating its parent directories
    pub fn add_file<P: AsRef<Path>>(&self, path: P, content: &str) -> Result<()> {
        let path = normalize(path.as_ref());
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        let mut nodes = self.lock();
        let physical = Self::resolve_parent(&nodes, &path)?;
        if let Some(Node::Dir) = nodes.get(&physical) {
            return Err(Error::Filesystem {
                message: format!("Is a directory: {}", path.display()),
            });
        }
        nodes.insert(physical, Node::File(content.to_string()));
        Ok(())
    }

    /// Add a symlink, creating the parent directories of the link
    pub fn add_symlink<P: AsRef<Path>, Q: AsRef<Path>>(&self, target: P, link: Q) -> Result<()> {
        let link = normalize(link.as_ref());
        if let Some(parent) = link.parent() {
            self.create_dir_all(parent)?;
        }
        self.symlink_dir(target.as_ref(), &link)
    }

    /// Number of entries (directories, files and symlinks), excluding `/`
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the filesystem holds nothing but `/`
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// All symlinks as `(link, target)` pairs, sorted by link path
    pub fn symlinks(&self) -> Vec<(PathBuf, PathBuf)> {
        self.lock()
            .iter()
            .filter_map(|(path, node)| match node {
                Node::Symlink(target) => Some((path.clone(), target.clone())),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Node>> {
        self.nodes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_root(path: &Path) -> bool {
        path.parent().is_none()
    }

    fn node<'a>(nodes: &'a BTreeMap<PathBuf, Node>, physical: &Path) -> Option<&'a Node> {
        if Self::is_root(physical) {
            Some(&Node::Dir)
        } else {
            nodes.get(physical)
        }
    }

    /// Resolve every component of `path`, following symlinks.
    fn resolve(nodes: &BTreeMap<PathBuf, Node>, path: &Path, depth: usize) -> Result<PathBuf> {
        let mut current = PathBuf::new();

        for component in normalize(path).components() {
            current.push(component.as_os_str());

            if let Some(Node::Symlink(target)) = nodes.get(&current) {
                if depth >= MAX_SYMLINK_DEPTH {
                    return Err(Error::Filesystem {
                        message: format!("Too many levels of symbolic links: {}", path.display()),
                    });
                }
                let base = current.parent().unwrap_or(Path::new("/")).to_path_buf();
                current = Self::resolve(nodes, &base.join(target), depth + 1)?;
            }
        }

        Ok(current)
    }

    /// Resolve the parent of `path` but not its final component.
    fn resolve_parent(nodes: &BTreeMap<PathBuf, Node>, path: &Path) -> Result<PathBuf> {
        let path = normalize(path);
        match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) => Ok(Self::resolve(nodes, parent, 0)?.join(name)),
            _ => Ok(path),
        }
    }

    fn has_children(nodes: &BTreeMap<PathBuf, Node>, physical: &Path) -> bool {
        nodes.keys().any(|key| key.parent() == Some(physical))
    }

    fn followed(&self, path: &Path) -> Option<Node> {
        let nodes = self.lock();
        let physical = Self::resolve(&nodes, path, 0).ok()?;
        Self::node(&nodes, &physical).cloned()
    }

    fn not_found(path: &Path) -> Error {
        Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("No such file or directory: {}", path.display()),
        ))
    }
}

impl FileSystem for MemoryFS {
    fn exists(&self, path: &Path) -> bool {
        self.followed(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.followed(path), Some(Node::Dir))
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.followed(path), Some(Node::File(_)))
    }

    fn is_populated(&self, path: &Path) -> bool {
        let nodes = self.lock();
        match Self::resolve(&nodes, path, 0) {
            Ok(physical) => {
                matches!(Self::node(&nodes, &physical), Some(Node::Dir))
                    && Self::has_children(&nodes, &physical)
            }
            Err(_) => false,
        }
    }

    fn is_symlink(&self, path: &Path) -> bool {
        let nodes = self.lock();
        match Self::resolve_parent(&nodes, path) {
            Ok(physical) => matches!(nodes.get(&physical), Some(Node::Symlink(_))),
            Err(_) => false,
        }
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        let nodes = self.lock();
        let physical = Self::resolve_parent(&nodes, path)?;
        match nodes.get(&physical) {
            Some(Node::Symlink(target)) => Ok(target.clone()),
            Some(_) => Err(Error::Filesystem {
                message: format!("Not a symbolic link: {}", path.display()),
            }),
            None => Err(Self::not_found(path)),
        }
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        let nodes = self.lock();
        let physical = Self::resolve(&nodes, path, 0)?;
        match Self::node(&nodes, &physical) {
            Some(_) => Ok(physical),
            None => Err(Self::not_found(path)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut nodes = self.lock();
        let mut current = PathBuf::new();

        for component in normalize(path).components() {
            current.push(component.as_os_str());
            current = Self::resolve(&nodes, &current, 0)?;

            match Self::node(&nodes, &current) {
                Some(Node::Dir) => {}
                Some(_) => {
                    return Err(Error::Filesystem {
                        message: format!("Not a directory: {}", current.display()),
                    })
                }
                None => {
                    nodes.insert(current.clone(), Node::Dir);
                }
            }
        }
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let mut nodes = self.lock();
        let physical = Self::resolve_parent(&nodes, path)?;

        let removable = match nodes.get(&physical) {
            None => return Err(Self::not_found(path)),
            Some(Node::Dir) => !Self::has_children(&nodes, &physical),
            Some(_) => true,
        };
        if !removable {
            return Err(Error::Filesystem {
                message: format!("Directory not empty: {}", path.display()),
            });
        }

        nodes.remove(&physical);
        Ok(())
    }

    fn symlink_dir(&self, target: &Path, link: &Path) -> Result<()> {
        let mut nodes = self.lock();
        let physical = Self::resolve_parent(&nodes, link)?;

        if let Some(parent) = physical.parent() {
            if !matches!(Self::node(&nodes, parent), Some(Node::Dir)) {
                return Err(Self::not_found(parent));
            }
        }
        if nodes.contains_key(&physical) || Self::is_root(&physical) {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("File exists: {}", link.display()),
            )));
        }

        nodes.insert(physical, Node::Symlink(target.to_path_buf()));
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        match self.followed(path) {
            Some(Node::File(content)) => Ok(content),
            Some(_) => Err(Error::Filesystem {
                message: format!("Not a file: {}", path.display()),
            }),
            None => Err(Self::not_found(path)),
        }
    }
}
