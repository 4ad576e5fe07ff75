//! In-memory storage provider.
//!
//! Holds an ordered map of path -> node, so listings come back sorted. Every
//! primitive bumps a counter in [`StorageStats`]; tests use this to check how
//! many calls an operation made (or that it made none at all).

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use super::{EntryKind, StorageProvider};
use crate::errors::{FsTreeError, Result};

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir,
}

/// Per-primitive call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub exists: usize,
    pub list_files: usize,
    pub list_directories: usize,
    pub copy_file_bytes: usize,
    pub create_directory: usize,
    pub remove_file: usize,
    pub remove_directory_recursive: usize,
    pub rename_path: usize,
}

impl StorageStats {
    /// Listing calls of either kind.
    pub fn listings(&self) -> usize {
        self.list_files + self.list_directories
    }

    /// Every call, stat included.
    pub fn total(&self) -> usize {
        self.exists
            + self.listings()
            + self.copy_file_bytes
            + self.create_directory
            + self.remove_file
            + self.remove_directory_recursive
            + self.rename_path
    }
}

/// A file tree that lives entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
    failing: RefCell<BTreeSet<PathBuf>>,
    stats: Cell<StorageStats>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its ancestors.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.nodes
            .borrow_mut()
            .insert(path.to_path_buf(), Node::File(contents.as_ref().to_vec()));
    }

    /// Seed a directory and its ancestors.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut nodes = self.nodes.borrow_mut();
        for anc in path.as_ref().ancestors() {
            if is_top(anc) {
                break;
            }
            nodes.entry(anc.to_path_buf()).or_insert(Node::Dir);
        }
    }

    /// Contents of a file, if `path` is one.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.nodes.borrow().get(path.as_ref()) {
            Some(Node::File(bytes)) => Some(bytes.clone()),
            _ => None,
        }
    }

    /// Every stored path, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.nodes.borrow().keys().cloned().collect()
    }

    /// Make every primitive except `exists` fail with PermissionDenied when it
    /// touches `path`.
    pub fn fail_on(&self, path: impl AsRef<Path>) {
        self.failing.borrow_mut().insert(path.as_ref().to_path_buf());
    }

    pub fn stats(&self) -> StorageStats {
        self.stats.get()
    }

    pub fn reset_stats(&self) {
        self.stats.set(StorageStats::default());
    }

    fn bump(&self, f: impl FnOnce(&mut StorageStats)) {
        let mut s = self.stats.get();
        f(&mut s);
        self.stats.set(s);
    }

    fn check(&self, op: &'static str, path: &Path) -> Result<()> {
        if self.failing.borrow().contains(path) {
            return Err(FsTreeError::io(
                op,
                path,
                io::Error::from(io::ErrorKind::PermissionDenied),
            ));
        }
        Ok(())
    }

    fn kind(&self, path: &Path) -> EntryKind {
        if is_top(path) {
            return EntryKind::Directory;
        }
        match self.nodes.borrow().get(path) {
            Some(Node::File(_)) => EntryKind::File,
            Some(Node::Dir) => EntryKind::Directory,
            None => EntryKind::None,
        }
    }

    fn children(&self, op: &'static str, dir: &Path, want_dirs: bool) -> Result<Vec<PathBuf>> {
        self.check(op, dir)?;
        match self.kind(dir) {
            EntryKind::Directory => {}
            EntryKind::None => return Err(FsTreeError::NotFound(dir.to_path_buf())),
            EntryKind::File => {
                return Err(FsTreeError::invalid_input(op, dir, "not a directory"));
            }
        }
        Ok(self
            .nodes
            .borrow()
            .iter()
            .filter(|(p, _)| p.parent() == Some(dir))
            .filter(|(_, n)| matches!(n, Node::Dir) == want_dirs)
            .filter_map(|(p, _)| p.file_name().map(|name| dir.join(name)))
            .collect())
    }

    fn parent_is_dir(&self, path: &Path) -> bool {
        match path.parent() {
            None => true,
            Some(p) => self.kind(p).is_dir(),
        }
    }
}

/// The implicit top of the tree: "" or a filesystem root.
fn is_top(path: &Path) -> bool {
    path.as_os_str().is_empty() || path.parent().is_none()
}

fn not_found(op: &'static str, path: &Path) -> FsTreeError {
    FsTreeError::io(op, path, io::Error::from(io::ErrorKind::NotFound))
}

impl StorageProvider for MemoryStorage {
    fn exists(&self, path: &Path) -> EntryKind {
        self.bump(|s| s.exists += 1);
        self.kind(path)
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.bump(|s| s.list_files += 1);
        self.children("list files", dir, false)
    }

    fn list_directories(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.bump(|s| s.list_directories += 1);
        self.children("list directories", dir, true)
    }

    fn copy_file_bytes(&self, from: &Path, to: &Path) -> Result<()> {
        self.bump(|s| s.copy_file_bytes += 1);
        self.check("open source file", from)?;
        self.check("create destination file", to)?;
        let bytes = match self.nodes.borrow().get(from) {
            Some(Node::File(b)) => b.clone(),
            Some(Node::Dir) => {
                return Err(FsTreeError::invalid_input("open source file", from, "is a directory"));
            }
            None => return Err(FsTreeError::NotFound(from.to_path_buf())),
        };
        if self.kind(to) != EntryKind::None {
            return Err(FsTreeError::AlreadyExists(to.to_path_buf()));
        }
        if !self.parent_is_dir(to) {
            return Err(not_found("create destination file", to));
        }
        self.nodes.borrow_mut().insert(to.to_path_buf(), Node::File(bytes));
        Ok(())
    }

    fn create_directory(&self, path: &Path) -> Result<()> {
        self.bump(|s| s.create_directory += 1);
        self.check("create directory", path)?;
        if self.kind(path) != EntryKind::None {
            return Err(FsTreeError::io(
                "create directory",
                path,
                io::Error::from(io::ErrorKind::AlreadyExists),
            ));
        }
        if !self.parent_is_dir(path) {
            return Err(not_found("create directory", path));
        }
        self.nodes.borrow_mut().insert(path.to_path_buf(), Node::Dir);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.bump(|s| s.remove_file += 1);
        self.check("remove file", path)?;
        match self.kind(path) {
            EntryKind::File => {
                self.nodes.borrow_mut().remove(path);
                Ok(())
            }
            EntryKind::None => Err(FsTreeError::NotFound(path.to_path_buf())),
            EntryKind::Directory => Err(FsTreeError::invalid_input("remove file", path, "is a directory")),
        }
    }

    fn remove_directory_recursive(&self, path: &Path) -> Result<()> {
        self.bump(|s| s.remove_directory_recursive += 1);
        self.check("remove directory", path)?;
        match self.kind(path) {
            EntryKind::Directory => {
                self.nodes.borrow_mut().retain(|p, _| !p.starts_with(path));
                Ok(())
            }
            EntryKind::None => Err(FsTreeError::NotFound(path.to_path_buf())),
            EntryKind::File => Err(FsTreeError::invalid_input("remove directory", path, "not a directory")),
        }
    }

    fn rename_path(&self, from: &Path, to: &Path) -> Result<()> {
        self.bump(|s| s.rename_path += 1);
        self.check("rename", from)?;
        self.check("rename", to)?;
        let from_kind = self.kind(from);
        if from_kind == EntryKind::None {
            return Err(FsTreeError::NotFound(from.to_path_buf()));
        }
        if !self.parent_is_dir(to) {
            return Err(not_found("rename", to));
        }
        if to.starts_with(from) && to != from {
            return Err(FsTreeError::invalid_input("rename", to, "destination is inside the source"));
        }
        let to_kind = self.kind(to);
        let to_has_children = self.nodes.borrow().keys().any(|p| p.parent() == Some(to));
        match (from_kind, to_kind) {
            (_, EntryKind::None) | (EntryKind::File, EntryKind::File) => {}
            (EntryKind::Directory, EntryKind::Directory) if !to_has_children => {}
            _ => {
                return Err(FsTreeError::io(
                    "rename",
                    to,
                    io::Error::from(io::ErrorKind::AlreadyExists),
                ));
            }
        }

        let mut nodes = self.nodes.borrow_mut();
        let moved: Vec<(PathBuf, Node)> = nodes
            .iter()
            .filter(|(p, _)| p.starts_with(from))
            .map(|(p, n)| (p.clone(), n.clone()))
            .collect();
        nodes.retain(|p, _| !p.starts_with(from));
        nodes.remove(to);
        for (p, n) in moved {
            let target = match p.strip_prefix(from) {
                Ok(rel) if rel.as_os_str().is_empty() => to.to_path_buf(),
                Ok(rel) => to.join(rel),
                Err(_) => continue,
            };
            nodes.insert(target, n);
        }
        Ok(())
    }
}
