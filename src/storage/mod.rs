//! Storage providers.
//!
//! The tree algorithms never touch `std::fs` directly; they go through the
//! [`StorageProvider`] capability so the same code runs against the local disk
//! or an in-memory tree.

mod local;
mod memory;

pub use local::LocalStorage;
pub use memory::{MemoryStorage, StorageStats};

use std::path::{Path, PathBuf};

use crate::errors::Result;

/// What a path currently refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    None,
    File,
    Directory,
}

impl EntryKind {
    pub fn is_dir(self) -> bool {
        self == EntryKind::Directory
    }

    pub fn is_file(self) -> bool {
        self == EntryKind::File
    }
}

/// Primitive storage operations consumed by the tree algorithms.
///
/// Listings return direct children only, each as `dir.join(name)`, so that
/// stripping `dir` from a child always succeeds.
pub trait StorageProvider {
    /// Stat a path. Errors other than "does not exist" are reported as `None`.
    fn exists(&self, path: &Path) -> EntryKind;

    /// Direct children of `dir` that are files.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Direct children of `dir` that are directories.
    fn list_directories(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Copy one file's bytes. Fails with `AlreadyExists` if `to` exists and
    /// with `NotFound` if `from` does not.
    fn copy_file_bytes(&self, from: &Path, to: &Path) -> Result<()>;

    /// Create a single directory; the parent must already exist.
    fn create_directory(&self, path: &Path) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    fn remove_directory_recursive(&self, path: &Path) -> Result<()>;

    /// Rename a file or directory. The parent of `to` must exist.
    fn rename_path(&self, from: &Path, to: &Path) -> Result<()>;
}

impl<S: StorageProvider + ?Sized> StorageProvider for &S {
    fn exists(&self, path: &Path) -> EntryKind {
        (**self).exists(path)
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        (**self).list_files(dir)
    }

    fn list_directories(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        (**self).list_directories(dir)
    }

    fn copy_file_bytes(&self, from: &Path, to: &Path) -> Result<()> {
        (**self).copy_file_bytes(from, to)
    }

    fn create_directory(&self, path: &Path) -> Result<()> {
        (**self).create_directory(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        (**self).remove_file(path)
    }

    fn remove_directory_recursive(&self, path: &Path) -> Result<()> {
        (**self).remove_directory_recursive(path)
    }

    fn rename_path(&self, from: &Path, to: &Path) -> Result<()> {
        (**self).rename_path(from, to)
    }
}
