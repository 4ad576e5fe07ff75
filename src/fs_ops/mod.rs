//! Filesystem tree operations: modularized.
//!
//! [`FileSystem`] is the entry point; each operation lives in its own module
//! and talks to storage only through [`StorageProvider`].

mod compose;
mod copy;
mod erase;
mod find;
pub(crate) mod helpers;
mod mover;

pub use compose::{RelativePath, base_name, create_missing_directories, ensure_directory, relative_path};
pub use copy::{InclusionPredicate, copy_tree};
pub use erase::delete_path;
pub use find::{Find, TraversalPredicate};
pub use mover::move_path;

use std::path::Path;
use tracing::info;

use crate::errors::Result;
use crate::storage::{LocalStorage, StorageProvider};

/// Copy, move, delete and enumerate file trees on a storage provider.
#[derive(Debug, Clone, Default)]
pub struct FileSystem<S = LocalStorage> {
    storage: S,
}

impl FileSystem<LocalStorage> {
    /// Operate on the local disk.
    pub fn new() -> Self {
        Self::with_storage(LocalStorage)
    }
}

impl<S: StorageProvider> FileSystem<S> {
    pub fn with_storage(storage: S) -> Self {
        FileSystem { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Copy a file or directory tree from `from` to `to`.
    ///
    /// For directories `include` is asked once per entry with the path
    /// relative to `from`; rejecting a directory skips its whole subtree.
    /// `None` copies everything. Existing destination files are not
    /// overwritten (`AlreadyExists`).
    pub fn copy(
        &self,
        from: impl AsRef<Path>,
        to: impl AsRef<Path>,
        include: Option<InclusionPredicate<'_>>,
    ) -> Result<()> {
        let (from, to) = (from.as_ref(), to.as_ref());
        let files = copy_tree(&self.storage, from, to, include)?;
        info!(src = %from.display(), dest = %to.display(), files, "Copied");
        Ok(())
    }

    /// Copy `from` into `to_directory`, keeping its base name.
    pub fn copy_to_directory(
        &self,
        from: impl AsRef<Path>,
        to_directory: impl AsRef<Path>,
        include: Option<InclusionPredicate<'_>>,
    ) -> Result<()> {
        let from = from.as_ref();
        let to = to_directory.as_ref().join(base_name(from)?);
        self.copy(from, to, include)
    }

    /// Rename `from` to `to`, creating `to`'s ancestors. A missing `from` is
    /// not an error.
    pub fn move_path(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
        let (from, to) = (from.as_ref(), to.as_ref());
        if move_path(&self.storage, from, to)? {
            info!(src = %from.display(), dest = %to.display(), "Moved");
        }
        Ok(())
    }

    /// Move `from` into `to_directory`, keeping its base name.
    pub fn move_to_directory(&self, from: impl AsRef<Path>, to_directory: impl AsRef<Path>) -> Result<()> {
        let from = from.as_ref();
        let to = to_directory.as_ref().join(base_name(from)?);
        self.move_path(from, to)
    }

    /// Remove a file or directory tree. A missing path is not an error.
    pub fn delete(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if delete_path(&self.storage, path)? {
            info!(path = %path.display(), "Deleted");
        }
        Ok(())
    }

    /// Create `path` and any missing ancestors, replacing files in the way.
    pub fn create_directory(&self, path: impl AsRef<Path>) -> Result<()> {
        ensure_directory(&self.storage, path.as_ref())
    }

    /// Lazily enumerate `root` and everything under it.
    ///
    /// `traversal` is consulted for each subdirectory as the iterator reaches
    /// it; returning false hides the directory and its subtree. Nothing is
    /// read from storage until the iterator is advanced.
    pub fn find<'a>(
        &'a self,
        root: impl AsRef<Path>,
        traversal: Option<TraversalPredicate<'a>>,
    ) -> Find<'a, S> {
        Find::new(&self.storage, root.as_ref(), traversal)
    }
}
