//! Local-disk storage provider backed by `std::fs`.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

use super::{EntryKind, StorageProvider};
use crate::errors::{FsTreeError, Result};
use crate::fs_ops::helpers::{classify_io, wrap_io};

/// Storage on the local filesystem.
///
/// Listings are sorted by file name so traversal order does not depend on the
/// platform's directory iteration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        LocalStorage
    }

    fn list_children(&self, dir: &Path, want: EntryKind) -> Result<Vec<PathBuf>> {
        let rd = fs::read_dir(dir).map_err(classify_io("read directory", dir))?;
        let mut out = Vec::new();
        for entry in rd {
            let entry = entry.map_err(wrap_io("read directory entry", dir))?;
            let path = entry.path();
            // Follow links so a link to a file lists as a file.
            let kind = match fs::metadata(&path) {
                Ok(m) if m.is_dir() => EntryKind::Directory,
                Ok(m) if m.is_file() => EntryKind::File,
                _ => EntryKind::None,
            };
            if kind == want {
                out.push(path);
            }
        }
        out.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        trace!(dir = %dir.display(), kind = ?want, count = out.len(), "listed children");
        Ok(out)
    }
}

impl StorageProvider for LocalStorage {
    fn exists(&self, path: &Path) -> EntryKind {
        match fs::metadata(path) {
            Ok(m) if m.is_dir() => EntryKind::Directory,
            Ok(m) if m.is_file() => EntryKind::File,
            _ => EntryKind::None,
        }
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.list_children(dir, EntryKind::File)
    }

    fn list_directories(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.list_children(dir, EntryKind::Directory)
    }

    fn copy_file_bytes(&self, from: &Path, to: &Path) -> Result<()> {
        let mut src = File::open(from).map_err(classify_io("open source file", from))?;
        let mut dst = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(to)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => FsTreeError::AlreadyExists(to.to_path_buf()),
                _ => FsTreeError::io("create destination file", to, e),
            })?;
        io::copy(&mut src, &mut dst).map_err(wrap_io("copy file bytes", to))?;
        dst.sync_all().map_err(wrap_io("flush destination file", to))?;
        Ok(())
    }

    fn create_directory(&self, path: &Path) -> Result<()> {
        fs::create_dir(path).map_err(wrap_io("create directory", path))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(classify_io("remove file", path))
    }

    fn remove_directory_recursive(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).map_err(classify_io("remove directory", path))
    }

    fn rename_path(&self, from: &Path, to: &Path) -> Result<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound && !from.exists() => {
                Err(classify_io("rename", from)(e))
            }
            Err(e) => Err(wrap_io("rename", to)(e)),
        }
    }
}
