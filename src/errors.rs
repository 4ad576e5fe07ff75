//! Typed error definitions for fstree.
//! Three failure modes: a missing source, an occupied destination, and
//! everything else the storage provider reports.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsTreeError {
    #[error("Source path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Destination already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("{message}")]
    Io {
        op: &'static str,
        path: PathBuf,
        message: String,
        #[source]
        source: io::Error,
    },
}

impl FsTreeError {
    /// Stable numeric code, used as a structured log field.
    pub fn code(&self) -> i32 {
        match self {
            FsTreeError::NotFound(_) => 2,
            FsTreeError::AlreadyExists(_) => 17,
            FsTreeError::Io { .. } => 5,
        }
    }

    /// Path the failing operation was acting on.
    pub fn path(&self) -> &Path {
        match self {
            FsTreeError::NotFound(p) | FsTreeError::AlreadyExists(p) => p,
            FsTreeError::Io { path, .. } => path,
        }
    }

    /// Classify an io::Error raised by `op` on `path`.
    ///
    /// NotFound and AlreadyExists map onto their own variants; the rest keep
    /// the original error as `source` and get a hint-enriched message.
    pub fn from_io(op: &'static str, path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => FsTreeError::NotFound(path.to_path_buf()),
            io::ErrorKind::AlreadyExists => FsTreeError::AlreadyExists(path.to_path_buf()),
            _ => FsTreeError::io(op, path, e),
        }
    }

    /// Wrap an io::Error as `Io` without classifying its kind.
    pub fn io(op: &'static str, path: &Path, e: io::Error) -> Self {
        FsTreeError::Io {
            op,
            path: path.to_path_buf(),
            message: crate::fs_ops::helpers::build_message(op, path, &e),
            source: e,
        }
    }

    /// An argument that the path algebra cannot work with.
    pub(crate) fn invalid_input(op: &'static str, path: &Path, detail: &str) -> Self {
        FsTreeError::io(op, path, io::Error::new(io::ErrorKind::InvalidInput, detail.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, FsTreeError>;
