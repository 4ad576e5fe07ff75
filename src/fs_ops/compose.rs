//! Path composition shared by every tree operation: directory creation on
//! demand and relative-path math.

use std::ffi::OsStr;
use std::io;
use std::ops::Deref;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::{FsTreeError, Result};
use crate::storage::{EntryKind, StorageProvider};

/// Ensure `path` exists as a directory, creating missing ancestors first.
///
/// An empty path is a no-op. A file sitting where a directory is wanted is
/// removed.
pub fn ensure_directory<S: StorageProvider + ?Sized>(storage: &S, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    match storage.exists(path) {
        EntryKind::Directory => return Ok(()),
        EntryKind::File => {
            warn!(path = %path.display(), "Removing file that is in the way of a directory");
            storage.remove_file(path)?;
        }
        EntryKind::None => {}
    }
    if let Some(parent) = path.parent() {
        ensure_directory(storage, parent)?;
    }
    debug!(path = %path.display(), "create directory");
    storage.create_directory(path)
}

/// Create `path` and its missing ancestors without removing anything.
///
/// A file at `path` or at any ancestor is a `NotADirectory` error and stays
/// where it is.
pub fn create_missing_directories<S: StorageProvider + ?Sized>(storage: &S, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    match storage.exists(path) {
        EntryKind::Directory => Ok(()),
        EntryKind::File => Err(FsTreeError::io(
            "create directory",
            path,
            io::Error::new(io::ErrorKind::NotADirectory, "a file is in the way"),
        )),
        EntryKind::None => {
            if let Some(parent) = path.parent() {
                create_missing_directories(storage, parent)?;
            }
            debug!(path = %path.display(), "create directory");
            storage.create_directory(path)
        }
    }
}

/// `path` with the `root` prefix and one separator removed.
pub fn relative_path(root: &Path, path: &Path) -> Result<PathBuf> {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|_| FsTreeError::invalid_input("relative path", path, "path is not under the operation root"))
}

/// Final component of `path`.
pub fn base_name(path: &Path) -> Result<&OsStr> {
    path.file_name()
        .ok_or_else(|| FsTreeError::invalid_input("base name", path, "path has no final component"))
}

/// A path relative to the root of a copy, as handed to inclusion predicates.
///
/// Directory paths end with a separator (`inner/`), so a rule can tell a
/// directory `x` from a file `x`. Derefs to [`Path`] for `extension()`,
/// `starts_with()` and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativePath {
    path: PathBuf,
    is_dir: bool,
}

impl RelativePath {
    pub fn file(path: PathBuf) -> Self {
        RelativePath { path, is_dir: false }
    }

    pub fn dir(path: PathBuf) -> Self {
        let mut s = path.into_os_string();
        s.push(MAIN_SEPARATOR.to_string());
        RelativePath {
            path: PathBuf::from(s),
            is_dir: true,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

impl Deref for RelativePath {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn relative_path_strips_root_and_separator() {
        let rel = relative_path(Path::new("a"), Path::new("a/inner/two.txt")).unwrap();
        assert_eq!(rel, PathBuf::from("inner/two.txt"));
        assert!(relative_path(Path::new("a"), Path::new("b/x")).is_err());
    }

    #[test]
    fn dir_relative_path_has_trailing_separator() {
        let rel = RelativePath::dir(PathBuf::from("inner"));
        assert!(rel.is_dir());
        assert!(rel.as_os_str().to_string_lossy().ends_with(MAIN_SEPARATOR));
        assert_eq!(rel.file_name(), Some(OsStr::new("inner")));

        let f = RelativePath::file(PathBuf::from("one.bad"));
        assert!(!f.is_dir());
        assert_eq!(f.extension(), Some(OsStr::new("bad")));
    }

    #[test]
    fn ensure_directory_creates_ancestors_once() {
        let m = MemoryStorage::new();
        ensure_directory(&m, Path::new("x/y/z")).unwrap();
        assert!(m.exists(Path::new("x/y/z")).is_dir());
        assert_eq!(m.stats().create_directory, 3);

        m.reset_stats();
        ensure_directory(&m, Path::new("x/y/z")).unwrap();
        assert_eq!(m.stats().create_directory, 0);
    }

    #[test]
    fn ensure_directory_clobbers_file_in_the_way() {
        let m = MemoryStorage::new();
        m.add_file("x/y", "blocker");
        ensure_directory(&m, Path::new("x/y/z")).unwrap();
        assert!(m.exists(Path::new("x/y")).is_dir());
        assert!(m.exists(Path::new("x/y/z")).is_dir());
    }

    #[test]
    fn create_missing_directories_leaves_files_alone() {
        let m = MemoryStorage::new();
        m.add_file("x/y", "blocker");
        let err = create_missing_directories(&m, Path::new("x/y/z")).unwrap_err();
        match err {
            FsTreeError::Io { ref path, ref source, .. } => {
                assert_eq!(path, Path::new("x/y"));
                assert_eq!(source.kind(), io::ErrorKind::NotADirectory);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(m.read_file("x/y").as_deref(), Some(&b"blocker"[..]));
        assert_eq!(m.stats().remove_file, 0);

        create_missing_directories(&m, Path::new("x/w/v")).unwrap();
        assert!(m.exists(Path::new("x/w/v")).is_dir());
    }

    #[test]
    fn ensure_directory_empty_path_is_noop() {
        let m = MemoryStorage::new();
        ensure_directory(&m, Path::new("")).unwrap();
        assert_eq!(m.stats().total(), 0);
    }

    #[test]
    fn base_name_rejects_rootless_paths() {
        assert_eq!(base_name(Path::new("a/one.txt")).unwrap(), OsStr::new("one.txt"));
        assert!(base_name(Path::new("/")).is_err());
    }
}
