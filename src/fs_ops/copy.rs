//! Tree copy.
//! Copies a single file, or mirrors a directory level by level while an
//! optional inclusion predicate decides which entries take part.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::{FsTreeError, Result};
use crate::storage::{EntryKind, StorageProvider};

use super::compose::{RelativePath, base_name, create_missing_directories, relative_path};

/// Decides, from its path relative to the copy root, whether an entry is copied.
pub type InclusionPredicate<'a> = &'a dyn Fn(&RelativePath) -> bool;

/// Copy `from` to `to`. Returns the number of files copied.
///
/// A directory source is mirrored under `to`; a file is copied after `to`'s
/// missing ancestors are created. Nothing already at the destination is
/// removed or overwritten.
pub fn copy_tree<S: StorageProvider + ?Sized>(
    storage: &S,
    from: &Path,
    to: &Path,
    include: Option<InclusionPredicate<'_>>,
) -> Result<usize> {
    match storage.exists(from) {
        EntryKind::Directory => {
            let include = include.unwrap_or(&include_all);
            copy_directory_contents(storage, from, to, include)
        }
        EntryKind::File => {
            copy_single_file(storage, from, to)?;
            Ok(1)
        }
        EntryKind::None => Err(FsTreeError::NotFound(from.to_path_buf())),
    }
}

fn include_all(_: &RelativePath) -> bool {
    true
}

fn copy_single_file<S: StorageProvider + ?Sized>(storage: &S, from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        create_missing_directories(storage, parent)?;
    }
    debug!(src = %from.display(), dest = %to.display(), "copy file");
    storage.copy_file_bytes(from, to)
}

/// Walk `root` with an explicit stack of (source dir, destination dir) pairs.
///
/// Each level is mirrored before its children are filtered, so a level whose
/// entries are all rejected still leaves an empty directory behind.
fn copy_directory_contents<S: StorageProvider + ?Sized>(
    storage: &S,
    root: &Path,
    to: &Path,
    include: InclusionPredicate<'_>,
) -> Result<usize> {
    let mut copied = 0usize;
    let mut pending: Vec<(PathBuf, PathBuf)> = vec![(root.to_path_buf(), to.to_path_buf())];

    while let Some((src_dir, dst_dir)) = pending.pop() {
        create_missing_directories(storage, &dst_dir)?;

        for file in storage.list_files(&src_dir)? {
            let rel = RelativePath::file(relative_path(root, &file)?);
            if !include(&rel) {
                trace!(path = %rel.display(), "excluded file");
                continue;
            }
            let dst = dst_dir.join(base_name(&file)?);
            debug!(src = %file.display(), dest = %dst.display(), "copy file");
            storage.copy_file_bytes(&file, &dst)?;
            copied += 1;
        }

        let mut accepted = Vec::new();
        for dir in storage.list_directories(&src_dir)? {
            let rel = RelativePath::dir(relative_path(root, &dir)?);
            if !include(&rel) {
                trace!(path = %rel.display(), "excluded directory subtree");
                continue;
            }
            let dst = dst_dir.join(base_name(&dir)?);
            accepted.push((dir, dst));
        }
        // Reverse so siblings are processed in listing order.
        pending.extend(accepted.into_iter().rev());
    }

    Ok(copied)
}
