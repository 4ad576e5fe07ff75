//! Move a file or directory by rename, creating the destination's ancestors
//! first. A missing source is a silent no-op.

use std::path::Path;
use tracing::debug;

use crate::errors::Result;
use crate::storage::{EntryKind, StorageProvider};

use super::compose::ensure_directory;

/// Move `from` to `to`. Returns whether anything was moved.
///
/// There is no copy+delete fallback: a rename the provider cannot perform
/// (e.g. across devices) is returned as an error.
pub fn move_path<S: StorageProvider + ?Sized>(storage: &S, from: &Path, to: &Path) -> Result<bool> {
    if let Some(parent) = to.parent() {
        ensure_directory(storage, parent)?;
    }

    match storage.exists(from) {
        EntryKind::Directory => {
            debug!(src = %from.display(), dest = %to.display(), "rename directory");
            storage.rename_path(from, to)?;
            Ok(true)
        }
        EntryKind::File => {
            debug!(src = %from.display(), dest = %to.display(), "rename file");
            storage.rename_path(from, to)?;
            Ok(true)
        }
        EntryKind::None => {
            debug!(src = %from.display(), "Source does not exist; nothing to move");
            Ok(false)
        }
    }
}
