//! Delete a file or a whole directory tree. Deleting a missing path succeeds.

use std::path::Path;
use tracing::debug;

use crate::errors::Result;
use crate::storage::{EntryKind, StorageProvider};

/// Delete `path`. Returns whether anything was removed.
pub fn delete_path<S: StorageProvider + ?Sized>(storage: &S, path: &Path) -> Result<bool> {
    match storage.exists(path) {
        EntryKind::Directory => {
            debug!(path = %path.display(), "remove directory tree");
            storage.remove_directory_recursive(path)?;
            Ok(true)
        }
        EntryKind::File => {
            debug!(path = %path.display(), "remove file");
            storage.remove_file(path)?;
            Ok(true)
        }
        EntryKind::None => Ok(false),
    }
}
