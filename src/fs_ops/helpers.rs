//! I/O helper utilities.
//!
//! Turns a raw io::Error into an actionable message (operation, path and a
//! platform-aware hint), and offers closure adapters for `.map_err(...)`.
//!
//! Usage:
//!   fs::create_dir(dir).map_err(classify_io("create directory", dir))?;
//!   fs::remove_dir_all(dir).map_err(wrap_io("remove directory", dir))?;

use std::io;
use std::path::Path;

use crate::errors::FsTreeError;

/// Format a human-friendly message with op/path plus platform-aware hints.
pub(crate) fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str("; permission denied, check ownership and write permissions.");
                }
                libc::EXDEV => {
                    msg.push_str("; cross-filesystem, rename cannot cross devices.");
                }
                libc::EBUSY => {
                    msg.push_str("; resource busy, ensure no other process holds it.");
                }
                libc::ENOENT => {
                    msg.push_str("; path not found, verify it exists.");
                }
                libc::EEXIST => {
                    msg.push_str("; already exists, remove the target first.");
                }
                libc::ENOTEMPTY => {
                    msg.push_str("; directory not empty.");
                }
                libc::ENOSPC => {
                    msg.push_str("; insufficient space on device.");
                }
                libc::EROFS => {
                    msg.push_str("; read-only filesystem, cannot write here.");
                }
                libc::ELOOP => {
                    msg.push_str("; too many symbolic link levels, possible symlink cycle.");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str("; filename or path too long.");
                }
                libc::EMFILE => {
                    msg.push_str("; process file descriptor limit reached.");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str("; access denied, check permissions."), // ERROR_ACCESS_DENIED
                17 => msg.push_str("; not same device, rename cannot cross devices."), // ERROR_NOT_SAME_DEVICE
                32 => msg.push_str("; sharing violation, file is in use."), // ERROR_SHARING_VIOLATION
                2 | 3 => msg.push_str("; path not found, verify it exists."),
                80 | 183 => msg.push_str("; already exists, remove the target first."),
                112 => msg.push_str("; insufficient disk space."), // ERROR_DISK_FULL
                206 => msg.push_str("; filename or path too long."), // ERROR_FILENAME_EXCED_RANGE
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                msg.push_str("; permission denied, check ownership and write permissions.");
            }
            io::ErrorKind::NotFound => {
                msg.push_str("; path not found, verify it exists.");
            }
            io::ErrorKind::AlreadyExists => {
                msg.push_str("; already exists, remove the target first.");
            }
            io::ErrorKind::InvalidInput => {
                msg.push_str("; invalid path for this operation.");
            }
            _ => {}
        }
    }

    msg
}

/// Adapter that classifies NotFound/AlreadyExists into their own variants.
pub(crate) fn classify_io<'a>(
    op: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> FsTreeError + 'a {
    move |e: io::Error| FsTreeError::from_io(op, path, e)
}

/// Adapter that always produces `FsTreeError::Io`.
pub(crate) fn wrap_io<'a>(
    op: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> FsTreeError + 'a {
    move |e: io::Error| FsTreeError::io(op, path, e)
}
