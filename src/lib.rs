//! Core library for `fstree`.
//!
//! Recursive copy, move and delete of files and directory trees, plus a lazy,
//! prunable tree enumeration. Every operation works the same whether the
//! target is a single file or a directory.
//!
//! ```no_run
//! use fstree::FileSystem;
//!
//! let fs = FileSystem::new();
//! let skip_bad = |rel: &fstree::RelativePath| rel.extension().is_none_or(|e| e != "bad");
//! fs.copy("a", "b", Some(&skip_bad))?;
//! for path in fs.find("b", None) {
//!     println!("{}", path?.display());
//! }
//! # Ok::<(), fstree::FsTreeError>(())
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod storage;

pub use config::{Config, LogLevel, default_config_path, default_log_path, path_has_symlink_ancestor};
pub use errors::{FsTreeError, Result};
pub use fs_ops::{FileSystem, Find, InclusionPredicate, RelativePath, TraversalPredicate};
pub use storage::{EntryKind, LocalStorage, MemoryStorage, StorageProvider, StorageStats};
