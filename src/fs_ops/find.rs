//! Lazy, prunable tree enumeration.
//!
//! [`Find`] is a pull-based iterator over an explicit stack of frames, one per
//! directory being visited. Nothing is stat'ed, listed or evaluated until
//! `next()` asks for it:
//! - the root is stat'ed on the first `next()`,
//! - a directory's files are listed when its first child is needed, and its
//!   subdirectories only once those files are exhausted,
//! - the traversal predicate runs when a subdirectory is about to be yielded.
//!
//! Within a directory the order is: files, then accepted subdirectories, then
//! the subtree of each accepted subdirectory in turn.

use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::vec;
use tracing::trace;

use crate::errors::{FsTreeError, Result};
use crate::storage::{EntryKind, StorageProvider};

/// Decides whether a directory (by full path) is yielded and descended into.
pub type TraversalPredicate<'a> = Box<dyn FnMut(&Path) -> bool + 'a>;

struct Frame {
    dir: PathBuf,
    files: Option<vec::IntoIter<PathBuf>>,
    dirs: Option<vec::IntoIter<PathBuf>>,
    descend: VecDeque<PathBuf>,
}

enum Step {
    Yield(PathBuf),
    Descend(PathBuf),
    Failed(FsTreeError),
    Done,
}

impl Frame {
    fn new(dir: PathBuf) -> Self {
        Frame {
            dir,
            files: None,
            dirs: None,
            descend: VecDeque::new(),
        }
    }

    fn advance<S: StorageProvider + ?Sized>(
        &mut self,
        storage: &S,
        predicate: &mut Option<TraversalPredicate<'_>>,
    ) -> Step {
        if self.files.is_none() {
            match storage.list_files(&self.dir) {
                Ok(v) => self.files = Some(v.into_iter()),
                Err(e) => {
                    // An unreadable directory reports once and is then finished.
                    self.files = Some(Vec::new().into_iter());
                    self.dirs = Some(Vec::new().into_iter());
                    return Step::Failed(e);
                }
            }
        }
        if let Some(file) = self.files.as_mut().and_then(Iterator::next) {
            return Step::Yield(file);
        }

        if self.dirs.is_none() {
            match storage.list_directories(&self.dir) {
                Ok(v) => self.dirs = Some(v.into_iter()),
                Err(e) => {
                    self.dirs = Some(Vec::new().into_iter());
                    return Step::Failed(e);
                }
            }
        }
        if let Some(dirs) = self.dirs.as_mut() {
            for dir in dirs.by_ref() {
                let descend = predicate.as_mut().is_none_or(|p| p(&dir));
                if descend {
                    self.descend.push_back(dir.clone());
                    return Step::Yield(dir);
                }
                trace!(path = %dir.display(), "pruned directory");
            }
        }

        match self.descend.pop_front() {
            Some(dir) => Step::Descend(dir),
            None => Step::Done,
        }
    }
}

/// Lazy depth-first sequence of paths under a root, root first.
pub struct Find<'a, S: StorageProvider + ?Sized> {
    storage: &'a S,
    root: Option<PathBuf>,
    predicate: Option<TraversalPredicate<'a>>,
    stack: Vec<Frame>,
}

impl<'a, S: StorageProvider + ?Sized> Find<'a, S> {
    /// Build the sequence. Performs no storage calls and no predicate calls.
    pub fn new(storage: &'a S, root: impl Into<PathBuf>, predicate: Option<TraversalPredicate<'a>>) -> Self {
        Find {
            storage,
            root: Some(root.into()),
            predicate,
            stack: Vec::new(),
        }
    }
}

impl<S: StorageProvider + ?Sized> Iterator for Find<'_, S> {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            return match self.storage.exists(&root) {
                EntryKind::Directory => {
                    self.stack.push(Frame::new(root.clone()));
                    Some(Ok(root))
                }
                EntryKind::File => Some(Ok(root)),
                EntryKind::None => None,
            };
        }

        loop {
            let frame = self.stack.last_mut()?;
            match frame.advance(self.storage, &mut self.predicate) {
                Step::Yield(path) => return Some(Ok(path)),
                Step::Descend(dir) => self.stack.push(Frame::new(dir)),
                Step::Failed(e) => return Some(Err(e)),
                Step::Done => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl<S: StorageProvider + ?Sized> FusedIterator for Find<'_, S> {}

impl<S: StorageProvider + ?Sized> fmt::Debug for Find<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Find")
            .field("root", &self.root)
            .field("depth", &self.stack.len())
            .field("filtered", &self.predicate.is_some())
            .finish()
    }
}
