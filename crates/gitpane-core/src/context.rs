//! Cached view of the current repository.
//!
//! A [`RepositoryContext`] is never edited in place. Every refresh builds a
//! new value and swaps it into the [`ContextCell`], so readers see either
//! the old context or the new one, never a mix.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use gitpane_git::FileChange;

use crate::project::{ProjectRoot, same_root};

/// What git last said about the project at `root_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryContext {
    pub root_path: PathBuf,
    pub branch_name: Option<String>,
    pub status: Vec<FileChange>,
}

impl RepositoryContext {
    /// An empty context for a freshly opened project.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            branch_name: None,
            status: Vec::new(),
        }
    }

    /// A new context for `root` with `branch`, keeping the status list
    /// only when it belongs to the same root.
    #[must_use]
    pub fn with_branch(&self, root: &Path, branch: Option<String>) -> Self {
        Self {
            root_path: root.to_path_buf(),
            branch_name: branch,
            status: if same_root(&self.root_path, root) {
                self.status.clone()
            } else {
                Vec::new()
            },
        }
    }

    /// A new context for `root` with `status`, keeping the branch name
    /// only when it belongs to the same root.
    #[must_use]
    pub fn with_status(&self, root: &Path, status: Vec<FileChange>) -> Self {
        Self {
            root_path: root.to_path_buf(),
            branch_name: if same_root(&self.root_path, root) {
                self.branch_name.clone()
            } else {
                None
            },
            status,
        }
    }
}

/// Holder of the single shared [`RepositoryContext`].
#[derive(Debug)]
pub struct ContextCell {
    current: Mutex<Arc<RepositoryContext>>,
}

impl ContextCell {
    pub fn new(context: RepositoryContext) -> Self {
        Self {
            current: Mutex::new(Arc::new(context)),
        }
    }

    /// The context as of now.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RepositoryContext> {
        Arc::clone(&self.current.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swap in a new context unconditionally.
    pub fn replace(&self, context: RepositoryContext) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Arc::new(context);
    }

    /// Swap in the context built by `update` if `dispatched_for` is still
    /// the current project root, then run `after` with the new context
    /// before anyone else can replace it.
    ///
    /// Returns `false` and leaves the context untouched for a stale result.
    pub fn apply_if_current(
        &self,
        project: &ProjectRoot,
        dispatched_for: &Path,
        update: impl FnOnce(&RepositoryContext) -> RepositoryContext,
        after: impl FnOnce(&RepositoryContext),
    ) -> bool {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if !project.is_current(dispatched_for) {
            return false;
        }
        let next = Arc::new(update(&current));
        *current = Arc::clone(&next);
        after(&next);
        true
    }
}
