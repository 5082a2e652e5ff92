//! The editor's current project root, shared between components.

use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Shared handle to the project root the editor currently reports.
///
/// Clones observe the same value. The git client reads it when issuing a
/// command; refresh routines read it when a result arrives to decide
/// whether the result still belongs to the current project.
#[derive(Debug, Clone)]
pub struct ProjectRoot {
    inner: Arc<RwLock<PathBuf>>,
}

impl ProjectRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(root.into())),
        }
    }

    /// Current project root.
    #[must_use]
    pub fn get(&self) -> PathBuf {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Switch to a different project.
    pub fn set(&self, root: impl Into<PathBuf>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = root.into();
    }

    /// Check whether `other` names the current project root.
    #[must_use]
    pub fn is_current(&self, other: &Path) -> bool {
        same_root(&self.get(), other)
    }
}

/// Compare two roots, ignoring trailing separators and `.` components.
#[must_use]
pub fn same_root(a: &Path, b: &Path) -> bool {
    normalized(a) == normalized(b)
}

fn normalized(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
