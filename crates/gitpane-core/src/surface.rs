//! What gitpane asks the host to display.
//!
//! Markup is the host's business. The core only decides which state each
//! element is in and hands it over through [`Surface`].

use std::fmt;

use gitpane_git::FileChange;

use crate::busy::BusyIndicator;

/// Text shown instead of the file table when the tree is clean.
pub const NOTHING_TO_COMMIT: &str = "Nothing to commit, working directory clean.";

/// State of the branch indicator next to the project name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchLabel {
    /// A lookup is in progress.
    Checking,
    /// The project root is a repository root on this branch.
    Branch(String),
    /// The project lives inside a repository but is not its root.
    NotGitRoot,
    /// The project is not inside any repository.
    NotGitRepo,
    /// The branch could not be determined.
    Cleared,
}

impl fmt::Display for BranchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => f.write_str("[ \u{2026} ]"),
            Self::Branch(name) => write!(f, "[ {name} ]"),
            Self::NotGitRoot => f.write_str("[ not a git root ]"),
            Self::NotGitRepo => f.write_str("[ not a git repo ]"),
            Self::Cleared => Ok(()),
        }
    }
}

/// One row of the file table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub change: FileChange,
    pub checked: bool,
}

/// Content of the panel body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusView {
    NothingToCommit,
    Files(Vec<FileRow>),
}

/// Rendering collaborator supplied by the host.
pub trait Surface: BusyIndicator {
    /// Show the installed git version in the status bar.
    fn show_version(&self, version: &str);

    /// Show why git is unavailable, in error style.
    fn show_version_error(&self, error: &str);

    /// Show the branch indicator in `label`'s state.
    fn show_branch(&self, label: &BranchLabel);

    /// Hide the branch indicator until the next `show_branch`.
    fn hide_branch(&self);

    /// Show or hide the panel.
    fn set_panel_visible(&self, visible: bool);

    /// Replace the panel body.
    fn render_status(&self, view: &StatusView);

    /// Set the "select all" checkbox.
    fn set_select_all(&self, checked: bool);

    /// Offer or withdraw the "open bash" control.
    fn set_bash_available(&self, available: bool);
}
