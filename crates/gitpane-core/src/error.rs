//! Error types for gitpane-core.

use std::path::PathBuf;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gitpane-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command channel failed.
    #[error(transparent)]
    Git(#[from] gitpane_git::Error),

    /// Some files could not be staged, so nothing was committed.
    #[error("staging failed for {} file(s), nothing committed: {}", .failed.len(), first_failure(.failed))]
    Staging {
        /// Files whose `add` failed, with the reason.
        failed: Vec<(String, String)>,
        /// Files that were staged and remain staged.
        staged: Vec<String>,
    },

    /// A file named for a commit is not in the current status list.
    #[error("not a changed file: {0}")]
    UnknownFile(String),

    /// Preference file could not be parsed.
    #[error("failed to parse {file}: {message}")]
    PreferencesParse { file: PathBuf, message: String },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn first_failure(failed: &[(String, String)]) -> String {
    failed
        .first()
        .map(|(file, err)| format!("{file} ({err})"))
        .unwrap_or_default()
}
