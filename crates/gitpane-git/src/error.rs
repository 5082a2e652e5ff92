//! Error types for gitpane-git.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running external commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The program could not be started at all.
    #[error("failed to run `{command}`: {message}")]
    Spawn { command: String, message: String },

    /// The program ran but exited unsuccessfully.
    #[error("`{command}` failed: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The transport to the executor reported an error.
    #[error("{0}")]
    Transport(String),

    /// Output of a command could not be understood.
    #[error("unexpected output from `{command}`: {line}")]
    Parse { command: String, line: String },
}
