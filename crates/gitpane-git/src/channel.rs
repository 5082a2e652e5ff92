//! The asynchronous boundary to whatever executes commands.
//!
//! `CommandChannel` is the only way the rest of gitpane reaches git. Each
//! call issues exactly one command; ordering between concurrent calls is
//! the caller's concern.

use std::future::Future;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::command::CommandLine;
use crate::error::{Error, Result};

/// Trait for executing one external command at a time.
///
/// This trait abstracts the executor, allowing for:
/// - The real process-backed implementation
/// - Scripted implementations for testing
pub trait CommandChannel: Send + Sync {
    /// Run `command` in `root` (or in `command.current_dir` when set).
    ///
    /// Resolves to the command's output, or to the transport's error.
    fn execute(
        &self,
        root: &Path,
        command: &CommandLine,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Runs commands as child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessChannel;

impl ProcessChannel {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CommandChannel for ProcessChannel {
    async fn execute(&self, root: &Path, command: &CommandLine) -> Result<String> {
        let rendered = command.to_string();
        let dir = command.current_dir.as_deref().unwrap_or(root);
        tracing::debug!(command = %rendered, dir = %dir.display(), "executing");

        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::Spawn {
                command: rendered.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: rendered,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::command::GitCommands;
    use std::process::Command as StdCommand;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_git_version_succeeds() {
        let temp = TempDir::new().unwrap();
        let out = ProcessChannel::new()
            .execute(temp.path(), &GitCommands::default().version())
            .await
            .unwrap();
        assert!(out.starts_with("git version"));
    }

    #[tokio::test]
    async fn test_failure_carries_stderr() {
        let temp = TempDir::new().unwrap();
        let err = ProcessChannel::new()
            .execute(temp.path(), &GitCommands::default().repository_root())
            .await
            .unwrap_err();
        match err {
            Error::CommandFailed { command, stderr, .. } => {
                assert_eq!(command, "git rev-parse --show-toplevel");
                assert!(stderr.contains("not a git repository"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let temp = TempDir::new().unwrap();
        let err = ProcessChannel::new()
            .execute(temp.path(), &CommandLine::new("gitpane-no-such-program"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_current_dir_overrides_root() {
        let repo = TempDir::new().unwrap();
        StdCommand::new("git")
            .args(["init", "-q"])
            .current_dir(&repo)
            .output()
            .unwrap();
        let elsewhere = TempDir::new().unwrap();

        let cmd = GitCommands::default()
            .repository_root()
            .current_dir(repo.path());
        let out = ProcessChannel::new()
            .execute(elsewhere.path(), &cmd)
            .await
            .unwrap();

        let expected = repo.path().canonicalize().unwrap();
        assert_eq!(Path::new(&out).canonicalize().unwrap(), expected);
    }
}
