//! Staging the selected files and committing them.

use futures::future::join_all;
use gitpane_git::{CommandChannel, FileChange};

use crate::error::{Error, Result};
use crate::refresh::Refresher;

/// Files and message taken from the panel when commit is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    files: Vec<FileChange>,
    message: String,
}

impl CommitRequest {
    /// Build a request, or `None` when there is nothing to commit or the
    /// message is blank.
    #[must_use]
    pub fn new(files: Vec<FileChange>, message: impl Into<String>) -> Option<Self> {
        let message = message.into();
        if files.is_empty() || message.trim().is_empty() {
            return None;
        }
        Some(Self { files, message })
    }

    #[must_use]
    pub fn files(&self) -> &[FileChange] {
        &self.files
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub committed: Vec<String>,
}

/// Service for staging and committing with trait-based dependencies.
pub struct CommitWorkflow<'a, C: CommandChannel> {
    refresher: &'a Refresher<C>,
}

impl<'a, C: CommandChannel> CommitWorkflow<'a, C> {
    #[must_use]
    pub const fn new(refresher: &'a Refresher<C>) -> Self {
        Self { refresher }
    }

    /// Stage every file concurrently, then commit once all are staged.
    ///
    /// # Errors
    /// Returns `Error::Staging` if any file failed to stage; no commit is
    /// made and files that did stage stay staged. Returns the commit's own
    /// failure otherwise.
    pub async fn run(&self, request: &CommitRequest) -> Result<CommitOutcome> {
        let client = self.refresher.client();

        let adds = request.files.iter().map(|file| async move {
            let result = client.add(&file.filename, file.is_deleted()).await;
            (file.filename.clone(), result)
        });

        let mut staged = Vec::with_capacity(request.files.len());
        let mut failed = Vec::new();
        for (filename, result) in join_all(adds).await {
            match result {
                Ok(()) => staged.push(filename),
                Err(e) => failed.push((filename, e.to_string())),
            }
        }

        if !failed.is_empty() {
            let err = Error::Staging { failed, staged };
            tracing::error!(error = %err, "commit aborted");
            return Err(err);
        }

        client.commit(&request.message).await?;
        self.refresher.refresh_status().await;

        Ok(CommitOutcome { committed: staged })
    }
}
