//! Git client: one future-returning method per git capability.
//!
//! Every call is bracketed by the busy tracker. The handle is retired
//! before the outcome is handed back, whether the call succeeded or not.

use std::path::{Path, PathBuf};

use gitpane_git::{CommandChannel, CommandLine, FileChange, GitCommands};

use crate::busy::{BusyTracker, OperationKind};
use crate::error::Result;
use crate::project::ProjectRoot;

/// Instrumented access to git through a command channel.
pub struct GitClient<C: CommandChannel> {
    channel: C,
    commands: GitCommands,
    busy: BusyTracker,
    project: ProjectRoot,
}

impl<C: CommandChannel> GitClient<C> {
    /// Create a client issuing commands in `project`'s current root.
    pub const fn new(
        channel: C,
        commands: GitCommands,
        busy: BusyTracker,
        project: ProjectRoot,
    ) -> Self {
        Self {
            channel,
            commands,
            busy,
            project,
        }
    }

    /// The project root handle commands are issued against.
    #[must_use]
    pub const fn project(&self) -> &ProjectRoot {
        &self.project
    }

    /// The busy tracker observing this client.
    #[must_use]
    pub const fn busy(&self) -> &BusyTracker {
        &self.busy
    }

    async fn run(&self, kind: OperationKind, command: CommandLine) -> Result<String> {
        let handle = self.busy.begin(kind);
        let root = self.project.get();
        let result = self.channel.execute(&root, &command).await;
        self.busy.end(handle);

        if let Err(e) = &result {
            tracing::debug!(%command, error = %e, "command failed");
        }
        Ok(result?)
    }

    /// Installed git version, e.g. `2.43.0`.
    pub async fn get_version(&self) -> Result<String> {
        let out = self
            .run(OperationKind::Version, self.commands.version())
            .await?;
        Ok(gitpane_git::parse_version(&out))
    }

    /// Top-level directory of the repository containing the project root.
    pub async fn get_repository_root(&self) -> Result<PathBuf> {
        let out = self
            .run(OperationKind::RepositoryRoot, self.commands.repository_root())
            .await?;
        Ok(PathBuf::from(out.trim()))
    }

    /// Name of the checked-out branch (`HEAD` when detached).
    pub async fn get_branch_name(&self) -> Result<String> {
        let out = self
            .run(OperationKind::BranchName, self.commands.branch_name())
            .await?;
        Ok(out.trim().to_string())
    }

    /// Changed files in the working tree, in git's order.
    pub async fn get_status(&self) -> Result<Vec<FileChange>> {
        let command = self.commands.status();
        let rendered = command.to_string();
        let out = self.run(OperationKind::Status, command).await?;
        Ok(gitpane_git::parse_porcelain(&rendered, &out)?)
    }

    /// Stage one file.
    pub async fn add(&self, filename: &str, update_index_only: bool) -> Result<()> {
        self.run(
            OperationKind::Add,
            self.commands.add(filename, update_index_only),
        )
        .await?;
        Ok(())
    }

    /// Commit whatever is staged.
    pub async fn commit(&self, message: &str) -> Result<()> {
        self.run(OperationKind::Commit, self.commands.commit(message))
            .await?;
        Ok(())
    }

    /// Unstage everything.
    pub async fn reset(&self) -> Result<()> {
        self.run(OperationKind::Reset, self.commands.reset()).await?;
        Ok(())
    }

    /// Open a shell at `path`.
    pub async fn bash_open(&self, path: &Path) -> Result<()> {
        self.run(OperationKind::BashOpen, self.commands.bash_open(path))
            .await?;
        Ok(())
    }

    /// Check for bash. A failure only means bash integration is off.
    pub async fn bash_version(&self) -> bool {
        match self
            .run(OperationKind::BashVersion, self.commands.bash_version())
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "bash not available");
                false
            }
        }
    }
}
