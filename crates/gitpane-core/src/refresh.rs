//! Refreshing the repository context and what the surface shows of it.
//!
//! Refreshes triggered independently may complete in any order. Each one
//! remembers the project root it was dispatched for and only applies its
//! result if that root is still current when the result arrives.

use std::path::Path;
use std::sync::Arc;

use gitpane_git::CommandChannel;

use crate::client::GitClient;
use crate::context::{ContextCell, RepositoryContext};
use crate::error::Result;
use crate::panel::PanelController;
use crate::project::{ProjectRoot, same_root};
use crate::surface::{BranchLabel, Surface};

/// Keeps the repository context in step with git.
pub struct Refresher<C: CommandChannel> {
    client: GitClient<C>,
    context: ContextCell,
    panel: Arc<PanelController>,
    surface: Arc<dyn Surface>,
}

impl<C: CommandChannel> Refresher<C> {
    /// Create a refresher bound to the client's current project root.
    pub fn new(client: GitClient<C>, panel: Arc<PanelController>, surface: Arc<dyn Surface>) -> Self {
        let context = ContextCell::new(RepositoryContext::new(client.project().get()));
        Self {
            client,
            context,
            panel,
            surface,
        }
    }

    #[must_use]
    pub const fn client(&self) -> &GitClient<C> {
        &self.client
    }

    #[must_use]
    pub const fn context(&self) -> &ContextCell {
        &self.context
    }

    #[must_use]
    pub fn panel(&self) -> &PanelController {
        &self.panel
    }

    #[must_use]
    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    fn project(&self) -> &ProjectRoot {
        self.client.project()
    }

    /// Switch to another project.
    ///
    /// The root is updated before anything else so that results of
    /// requests still in flight for the old project are discarded. Rows of
    /// the old project are dropped so they can never be committed here.
    pub fn switch_project(&self, root: &Path) {
        self.project().set(root);
        self.context.replace(RepositoryContext::new(root));
        self.panel.clear();
    }

    /// Show the git version, or the reason git is unusable.
    ///
    /// # Errors
    /// Returns the version lookup failure so the host can skip attaching
    /// the rest of the UI.
    pub async fn init_version(&self) -> Result<String> {
        match self.client.get_version().await {
            Ok(version) => {
                self.surface.show_version(&version);
                Ok(version)
            }
            Err(e) => {
                self.surface.show_version_error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Look up the branch of the current project.
    pub async fn refresh_branch(&self) {
        self.surface.show_branch(&BranchLabel::Checking);
        let root = self.project().get();

        let git_root = match self.client.get_repository_root().await {
            Ok(git_root) => git_root,
            Err(e) => {
                tracing::debug!(root = %root.display(), error = %e, "not a git repository");
                if self.project().is_current(&root) {
                    self.surface.show_branch(&BranchLabel::NotGitRepo);
                }
                return;
            }
        };

        if !self.project().is_current(&root) {
            tracing::debug!(root = %root.display(), "discarding stale repository root");
            return;
        }
        if !same_root(&git_root, &root) {
            self.surface.show_branch(&BranchLabel::NotGitRoot);
            return;
        }

        match self.client.get_branch_name().await {
            Ok(name) => {
                let applied = self.context.apply_if_current(
                    self.project(),
                    &root,
                    |ctx| ctx.with_branch(&root, Some(name.clone())),
                    |_| self.surface.show_branch(&BranchLabel::Branch(name.clone())),
                );
                if !applied {
                    tracing::debug!(root = %root.display(), "discarding stale branch name");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to read branch name");
                if self.project().is_current(&root) {
                    self.surface.show_branch(&BranchLabel::Cleared);
                }
            }
        }
    }

    /// Reload the status list. Does nothing while the panel is hidden.
    pub async fn refresh_status(&self) {
        if !self.panel.is_visible() {
            return;
        }
        let root = self.project().get();

        match self.client.get_status().await {
            Ok(files) => {
                let applied = self.context.apply_if_current(
                    self.project(),
                    &root,
                    |ctx| ctx.with_status(&root, files.clone()),
                    |ctx| self.panel.show_status(ctx.status.clone()),
                );
                if !applied {
                    tracing::debug!(root = %root.display(), "discarding stale status");
                }
            }
            // Keep showing the previous list.
            Err(e) => tracing::error!(error = %e, "failed to refresh status"),
        }
    }

    /// Refresh branch and status concurrently.
    pub async fn refresh_all(&self) {
        tokio::join!(self.refresh_branch(), self.refresh_status());
    }

    /// Unstage everything, then reload the status list.
    ///
    /// # Errors
    /// Returns error if the reset fails.
    pub async fn reset(&self) -> Result<()> {
        self.client.reset().await?;
        self.refresh_status().await;
        Ok(())
    }

    /// Open a shell at the current project root.
    ///
    /// # Errors
    /// Returns error if the shell could not be launched.
    pub async fn open_bash(&self) -> Result<()> {
        let root = self.project().get();
        self.client.bash_open(&root).await
    }

    /// Check for bash and tell the surface whether to offer it.
    pub async fn detect_bash(&self) -> bool {
        let available = self.client.bash_version().await;
        self.surface.set_bash_available(available);
        available
    }
}
