//! `gitpane status` - one-shot report of what the panel would show.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use gitpane_core::{BranchLabel, BusyTracker, FileRow, GitClient, NOTHING_TO_COMMIT, ProjectRoot};
use gitpane_core::project::same_root;
use gitpane_git::{FileChange, ProcessChannel};
use serde::Serialize;

use super::utils::Workspace;
use crate::output;
use crate::terminal::TerminalSurface;

#[derive(Debug, Serialize)]
struct StatusReport {
    version: String,
    root: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    git_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<String>,
    files: Vec<FileChange>,
}

impl StatusReport {
    fn label(&self) -> BranchLabel {
        match (&self.git_root, &self.branch) {
            (None, _) => BranchLabel::NotGitRepo,
            (Some(git_root), _) if !same_root(git_root, &self.root) => BranchLabel::NotGitRoot,
            (Some(_), Some(branch)) => BranchLabel::Branch(branch.clone()),
            (Some(_), None) => BranchLabel::Cleared,
        }
    }
}

async fn collect(client: &GitClient<ProcessChannel>, root: PathBuf) -> Result<StatusReport> {
    let version = client
        .get_version()
        .await
        .context("git is not available")?;

    let git_root = match client.get_repository_root().await {
        Ok(git_root) => Some(git_root),
        Err(e) => {
            tracing::debug!(error = %e, "not a git repository");
            None
        }
    };

    let mut report = StatusReport {
        version,
        root,
        git_root,
        branch: None,
        files: Vec::new(),
    };
    if report.git_root.is_none() {
        return Ok(report);
    }

    let (branch, files) = tokio::join!(client.get_branch_name(), client.get_status());
    report.branch = match branch {
        Ok(branch) => Some(branch),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read branch name");
            None
        }
    };
    report.files = files.context("Failed to read status")?;
    Ok(report)
}

fn print_report(report: &StatusReport) {
    output::info(&format!("git {}", report.version));
    output::info(&format!("Branch {}", output::branch_label(&report.label())));

    if report.git_root.is_none() {
        return;
    }
    if report.files.is_empty() {
        output::detail(NOTHING_TO_COMMIT);
        return;
    }

    output::hr();
    for (index, change) in report.files.iter().enumerate() {
        let row = FileRow {
            change: change.clone(),
            checked: false,
        };
        output::detail(&output::file_row(index + 1, &row));
    }
    output::hr();
}

/// Run the status command.
pub async fn run(workspace: &Workspace, json: bool) -> Result<()> {
    let surface = Arc::new(TerminalSurface::new());
    let client = GitClient::new(
        ProcessChannel::new(),
        workspace.config.commands(),
        BusyTracker::new(surface),
        ProjectRoot::new(workspace.root.clone()),
    );

    let report = collect(&client, workspace.root.clone()).await?;

    if json {
        output::essential(&serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
