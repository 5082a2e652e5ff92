//! `gitpane commit` - stage the named files and commit them.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use gitpane_core::{CommitRequest, CommitWorkflow, Error, MemoryPreferences};
use gitpane_git::FileChange;

use super::utils::{self, Workspace};
use crate::output;
use crate::terminal::TerminalSurface;

/// Pick the listed changes for `names`, keeping their status flags.
fn select_files(status: &[FileChange], names: &[String]) -> Result<Vec<FileChange>, Error> {
    names
        .iter()
        .map(|name| {
            status
                .iter()
                .find(|change| change.filename == *name)
                .cloned()
                .ok_or_else(|| Error::UnknownFile(name.clone()))
        })
        .collect()
}

/// Run the commit command.
pub async fn run(workspace: &Workspace, message: &str, files: &[String]) -> Result<()> {
    if message.trim().is_empty() {
        bail!("Commit message cannot be empty");
    }

    let surface = Arc::new(TerminalSurface::new());
    let refresher = utils::build_refresher(workspace, &surface, Arc::new(MemoryPreferences::new()));

    let status = refresher
        .client()
        .get_status()
        .await
        .context("Failed to read status")?;
    let selected = select_files(&status, files)?;

    let Some(request) = CommitRequest::new(selected, message) else {
        bail!("Nothing to commit");
    };

    let outcome = CommitWorkflow::new(&refresher).run(&request).await?;

    output::success(&format!(
        "Committed {} file{}",
        outcome.committed.len(),
        if outcome.committed.len() == 1 { "" } else { "s" }
    ));
    for filename in &outcome.committed {
        output::detail(&format!("  {filename}"));
    }
    Ok(())
}
