//! `gitpane reset` - unstage everything.

use std::sync::Arc;

use anyhow::{Context, Result};
use gitpane_core::MemoryPreferences;

use super::utils::{self, Workspace};
use crate::output;
use crate::terminal::TerminalSurface;

/// Run the reset command.
pub async fn run(workspace: &Workspace) -> Result<()> {
    let surface = Arc::new(TerminalSurface::new());
    let refresher = utils::build_refresher(workspace, &surface, Arc::new(MemoryPreferences::new()));

    refresher.reset().await.context("Failed to reset the index")?;
    output::success("Index reset");
    Ok(())
}
