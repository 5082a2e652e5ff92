use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use gitpane_core::{
    BusyTracker, Config, FilePreferences, GitClient, MemoryPreferences, PanelController,
    PreferenceStore, ProjectRoot, Refresher,
};
use gitpane_git::ProcessChannel;

use crate::output;
use crate::terminal::TerminalSurface;

/// Project root and the configuration that applies to it.
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
}

/// Resolve the project root and load its config.
///
/// The root is canonicalized so that it compares equal to what
/// `git rev-parse --show-toplevel` prints.
pub fn load_workspace(root: Option<&Path>, config: Option<&Path>) -> Result<Workspace> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => std::env::current_dir().context("Cannot read current directory")?,
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("Cannot access project root {}", root.display()))?;

    let config_path = config.map_or_else(|| root.join(Config::FILE_NAME), Path::to_path_buf);
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    Ok(Workspace { root, config })
}

/// Open the store that remembers panel visibility between sessions.
pub fn open_preferences(config: &Config) -> Result<Arc<dyn PreferenceStore>> {
    let path = config
        .panel
        .preferences_file
        .clone()
        .or_else(FilePreferences::default_path);

    let Some(path) = path else {
        output::warn("No config directory found; panel visibility will not be remembered");
        return Ok(Arc::new(MemoryPreferences::new()));
    };

    let prefs = FilePreferences::open(path.clone())
        .with_context(|| format!("Failed to read preferences from {}", path.display()))?;
    Ok(Arc::new(prefs))
}

/// Wire a refresher for `workspace` that runs real processes and renders
/// to `surface`.
pub fn build_refresher(
    workspace: &Workspace,
    surface: &Arc<TerminalSurface>,
    prefs: Arc<dyn PreferenceStore>,
) -> Refresher<ProcessChannel> {
    let client = GitClient::new(
        ProcessChannel::new(),
        workspace.config.commands(),
        BusyTracker::new(surface.clone()),
        ProjectRoot::new(workspace.root.clone()),
    );
    let panel = Arc::new(PanelController::new(
        prefs,
        surface.clone(),
        &workspace.config.panel.instance,
    ));
    Refresher::new(client, panel, surface.clone())
}
