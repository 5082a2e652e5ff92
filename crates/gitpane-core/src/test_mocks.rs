//! Mock implementations for testing.
//!
//! `MockChannel` answers commands from a script instead of running git,
//! and can hold individual commands back until a test releases them.
//! `RecordingSurface` remembers everything it was asked to display.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use gitpane_git::{CommandChannel, CommandLine, Error as GitError, GitCommands, Result as GitResult};
use tokio::sync::Notify;

use crate::busy::{BusyIndicator, BusyTracker};
use crate::client::GitClient;
use crate::panel::PanelController;
use crate::prefs::MemoryPreferences;
use crate::project::ProjectRoot;
use crate::refresh::Refresher;
use crate::surface::{BranchLabel, StatusView, Surface};

pub const STATUS: &str = "git status -u --porcelain";

type Key = (Option<PathBuf>, String);

#[derive(Default)]
struct Script {
    responses: Mutex<HashMap<Key, Result<String, String>>>,
    gates: Mutex<HashMap<Key, Arc<Notify>>>,
    calls: Mutex<Vec<(PathBuf, String)>>,
}

/// Releases a command held back by [`MockChannel::gate`].
pub struct Gate(Arc<Notify>);

impl Gate {
    pub fn open(&self) {
        self.0.notify_one();
    }
}

/// Scripted `CommandChannel`. Clones share the same script.
#[derive(Clone, Default)]
pub struct MockChannel {
    script: Arc<Script>,
}

impl MockChannel {
    /// Answer `command` in any root.
    pub fn respond(&self, command: &str, result: Result<&str, &str>) {
        self.insert_response(None, command, result);
    }

    /// Answer `command` when run in `root`.
    pub fn respond_in(&self, root: &str, command: &str, result: Result<&str, &str>) {
        self.insert_response(Some(PathBuf::from(root)), command, result);
    }

    fn insert_response(&self, root: Option<PathBuf>, command: &str, result: Result<&str, &str>) {
        self.script.responses.lock().unwrap().insert(
            (root, command.to_string()),
            result.map(str::to_string).map_err(str::to_string),
        );
    }

    /// Hold `command` back in any root until the gate opens.
    pub fn gate(&self, command: &str) -> Gate {
        self.insert_gate(None, command)
    }

    /// Hold `command` back in `root` until the gate opens.
    pub fn gate_in(&self, root: &str, command: &str) -> Gate {
        self.insert_gate(Some(PathBuf::from(root)), command)
    }

    fn insert_gate(&self, root: Option<PathBuf>, command: &str) -> Gate {
        let notify = Arc::new(Notify::new());
        self.script
            .gates
            .lock()
            .unwrap()
            .insert((root, command.to_string()), Arc::clone(&notify));
        Gate(notify)
    }

    /// Every call so far as `(root, command)`.
    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.script.calls.lock().unwrap().clone()
    }

    /// Every command so far, without roots.
    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, cmd)| cmd).collect()
    }

    fn lookup<T: Clone>(map: &Mutex<HashMap<Key, T>>, root: &Path, command: &str) -> Option<T> {
        let map = map.lock().unwrap();
        map.get(&(Some(root.to_path_buf()), command.to_string()))
            .or_else(|| map.get(&(None, command.to_string())))
            .cloned()
    }
}

impl CommandChannel for MockChannel {
    async fn execute(&self, root: &Path, command: &CommandLine) -> GitResult<String> {
        let rendered = command.to_string();
        self.script
            .calls
            .lock()
            .unwrap()
            .push((root.to_path_buf(), rendered.clone()));

        if let Some(gate) = Self::lookup(&self.script.gates, root, &rendered) {
            gate.notified().await;
        }

        match Self::lookup(&self.script.responses, root, &rendered) {
            Some(Ok(out)) => Ok(out),
            Some(Err(message)) => Err(GitError::Transport(message)),
            None => Err(GitError::Transport(format!("unscripted command: {rendered}"))),
        }
    }
}

/// `Surface` that records what it was told.
#[derive(Default)]
pub struct RecordingSurface {
    busy: Mutex<Vec<bool>>,
    version: Mutex<Option<Result<String, String>>>,
    branches: Mutex<Vec<BranchLabel>>,
    branch_hidden: Mutex<bool>,
    panel_visible: Mutex<Option<bool>>,
    views: Mutex<Vec<StatusView>>,
    select_all: Mutex<Option<bool>>,
    bash_available: Mutex<Option<bool>>,
}

impl RecordingSurface {
    pub fn busy_transitions(&self) -> Vec<bool> {
        self.busy.lock().unwrap().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.lock().unwrap().last().copied().unwrap_or(false)
    }

    pub fn version(&self) -> Option<Result<String, String>> {
        self.version.lock().unwrap().clone()
    }

    pub fn branch_labels(&self) -> Vec<BranchLabel> {
        self.branches.lock().unwrap().clone()
    }

    pub fn last_branch(&self) -> Option<BranchLabel> {
        self.branches.lock().unwrap().last().cloned()
    }

    pub fn branch_hidden(&self) -> bool {
        *self.branch_hidden.lock().unwrap()
    }

    pub fn panel_visible(&self) -> Option<bool> {
        *self.panel_visible.lock().unwrap()
    }

    pub fn last_view(&self) -> Option<StatusView> {
        self.views.lock().unwrap().last().cloned()
    }

    pub fn select_all(&self) -> Option<bool> {
        *self.select_all.lock().unwrap()
    }

    pub fn bash_available(&self) -> Option<bool> {
        *self.bash_available.lock().unwrap()
    }
}

impl BusyIndicator for RecordingSurface {
    fn set_busy(&self, busy: bool) {
        self.busy.lock().unwrap().push(busy);
    }
}

impl Surface for RecordingSurface {
    fn show_version(&self, version: &str) {
        *self.version.lock().unwrap() = Some(Ok(version.to_string()));
    }

    fn show_version_error(&self, error: &str) {
        *self.version.lock().unwrap() = Some(Err(error.to_string()));
    }

    fn show_branch(&self, label: &BranchLabel) {
        *self.branch_hidden.lock().unwrap() = false;
        self.branches.lock().unwrap().push(label.clone());
    }

    fn hide_branch(&self) {
        *self.branch_hidden.lock().unwrap() = true;
    }

    fn set_panel_visible(&self, visible: bool) {
        *self.panel_visible.lock().unwrap() = Some(visible);
    }

    fn render_status(&self, view: &StatusView) {
        self.views.lock().unwrap().push(view.clone());
    }

    fn set_select_all(&self, checked: bool) {
        *self.select_all.lock().unwrap() = Some(checked);
    }

    fn set_bash_available(&self, available: bool) {
        *self.bash_available.lock().unwrap() = Some(available);
    }
}

/// A git client over a fresh mock channel rooted at `root`.
pub fn client_with(root: &str) -> (GitClient<MockChannel>, MockChannel, Arc<RecordingSurface>) {
    let surface = Arc::new(RecordingSurface::default());
    let channel = MockChannel::default();
    let client = GitClient::new(
        channel.clone(),
        GitCommands::default(),
        BusyTracker::new(surface.clone()),
        ProjectRoot::new(root),
    );
    (client, channel, surface)
}

/// A refresher wired to mocks, with handles to inspect them.
pub struct Harness {
    pub channel: MockChannel,
    pub surface: Arc<RecordingSurface>,
    pub prefs: Arc<MemoryPreferences>,
    pub refresher: Arc<Refresher<MockChannel>>,
}

impl Harness {
    pub fn new(root: &str) -> Self {
        let (client, channel, surface) = client_with(root);
        let prefs = Arc::new(MemoryPreferences::new());
        let panel = Arc::new(PanelController::new(prefs.clone(), surface.clone(), "gitpane"));
        let refresher = Arc::new(Refresher::new(client, panel, surface.clone()));
        Self {
            channel,
            surface,
            prefs,
            refresher,
        }
    }

    /// Show the panel first.
    pub fn visible(self) -> Self {
        self.refresher.panel().toggle();
        self
    }
}
