//! Routing editor events and user gestures to refresh work.
//!
//! The router reads one input at a time from the host. Anything that talks
//! to git is spawned as its own task, so refreshes overlap freely and their
//! results are reconciled by the context's root check, not by ordering.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gitpane_git::CommandChannel;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::commit::{CommitRequest, CommitWorkflow};
use crate::error::Result;
use crate::panel::PanelVisibility;
use crate::refresh::Refresher;

/// Lifecycle notifications from the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    ProjectOpen(PathBuf),
    ProjectRefresh,
    BeforeProjectClose,
    ProjectFilesChange,
    DocumentSaved,
}

/// Actions the user takes on the panel and indicators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserGesture {
    TogglePanel,
    ClosePanel,
    SelectAll(bool),
    ToggleRow(usize),
    Commit(String),
    Reset,
    OpenBash,
}

/// Anything the host can send to the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Editor(EditorEvent),
    Gesture(UserGesture),
}

impl From<EditorEvent> for Input {
    fn from(event: EditorEvent) -> Self {
        Self::Editor(event)
    }
}

impl From<UserGesture> for Input {
    fn from(gesture: UserGesture) -> Self {
        Self::Gesture(gesture)
    }
}

/// Turns a stream of [`Input`]s into refreshes and git calls.
pub struct EventRouter<C: CommandChannel + 'static> {
    refresher: Arc<Refresher<C>>,
    events: mpsc::UnboundedReceiver<Input>,
    tasks: JoinSet<()>,
    bash_available: Arc<AtomicBool>,
}

impl<C: CommandChannel + 'static> EventRouter<C> {
    /// Create a router fed by `events`.
    pub fn new(refresher: Arc<Refresher<C>>, events: mpsc::UnboundedReceiver<Input>) -> Self {
        Self {
            refresher,
            events,
            tasks: JoinSet::new(),
            bash_available: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Bring the UI up: version first, and only if git answers, the panel,
    /// the branch indicator and the bash check.
    ///
    /// # Errors
    /// Returns error if git is not available.
    pub async fn initialize(&mut self) -> Result<()> {
        self.refresher.init_version().await?;

        if self.refresher.panel().restore() {
            self.refresher.refresh_status().await;
        }
        let (available, ()) = tokio::join!(
            self.refresher.detect_bash(),
            self.refresher.refresh_branch()
        );
        self.bash_available.store(available, Ordering::Relaxed);
        Ok(())
    }

    /// Process inputs until the sender side closes, then wait for work
    /// still in flight.
    pub async fn run(mut self) {
        while let Some(input) = self.events.recv().await {
            self.dispatch(input);
            // Reap finished tasks so the set does not grow unbounded.
            while self.tasks.try_join_next().is_some() {}
        }
        while self.tasks.join_next().await.is_some() {}
    }

    fn spawn<F, Fut>(&mut self, work: F)
    where
        F: FnOnce(Arc<Refresher<C>>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(work(Arc::clone(&self.refresher)));
    }

    /// Handle one input. Git work is spawned, never awaited here.
    pub fn dispatch(&mut self, input: Input) {
        match input {
            Input::Editor(event) => self.on_editor(event),
            Input::Gesture(gesture) => self.on_gesture(gesture),
        }
    }

    fn on_editor(&mut self, event: EditorEvent) {
        tracing::debug!(?event, "editor event");
        match event {
            EditorEvent::ProjectOpen(root) => {
                self.refresher.switch_project(&root);
                self.spawn(|r| async move { r.refresh_all().await });
            }
            EditorEvent::ProjectRefresh
            | EditorEvent::ProjectFilesChange
            | EditorEvent::DocumentSaved => {
                self.spawn(|r| async move { r.refresh_all().await });
            }
            EditorEvent::BeforeProjectClose => self.refresher.surface().hide_branch(),
        }
    }

    fn on_gesture(&mut self, gesture: UserGesture) {
        tracing::debug!(?gesture, "user gesture");
        let panel = self.refresher.panel();
        match gesture {
            UserGesture::TogglePanel => {
                if panel.toggle() == PanelVisibility::Visible {
                    self.spawn(|r| async move { r.refresh_status().await });
                }
            }
            UserGesture::ClosePanel => {
                panel.close();
            }
            UserGesture::SelectAll(checked) => panel.set_all_checked(checked),
            UserGesture::ToggleRow(index) => panel.toggle_row(index),
            UserGesture::Commit(message) => {
                let Some(request) = CommitRequest::new(panel.checked_files(), message) else {
                    return;
                };
                self.spawn(|r| async move {
                    if let Err(e) = CommitWorkflow::new(&r).run(&request).await {
                        tracing::error!(error = %e, "commit failed");
                    }
                });
            }
            UserGesture::Reset => self.spawn(|r| async move {
                if let Err(e) = r.reset().await {
                    tracing::error!(error = %e, "reset failed");
                }
            }),
            UserGesture::OpenBash => {
                if !self.bash_available.load(Ordering::Relaxed) {
                    tracing::debug!("bash not available, ignoring");
                    return;
                }
                self.spawn(|r| async move {
                    if let Err(e) = r.open_bash().await {
                        tracing::error!(error = %e, "failed to open bash");
                    }
                });
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::prefs::PreferenceStore;
    use crate::surface::{BranchLabel, StatusView};
    use crate::test_mocks::{Harness, STATUS};

    const TOPLEVEL: &str = "git rev-parse --show-toplevel";
    const BRANCH: &str = "git rev-parse --abbrev-ref HEAD";

    fn router(h: &Harness) -> (EventRouter<crate::test_mocks::MockChannel>, mpsc::UnboundedSender<Input>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EventRouter::new(Arc::clone(&h.refresher), rx), tx)
    }

    fn script_repo(h: &Harness, root: &str, branch: &str, status: &str) {
        h.channel.respond_in(root, TOPLEVEL, Ok(root));
        h.channel.respond_in(root, BRANCH, Ok(branch));
        h.channel.respond_in(root, STATUS, Ok(status));
    }

    async fn feed(h: &Harness, inputs: Vec<Input>) {
        let (router, tx) = router(h);
        for input in inputs {
            tx.send(input).unwrap();
        }
        drop(tx);
        router.run().await;
    }

    #[tokio::test]
    async fn test_initialize_restores_visible_panel() {
        let h = Harness::new("/repo");
        h.prefs.set_value("gitpane.enabled", serde_json::json!(true)).unwrap();
        h.channel.respond("git --version", Ok("git version 2.40.0"));
        h.channel.respond("bash --version", Ok("GNU bash"));
        script_repo(&h, "/repo", "main", " M a.txt");

        let (mut router, _tx) = router(&h);
        router.initialize().await.unwrap();

        assert!(h.refresher.panel().is_visible());
        assert_eq!(h.surface.version(), Some(Ok("2.40.0".to_string())));
        assert_eq!(h.surface.last_branch(), Some(BranchLabel::Branch("main".into())));
        assert_eq!(h.refresher.panel().files().len(), 1);
        assert_eq!(h.surface.bash_available(), Some(true));
    }

    #[tokio::test]
    async fn test_initialize_stops_without_git() {
        let h = Harness::new("/repo");
        h.channel.respond("git --version", Err("No such file or directory"));

        let (mut router, _tx) = router(&h);
        assert!(router.initialize().await.is_err());
        assert_eq!(h.channel.commands(), vec!["git --version"]);
    }

    #[tokio::test]
    async fn test_project_open_switches_root_before_refresh() {
        let h = Harness::new("/one").visible();
        script_repo(&h, "/two", "feature", "?? new.txt");

        feed(&h, vec![EditorEvent::ProjectOpen("/two".into()).into()]).await;

        assert!(h.channel.calls().iter().all(|(root, _)| root == &PathBuf::from("/two")));
        let ctx = h.refresher.context().snapshot();
        assert_eq!(ctx.root_path, PathBuf::from("/two"));
        assert_eq!(ctx.branch_name.as_deref(), Some("feature"));
        assert_eq!(ctx.status[0].filename, "new.txt");
    }

    #[tokio::test]
    async fn test_lifecycle_events_refresh_branch_and_status() {
        for event in [
            EditorEvent::ProjectRefresh,
            EditorEvent::ProjectFilesChange,
            EditorEvent::DocumentSaved,
        ] {
            let h = Harness::new("/repo").visible();
            script_repo(&h, "/repo", "main", "");

            feed(&h, vec![event.into()]).await;

            let mut commands = h.channel.commands();
            commands.sort();
            assert_eq!(commands, vec![BRANCH, TOPLEVEL, STATUS]);
        }
    }

    #[tokio::test]
    async fn test_hidden_panel_events_only_refresh_branch() {
        let h = Harness::new("/repo");
        script_repo(&h, "/repo", "main", "");

        feed(&h, vec![EditorEvent::DocumentSaved.into()]).await;

        assert!(!h.channel.commands().contains(&STATUS.to_string()));
    }

    #[tokio::test]
    async fn test_before_close_hides_branch_only() {
        let h = Harness::new("/repo").visible();
        feed(&h, vec![EditorEvent::BeforeProjectClose.into()]).await;

        assert!(h.surface.branch_hidden());
        assert!(h.refresher.panel().is_visible());
        assert!(h.channel.calls().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_into_visible_refreshes() {
        let h = Harness::new("/repo");
        h.channel.respond(STATUS, Ok(""));

        feed(&h, vec![UserGesture::TogglePanel.into()]).await;
        assert_eq!(h.channel.commands(), vec![STATUS]);
        assert_eq!(h.surface.last_view(), Some(StatusView::NothingToCommit));

        feed(&h, vec![UserGesture::ClosePanel.into()]).await;
        assert_eq!(h.channel.commands(), vec![STATUS]);
        assert!(!h.refresher.panel().is_visible());
        assert_eq!(h.prefs.get_value("gitpane.enabled"), Some(serde_json::json!(false)));
    }

    #[tokio::test]
    async fn test_commit_gesture_uses_checked_rows() {
        let h = Harness::new("/repo").visible();
        h.channel.respond(STATUS, Ok(" M a.txt\n D b.txt\n M c.txt"));
        h.refresher.refresh_status().await;
        h.channel.respond("git add -- a.txt", Ok(""));
        h.channel.respond("git add -u -- b.txt", Ok(""));
        h.channel.respond("git commit -m fix", Ok(""));

        feed(
            &h,
            vec![
                UserGesture::ToggleRow(0).into(),
                UserGesture::ToggleRow(1).into(),
                UserGesture::Commit("fix".into()).into(),
            ],
        )
        .await;

        assert_eq!(
            h.channel.commands(),
            vec![
                STATUS,
                "git add -- a.txt",
                "git add -u -- b.txt",
                "git commit -m fix",
                STATUS
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_commit_skips_refresh() {
        let h = Harness::new("/repo").visible();
        h.channel.respond(STATUS, Ok(" M a.txt"));
        h.refresher.refresh_status().await;
        h.channel.respond("git add -- a.txt", Ok(""));
        h.channel.respond("git commit -m fix", Err("nothing added to commit"));

        feed(
            &h,
            vec![
                UserGesture::SelectAll(true).into(),
                UserGesture::Commit("fix".into()).into(),
            ],
        )
        .await;

        assert_eq!(
            h.channel.commands(),
            vec![STATUS, "git add -- a.txt", "git commit -m fix"]
        );
        assert_eq!(h.refresher.panel().checked_files().len(), 1);
        assert!(!h.surface.is_busy());
    }

    #[tokio::test]
    async fn test_rows_of_previous_project_are_never_committed() {
        let h = Harness::new("/one").visible();
        h.channel.respond_in("/one", STATUS, Ok(" M only_in_one.txt"));
        h.refresher.refresh_status().await;
        script_repo(&h, "/two", "main", "");
        let slow_status = h.channel.gate_in("/two", STATUS);

        let (router, tx) = router(&h);
        for input in [
            Input::from(EditorEvent::ProjectOpen("/two".into())),
            UserGesture::ToggleRow(0).into(),
            UserGesture::Commit("fix".into()).into(),
        ] {
            tx.send(input).unwrap();
        }
        drop(tx);

        let release = async {
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
            slow_status.open();
        };
        tokio::join!(router.run(), release);

        assert!(
            h.channel
                .commands()
                .iter()
                .all(|cmd| !cmd.starts_with("git add") && !cmd.starts_with("git commit"))
        );
        assert!(h.refresher.panel().files().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_commit_issues_nothing() {
        let h = Harness::new("/repo").visible();
        h.channel.respond(STATUS, Ok(" M a.txt"));
        h.refresher.refresh_status().await;

        feed(
            &h,
            vec![
                UserGesture::Commit("fix".into()).into(),
                UserGesture::SelectAll(true).into(),
                UserGesture::Commit("   ".into()).into(),
            ],
        )
        .await;

        assert_eq!(h.channel.commands(), vec![STATUS]);
    }

    #[tokio::test]
    async fn test_open_bash_requires_detection() {
        let h = Harness::new("/repo");
        h.channel.respond("x-terminal-emulator", Ok(""));

        feed(&h, vec![UserGesture::OpenBash.into()]).await;
        assert!(h.channel.calls().is_empty());

        h.channel.respond("git --version", Ok("git version 2.40.0"));
        h.channel.respond("bash --version", Ok("GNU bash"));
        h.channel.respond(TOPLEVEL, Err("not a repo"));
        let (mut router, tx) = router(&h);
        router.initialize().await.unwrap();
        tx.send(UserGesture::OpenBash.into()).unwrap();
        drop(tx);
        router.run().await;

        assert!(h.channel.commands().contains(&"x-terminal-emulator".to_string()));
    }
}
