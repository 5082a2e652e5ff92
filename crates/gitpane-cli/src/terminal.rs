//! Text rendering of the panel, branch indicator and busy spinner.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use gitpane_core::{BranchLabel, BusyIndicator, NOTHING_TO_COMMIT, StatusView, Surface};
use indicatif::{ProgressBar, ProgressStyle};

use crate::output;

const SPINNER_TICK: Duration = Duration::from_millis(80);

/// [`Surface`] that prints to the terminal.
///
/// Rendered state goes to stdout. The spinner draws on stderr and hides
/// itself when stderr is not a terminal.
#[derive(Default)]
pub struct TerminalSurface {
    spinner: Mutex<Option<ProgressBar>>,
    select_all: AtomicBool,
}

impl TerminalSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn spinner() -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            bar.set_style(style);
        }
        bar.set_message("git");
        bar.enable_steady_tick(SPINNER_TICK);
        bar
    }

    /// Print while keeping the spinner out of the way.
    fn print(&self, f: impl FnOnce()) {
        let spinner = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        match spinner.as_ref() {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }
}

impl BusyIndicator for TerminalSurface {
    fn set_busy(&self, busy: bool) {
        let mut spinner = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if busy {
            if spinner.is_none() && !output::is_quiet() {
                *spinner = Some(Self::spinner());
            }
        } else if let Some(bar) = spinner.take() {
            bar.finish_and_clear();
        }
    }
}

impl Surface for TerminalSurface {
    fn show_version(&self, version: &str) {
        self.print(|| output::info(&format!("git {version}")));
    }

    fn show_version_error(&self, error: &str) {
        self.print(|| output::error(&format!("git is not available: {error}")));
    }

    fn show_branch(&self, label: &BranchLabel) {
        match label {
            BranchLabel::Checking | BranchLabel::Cleared => {
                tracing::debug!(label = ?label, "branch indicator");
            }
            _ => self.print(|| output::info(&format!("Branch {}", output::branch_label(label)))),
        }
    }

    fn hide_branch(&self) {
        tracing::debug!("branch indicator hidden");
    }

    fn set_panel_visible(&self, visible: bool) {
        let msg = if visible { "Panel shown" } else { "Panel hidden" };
        self.print(|| output::info(msg));
    }

    fn render_status(&self, view: &StatusView) {
        self.print(|| match view {
            StatusView::NothingToCommit => output::detail(NOTHING_TO_COMMIT),
            StatusView::Files(rows) => {
                output::hr();
                for (index, row) in rows.iter().enumerate() {
                    output::detail(&output::file_row(index + 1, row));
                }
                output::hr();
            }
        });
    }

    fn set_select_all(&self, checked: bool) {
        if self.select_all.swap(checked, Ordering::Relaxed) != checked {
            self.print(|| output::detail(&format!("{} all", output::checkbox(checked))));
        }
    }

    fn set_bash_available(&self, available: bool) {
        if available {
            self.print(|| output::detail("Type `bash` to open a shell in the project root"));
        } else {
            tracing::debug!("bash not found");
        }
    }
}
