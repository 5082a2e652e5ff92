//! Panel visibility and the checkable file table.

use std::sync::{Arc, Mutex, PoisonError};

use gitpane_git::FileChange;
use serde_json::Value;

use crate::prefs::PreferenceStore;
use crate::surface::{FileRow, StatusView, Surface};

/// Whether the results panel is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelVisibility {
    Hidden,
    Visible,
}

impl PanelVisibility {
    const fn flipped(self) -> Self {
        match self {
            Self::Hidden => Self::Visible,
            Self::Visible => Self::Hidden,
        }
    }

    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

#[derive(Debug)]
struct PanelState {
    visibility: PanelVisibility,
    rows: Vec<FileRow>,
}

/// Owns panel visibility (persisted) and the selection in the file table.
pub struct PanelController {
    state: Mutex<PanelState>,
    prefs: Arc<dyn PreferenceStore>,
    surface: Arc<dyn Surface>,
    key: String,
}

impl PanelController {
    /// Create a hidden panel whose visibility is stored under
    /// `<instance>.enabled`.
    pub fn new(
        prefs: Arc<dyn PreferenceStore>,
        surface: Arc<dyn Surface>,
        instance: &str,
    ) -> Self {
        Self {
            state: Mutex::new(PanelState {
                visibility: PanelVisibility::Hidden,
                rows: Vec::new(),
            }),
            prefs,
            surface,
            key: format!("{instance}.enabled"),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn visibility(&self) -> PanelVisibility {
        self.state().visibility
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility().is_visible()
    }

    /// Flip visibility and persist it.
    ///
    /// Returns the new visibility; moving into `Visible` is the caller's
    /// cue to refresh the status list.
    pub fn toggle(&self) -> PanelVisibility {
        let next = {
            let mut state = self.state();
            state.visibility = state.visibility.flipped();
            state.visibility
        };
        self.surface.set_panel_visible(next.is_visible());

        if let Err(e) = self
            .prefs
            .set_value(&self.key, Value::Bool(next.is_visible()))
        {
            tracing::warn!(key = %self.key, error = %e, "failed to persist panel visibility");
        }
        next
    }

    /// Hide the panel from its close control. Already hidden is a no-op.
    pub fn close(&self) -> PanelVisibility {
        if self.is_visible() {
            self.toggle()
        } else {
            PanelVisibility::Hidden
        }
    }

    /// Show the panel if it was visible in the previous session.
    ///
    /// Returns `true` when the panel was shown.
    pub fn restore(&self) -> bool {
        let enabled = self
            .prefs
            .get_value(&self.key)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        enabled && !self.is_visible() && self.toggle().is_visible()
    }

    /// Replace the file table with `files`, all unchecked.
    pub fn show_status(&self, files: Vec<FileChange>) {
        let rows: Vec<FileRow> = files
            .into_iter()
            .map(|change| FileRow {
                change,
                checked: false,
            })
            .collect();

        let view = if rows.is_empty() {
            StatusView::NothingToCommit
        } else {
            StatusView::Files(rows.clone())
        };
        self.state().rows = rows;

        self.surface.render_status(&view);
        if matches!(view, StatusView::Files(_)) {
            self.surface.set_select_all(false);
        }
    }

    /// Drop every row without rendering. Used when the project changes,
    /// until the new project's status arrives.
    pub fn clear(&self) {
        self.state().rows.clear();
    }

    /// Check or uncheck every row.
    pub fn set_all_checked(&self, checked: bool) {
        let rows = {
            let mut state = self.state();
            for row in &mut state.rows {
                row.checked = checked;
            }
            state.rows.clone()
        };
        if !rows.is_empty() {
            self.surface.set_select_all(checked);
            self.surface.render_status(&StatusView::Files(rows));
        }
    }

    /// Flip one row. An index past the end is ignored.
    pub fn toggle_row(&self, index: usize) {
        let rows = {
            let mut state = self.state();
            let Some(row) = state.rows.get_mut(index) else {
                return;
            };
            row.checked = !row.checked;
            state.rows.clone()
        };
        self.surface.render_status(&StatusView::Files(rows));
    }

    /// Files currently checked, in table order.
    #[must_use]
    pub fn checked_files(&self) -> Vec<FileChange> {
        self.state()
            .rows
            .iter()
            .filter(|row| row.checked)
            .map(|row| row.change.clone())
            .collect()
    }

    /// Files currently listed, in table order.
    #[must_use]
    pub fn files(&self) -> Vec<FileChange> {
        self.state()
            .rows
            .iter()
            .map(|row| row.change.clone())
            .collect()
    }
}
