//! # gitpane-core
//!
//! Orchestration layer between an editor and git: counts in-flight
//! commands for the busy indicator, keeps a race-safe view of the current
//! repository, stages and commits selected files, and routes editor
//! events and user gestures to the right refreshes.

pub mod busy;
pub mod client;
pub mod commit;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod panel;
pub mod prefs;
pub mod project;
pub mod refresh;
pub mod surface;

#[cfg(test)]
mod test_mocks;

pub use busy::{BusyIndicator, BusyTracker, OperationHandle, OperationKind};
pub use client::GitClient;
pub use commit::{CommitOutcome, CommitRequest, CommitWorkflow};
pub use config::Config;
pub use context::{ContextCell, RepositoryContext};
pub use error::{Error, Result};
pub use events::{EditorEvent, EventRouter, Input, UserGesture};
pub use panel::{PanelController, PanelVisibility};
pub use prefs::{FilePreferences, MemoryPreferences, PreferenceStore};
pub use project::ProjectRoot;
pub use refresh::Refresher;
pub use surface::{BranchLabel, FileRow, NOTHING_TO_COMMIT, StatusView, Surface};
