//! Tracking of in-flight operations for the busy indicator.
//!
//! Every git call takes a handle from [`BusyTracker::begin`] and returns
//! it through [`BusyTracker::end`]. The indicator is active exactly while
//! at least one handle is live. Overlapping calls are counted by identity,
//! never by nesting, so completions may arrive in any order.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Receives idle/active transitions of the busy indicator.
pub trait BusyIndicator: Send + Sync {
    /// Called with `true` when the first operation starts and with
    /// `false` when the last one finishes.
    fn set_busy(&self, busy: bool);
}

/// Which git capability an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Version,
    RepositoryRoot,
    BranchName,
    Status,
    Add,
    Commit,
    Reset,
    BashOpen,
    BashVersion,
}

/// Identifies one in-flight operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationHandle {
    id: u64,
    kind: OperationKind,
}

impl OperationHandle {
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.kind
    }
}

#[derive(Debug, Default)]
struct Live {
    next_id: u64,
    ids: HashSet<u64>,
}

/// Multiset of live operation identifiers driving one indicator.
pub struct BusyTracker {
    live: Mutex<Live>,
    indicator: Arc<dyn BusyIndicator>,
}

impl BusyTracker {
    /// Create a tracker reporting to `indicator`.
    pub fn new(indicator: Arc<dyn BusyIndicator>) -> Self {
        Self {
            live: Mutex::new(Live::default()),
            indicator,
        }
    }

    /// Register a new operation and return its handle.
    pub fn begin(&self, kind: OperationKind) -> OperationHandle {
        let mut live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
        let id = live.next_id;
        live.next_id += 1;

        let was_idle = live.ids.is_empty();
        live.ids.insert(id);
        // Notify under the lock so transitions reach the indicator in order.
        if was_idle {
            self.indicator.set_busy(true);
        }

        OperationHandle { id, kind }
    }

    /// Retire an operation. Unknown or already retired handles are ignored.
    pub fn end(&self, handle: OperationHandle) {
        let mut live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
        if !live.ids.remove(&handle.id) {
            tracing::debug!(id = handle.id, kind = ?handle.kind, "ignoring retired handle");
            return;
        }
        if live.ids.is_empty() {
            self.indicator.set_busy(false);
        }
    }

    /// Number of operations currently in flight.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .ids
            .len()
    }

    /// Check whether any operation is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.live_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_mocks::RecordingSurface;

    fn tracker() -> (BusyTracker, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::default());
        (BusyTracker::new(surface.clone()), surface)
    }

    #[test]
    fn test_handles_are_monotonic() {
        let (busy, _) = tracker();
        let a = busy.begin(OperationKind::Status);
        let b = busy.begin(OperationKind::Add);
        assert!(b.id() > a.id());
        assert_eq!(b.kind(), OperationKind::Add);
    }

    #[test]
    fn test_indicator_follows_live_set() {
        let (busy, surface) = tracker();
        assert!(!busy.is_busy());

        let a = busy.begin(OperationKind::Status);
        let b = busy.begin(OperationKind::BranchName);
        assert_eq!(surface.busy_transitions(), vec![true]);

        // Out-of-order completion.
        busy.end(a);
        assert!(busy.is_busy());
        busy.end(b);
        assert!(!busy.is_busy());
        assert_eq!(surface.busy_transitions(), vec![true, false]);
    }

    #[test]
    fn test_double_end_is_noop() {
        let (busy, surface) = tracker();
        let a = busy.begin(OperationKind::Add);
        let b = busy.begin(OperationKind::Add);

        busy.end(a);
        busy.end(a);
        assert_eq!(busy.live_count(), 1);
        assert_eq!(surface.busy_transitions(), vec![true]);

        busy.end(b);
        assert_eq!(busy.live_count(), 0);
    }

    #[test]
    fn test_active_iff_unmatched_begins() {
        let (busy, surface) = tracker();
        let mut open = Vec::new();
        // Interleave begins and ends with a fixed pattern.
        for step in 0..40_u32 {
            if step % 3 == 2 {
                if let Some(h) = open.pop() {
                    busy.end(h);
                }
            } else {
                open.push(busy.begin(OperationKind::Status));
            }
            assert_eq!(busy.is_busy(), !open.is_empty());
            assert_eq!(surface.is_busy(), !open.is_empty());
        }
        while let Some(h) = open.pop() {
            busy.end(h);
            assert_eq!(surface.is_busy(), !open.is_empty());
        }
    }

    #[test]
    fn test_restart_after_idle() {
        let (busy, surface) = tracker();
        let a = busy.begin(OperationKind::Reset);
        busy.end(a);
        let b = busy.begin(OperationKind::Reset);
        busy.end(b);
        assert_eq!(surface.busy_transitions(), vec![true, false, true, false]);
    }
}
