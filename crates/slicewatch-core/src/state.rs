// ── Shared dashboard state ──
//
// One process-wide state container with a single writer role (the
// synchronization layer) and any number of readers. Updates are atomic
// whole-object replacements broadcast through a `watch` channel, so a
// reader can never observe a partially-applied refresh.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::model::{Alert, SliceDetail, SliceId, SliceSummary};

/// Everything the presentation layer needs to render the dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    /// The slice collection, replaced wholesale on every successful
    /// list tick — exact server order, no merging with prior state.
    pub slices: Vec<SliceSummary>,
    /// Current selection. May dangle (id no longer present in
    /// `slices`) — deliberately neither cleared nor reassigned.
    pub selected_id: Option<SliceId>,
    /// Detail for the selection as of the last successful fetch.
    pub selected_detail: Option<SliceDetail>,
    /// Alerts for the selection as of the last successful fetch.
    pub selected_alerts: Vec<Alert>,
    /// True between a selection change and the first detail commit.
    pub detail_loading: bool,
}

impl DashboardState {
    /// The selected slice's list entry, if the selection isn't dangling.
    pub fn selected_summary(&self) -> Option<&SliceSummary> {
        let id = self.selected_id.as_ref()?;
        self.slices.iter().find(|s| &s.id == id)
    }

    /// Whether the selection refers to a slice no longer in the list.
    pub fn selection_is_dangling(&self) -> bool {
        match &self.selected_id {
            Some(id) => !self.slices.iter().any(|s| &s.id == id),
            None => false,
        }
    }
}

/// Single-writer state cell, the engine's one mutation point.
///
/// Every mutation clones the current state, applies a closure, and
/// publishes the result as a fresh `Arc` — readers holding the old
/// snapshot are unaffected, subscribers wake on the new one. A version
/// counter bumps on every publish for cheap change detection.
pub(crate) struct StateCell {
    state: watch::Sender<Arc<DashboardState>>,
    version: watch::Sender<u64>,
}

impl StateCell {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(DashboardState::default()));
        let (version, _) = watch::channel(0u64);
        Self { state, version }
    }

    /// Current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<DashboardState> {
        self.state.borrow().clone()
    }

    /// Subscribe to state replacements.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<DashboardState>> {
        self.state.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Apply a mutation as an atomic whole-object replacement.
    ///
    /// The clone-mutate-replace runs inside `send_modify`, under the
    /// sender's lock: concurrent writers serialize and every update
    /// lands. Publishes even with zero receivers.
    pub(crate) fn update(&self, mutate: impl FnOnce(&mut DashboardState)) {
        self.state.send_modify(|current| {
            let mut next = (**current).clone();
            mutate(&mut next);
            *current = Arc::new(next);
        });
        self.version.send_modify(|v| *v += 1);
    }

    /// Apply a mutation only when `check` passes against the state at
    /// commit time, under the same lock as the replacement. Returns
    /// whether anything was published.
    pub(crate) fn update_if(
        &self,
        check: impl FnOnce(&DashboardState) -> bool,
        mutate: impl FnOnce(&mut DashboardState),
    ) -> bool {
        let published = self.state.send_if_modified(|current| {
            if !check(current) {
                return false;
            }
            let mut next = (**current).clone();
            mutate(&mut next);
            *current = Arc::new(next);
            true
        });
        if published {
            self.version.send_modify(|v| *v += 1);
        }
        published
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{QosClass, SliceStatus};

    fn summary(id: &str) -> SliceSummary {
        SliceSummary {
            id: SliceId::new(id),
            name: id.to_owned(),
            tenant: "t".into(),
            qos_class: QosClass::Gold,
            status: SliceStatus::Active,
            devices: Vec::new(),
            metrics: Vec::new(),
        }
    }

    #[test]
    fn update_replaces_whole_object() {
        let cell = StateCell::new();
        let before = cell.snapshot();

        cell.update(|s| s.slices = vec![summary("a")]);

        let after = cell.snapshot();
        assert!(before.slices.is_empty());
        assert_eq!(after.slices.len(), 1);
        assert_eq!(cell.version(), 1);
    }

    #[test]
    fn old_snapshots_survive_later_updates() {
        let cell = StateCell::new();
        cell.update(|s| s.slices = vec![summary("a")]);
        let held = cell.snapshot();

        cell.update(|s| s.slices.clear());

        assert_eq!(held.slices.len(), 1);
        assert!(cell.snapshot().slices.is_empty());
    }

    #[test]
    fn subscriber_sees_every_publish() {
        let cell = StateCell::new();
        let mut rx = cell.subscribe();
        assert!(!rx.has_changed().unwrap());

        cell.update(|s| s.selected_id = Some(SliceId::new("a")));
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().selected_id,
            Some(SliceId::new("a"))
        );
    }

    #[test]
    fn concurrent_updates_all_land() {
        let cell = Arc::new(StateCell::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cell = Arc::clone(&cell);
                std::thread::spawn(move || {
                    for i in 0..200 {
                        cell.update(|s| s.slices.push(summary(&format!("{t}-{i}"))));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cell.snapshot().slices.len(), 1600);
        assert_eq!(cell.version(), 1600);
    }

    #[test]
    fn guarded_update_skips_without_publishing() {
        let cell = StateCell::new();
        cell.update(|s| s.selected_id = Some(SliceId::new("a")));
        let version = cell.version();

        let committed = cell.update_if(
            |s| s.selected_id == Some(SliceId::new("b")),
            |s| s.detail_loading = true,
        );

        assert!(!committed);
        assert_eq!(cell.version(), version);
        assert!(!cell.snapshot().detail_loading);

        let committed = cell.update_if(
            |s| s.selected_id == Some(SliceId::new("a")),
            |s| s.detail_loading = true,
        );

        assert!(committed);
        assert_eq!(cell.version(), version + 1);
        assert!(cell.snapshot().detail_loading);
    }

    #[test]
    fn dangling_selection_detection() {
        let mut state = DashboardState {
            slices: vec![summary("a")],
            selected_id: Some(SliceId::new("a")),
            ..DashboardState::default()
        };
        assert!(!state.selection_is_dangling());
        assert!(state.selected_summary().is_some());

        state.slices.clear();
        assert!(state.selection_is_dangling());
        assert!(state.selected_summary().is_none());
    }
}
