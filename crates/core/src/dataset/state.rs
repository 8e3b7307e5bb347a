//! Process-wide snapshot state with a staleness guard.

use std::sync::Arc;

use parking_lot::RwLock;

use super::loader::Snapshot;

/// Holder for the currently installed snapshot.
///
/// Writes happen only at the join point of a load attempt. Each attempt is
/// tagged with a generation from [`SnapshotSlot::begin`], and only the most
/// recently issued generation may install, so a slow attempt that resolves
/// after a newer one has started can never overwrite newer data. Failed
/// attempts install nothing, so the previous snapshot stays active.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSlot {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    current: Option<Arc<Snapshot>>,
    latest_issued: u64,
    installed: u64,
}

impl SnapshotSlot {
    /// Create an empty slot; nothing is installed until the first
    /// successful load.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a new load attempt, superseding all earlier ones.
    pub fn begin(&self) -> u64 {
        let mut inner = self.inner.write();
        inner.latest_issued += 1;
        inner.latest_issued
    }

    /// Install the result of attempt `generation`.
    ///
    /// Returns `false` and leaves the slot untouched when a newer attempt
    /// has been started since.
    pub fn install(&self, generation: u64, snapshot: Arc<Snapshot>) -> bool {
        let mut inner = self.inner.write();
        if generation != inner.latest_issued {
            return false;
        }
        inner.current = Some(snapshot);
        inner.installed = generation;
        true
    }

    /// The currently installed snapshot, if any load has succeeded yet.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.inner.read().current.clone()
    }

    /// Generation of the installed snapshot (0 before the first install).
    pub fn installed_generation(&self) -> u64 {
        self.inner.read().installed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::testing::{sample_units, sample_warbands};
    use crate::dataset::CrossIndex;
    use crate::models::DatasetMeta;
    use chrono::Utc;

    fn snapshot_with_units(count: usize) -> Arc<Snapshot> {
        let units = sample_units().into_iter().take(count).collect::<Vec<_>>();
        let warbands = sample_warbands();
        let index = CrossIndex::build(&units, &warbands);
        Arc::new(Snapshot {
            units,
            warbands,
            meta: DatasetMeta::default(),
            index,
            loaded_at: Utc::now(),
        })
    }

    #[test]
    fn first_install_succeeds() {
        let slot = SnapshotSlot::new();
        assert!(slot.current().is_none());

        let generation = slot.begin();
        assert!(slot.install(generation, snapshot_with_units(2)));
        assert_eq!(slot.current().expect("installed").units.len(), 2);
        assert_eq!(slot.installed_generation(), generation);
    }

    #[test]
    fn superseded_attempt_is_discarded_even_when_it_resolves_last() {
        let slot = SnapshotSlot::new();
        let first = slot.begin();
        let second = slot.begin();

        // Newer attempt finishes first and installs.
        assert!(slot.install(second, snapshot_with_units(2)));
        // The stale attempt resolves afterwards and must be rejected.
        assert!(!slot.install(first, snapshot_with_units(1)));

        assert_eq!(slot.current().expect("installed").units.len(), 2);
        assert_eq!(slot.installed_generation(), second);
    }

    #[test]
    fn an_attempt_is_stale_as_soon_as_a_newer_one_begins() {
        let slot = SnapshotSlot::new();
        let first = slot.begin();
        let _second = slot.begin();

        assert!(!slot.install(first, snapshot_with_units(1)));
        assert!(slot.current().is_none());
    }

    #[test]
    fn failed_attempts_leave_the_previous_snapshot_active() {
        let slot = SnapshotSlot::new();
        let generation = slot.begin();
        assert!(slot.install(generation, snapshot_with_units(2)));

        // A later attempt that fails simply never calls install.
        let _failed = slot.begin();
        assert_eq!(slot.current().expect("still installed").units.len(), 2);
    }
}
