//! Per-entity update tracking.

use bitflags::bitflags;

use crate::store::{Time, TimeRange};

bitflags! {
    /// What changed since an entity's previous update.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct UpdateFlags: u32 {
        /// The requested time resolves to a different sample.
        const SAMPLE_UPDATED = 1 << 0;
        /// The entity's variant selection changed.
        const VARIANT_SET_CHANGED = 1 << 1;
        /// The context's import settings changed.
        const IMPORT_SETTINGS_CHANGED = 1 << 2;
    }
}

impl UpdateFlags {
    /// Changes that invalidate cached topology.
    pub const TOPOLOGY: Self = Self::VARIANT_SET_CHANGED.union(Self::IMPORT_SETTINGS_CHANGED);
}

/// Decides whether an update at a given time has anything to do.
///
/// Times outside the sampled range resolve to the first or last sample, so
/// moving between two times on the same side of the range is a no-op.
#[derive(Debug, Clone, Default)]
pub struct UpdateTracker {
    time_prev: Option<Time>,
    pending: UpdateFlags,
}

impl UpdateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an update at `t` and return the flags it should act on.
    ///
    /// `range` is the time range of the entity's samples.
    pub fn begin_update(&mut self, t: Time, range: Option<TimeRange>) -> UpdateFlags {
        let resample = match (self.time_prev, range) {
            (None, _) => true,
            (Some(prev), _) if prev == t => false,
            (Some(_), None) => false,
            (Some(prev), Some(range)) => {
                let both_before = t <= range.start && prev <= range.start;
                let both_after = t >= range.end && prev >= range.end;
                !(both_before || both_after)
            }
        };

        let mut flags = std::mem::take(&mut self.pending);
        if resample {
            flags |= UpdateFlags::SAMPLE_UPDATED;
        }
        self.time_prev = Some(t);
        flags
    }

    /// Time of the most recent update.
    pub fn time_prev(&self) -> Option<Time> {
        self.time_prev
    }

    /// Add flags to the next update.
    pub fn notify(&mut self, flags: UpdateFlags) {
        self.pending |= flags;
    }

    /// Force the next update to resample.
    pub fn invalidate(&mut self) {
        self.time_prev = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: Option<TimeRange> = Some(TimeRange {
        start: 0.0,
        end: 10.0,
    });

    #[test]
    fn first_update_samples() {
        let mut tracker = UpdateTracker::new();
        assert_eq!(tracker.begin_update(3.0, RANGE), UpdateFlags::SAMPLE_UPDATED);
    }

    #[test]
    fn same_time_is_noop() {
        let mut tracker = UpdateTracker::new();
        tracker.begin_update(3.0, RANGE);
        assert!(tracker.begin_update(3.0, RANGE).is_empty());
        assert_eq!(tracker.time_prev(), Some(3.0));
    }

    #[test]
    fn clamped_times_are_noop() {
        let mut tracker = UpdateTracker::new();
        tracker.begin_update(-5.0, RANGE);
        assert!(tracker.begin_update(-1.0, RANGE).is_empty());
        assert!(!tracker.begin_update(4.0, RANGE).is_empty());
        tracker.begin_update(12.0, RANGE);
        assert!(tracker.begin_update(10.0, RANGE).is_empty());
    }

    #[test]
    fn unsampled_entity_updates_once() {
        let mut tracker = UpdateTracker::new();
        assert!(!tracker.begin_update(0.0, None).is_empty());
        assert!(tracker.begin_update(1.0, None).is_empty());
    }

    #[test]
    fn pending_flags_apply_once() {
        let mut tracker = UpdateTracker::new();
        tracker.begin_update(0.0, None);
        tracker.notify(UpdateFlags::IMPORT_SETTINGS_CHANGED);
        let flags = tracker.begin_update(0.0, None);
        assert_eq!(flags, UpdateFlags::IMPORT_SETTINGS_CHANGED);
        assert!(flags.intersects(UpdateFlags::TOPOLOGY));
        assert!(tracker.begin_update(0.0, None).is_empty());
    }

    #[test]
    fn variant_change_resamples_with_topology_flag() {
        let mut tracker = UpdateTracker::new();
        tracker.begin_update(2.0, RANGE);
        tracker.notify(UpdateFlags::VARIANT_SET_CHANGED);
        tracker.invalidate();
        let flags = tracker.begin_update(2.0, RANGE);
        assert!(flags.contains(UpdateFlags::SAMPLE_UPDATED | UpdateFlags::VARIANT_SET_CHANGED));
        assert!(flags.intersects(UpdateFlags::TOPOLOGY));
    }

    #[test]
    fn invalidate_forces_resample() {
        let mut tracker = UpdateTracker::new();
        tracker.begin_update(2.0, RANGE);
        tracker.invalidate();
        assert_eq!(tracker.begin_update(2.0, RANGE), UpdateFlags::SAMPLE_UPDATED);
    }
}
