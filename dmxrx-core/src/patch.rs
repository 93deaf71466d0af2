//! Fixture patch and change tracking
//!
//! A fixture is a window of consecutive channels. The tracker keeps the
//! channel values seen at the last `update` so a monitor can highlight
//! what moved since it last looked.

use heapless::Vec;

use crate::config::{Fixture, MAX_FIXTURE_CHANNELS};
use crate::frame::CHANNEL_COUNT;
use crate::store::FrameStore;

/// One channel that differs from the tracker's snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelChange {
    /// Channel within the fixture (1-based)
    pub fixture_channel: u16,
    /// Universe address (1-based)
    pub address: u16,
    /// Value at the last snapshot
    pub old: u8,
    /// Current value
    pub new: u8,
}

/// Changes for one fixture, bounded by the fixture width
pub type FixtureChanges = Vec<ChannelChange, MAX_FIXTURE_CHANNELS>;

/// Current values of a fixture's channels
///
/// Empty when the store holds no valid frame.
pub fn fixture_values<'a>(store: &'a FrameStore, fixture: &Fixture) -> &'a [u8] {
    match store.channels() {
        Some(channels) if fixture.is_valid() => &channels[fixture.slot_range()],
        _ => &[],
    }
}

/// Snapshot-based change detector
#[derive(Debug, Clone)]
pub struct ChangeTracker {
    snapshot: [u8; CHANNEL_COUNT],
}

impl Default for ChangeTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeTracker {
    /// Create a tracker with an all-zero snapshot
    pub const fn new() -> Self {
        Self {
            snapshot: [0; CHANNEL_COUNT],
        }
    }

    /// Channels of `fixture` that differ from the snapshot
    pub fn changes(&self, store: &FrameStore, fixture: &Fixture) -> FixtureChanges {
        let mut changes = FixtureChanges::new();
        let values = fixture_values(store, fixture);
        if values.is_empty() {
            return changes;
        }
        let base = fixture.slot_range().start;

        for (i, &new) in values.iter().enumerate() {
            let old = self.snapshot[base + i];
            if old != new {
                // Capacity equals the widest valid fixture
                let _ = changes.push(ChannelChange {
                    fixture_channel: i as u16 + 1,
                    address: fixture.address + i as u16,
                    old,
                    new,
                });
            }
        }

        changes
    }

    /// Check if any channel of `fixture` moved since the snapshot
    pub fn has_changed(&self, store: &FrameStore, fixture: &Fixture) -> bool {
        let values = fixture_values(store, fixture);
        !values.is_empty() && values != &self.snapshot[fixture.slot_range()]
    }

    /// Take a new snapshot from the store; no-op without a valid frame
    pub fn update(&mut self, store: &FrameStore) {
        if let Some(channels) = store.channels() {
            self.snapshot.copy_from_slice(channels);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FRAME_LEN;

    fn store_with(set: &[(usize, u8)]) -> FrameStore {
        let mut frame = [0u8; FRAME_LEN];
        for &(ch, v) in set {
            frame[ch] = v;
        }
        let mut store = FrameStore::default();
        store.commit(&frame, 0);
        store
    }

    #[test]
    fn test_fixture_values_window() {
        let store = store_with(&[(12, 1), (22, 11), (23, 99)]);
        let spot = Fixture::new("PicoSpot 2", 12, 11).unwrap();
        let values = fixture_values(&store, &spot);
        assert_eq!(values.len(), 11);
        assert_eq!(values[0], 1);
        assert_eq!(values[10], 11);
    }

    #[test]
    fn test_fixture_values_empty_without_frame() {
        let store = FrameStore::default();
        let spot = Fixture::new("spot", 1, 4).unwrap();
        assert!(fixture_values(&store, &spot).is_empty());
    }

    #[test]
    fn test_changes_against_snapshot() {
        let rgb = Fixture::new("RGB LED 1", 23, 5).unwrap();
        let mut tracker = ChangeTracker::new();

        let store = store_with(&[(24, 200)]);
        let changes = tracker.changes(&store, &rgb);
        assert_eq!(
            changes.as_slice(),
            &[ChannelChange {
                fixture_channel: 2,
                address: 24,
                old: 0,
                new: 200,
            }]
        );
        assert!(tracker.has_changed(&store, &rgb));

        tracker.update(&store);
        assert!(tracker.changes(&store, &rgb).is_empty());
        assert!(!tracker.has_changed(&store, &rgb));
    }

    #[test]
    fn test_changes_outside_fixture_ignored() {
        let rgb = Fixture::new("RGB", 23, 5).unwrap();
        let tracker = ChangeTracker::new();
        let store = store_with(&[(22, 5), (28, 5)]);
        assert!(tracker.changes(&store, &rgb).is_empty());
    }

    #[test]
    fn test_update_without_frame_keeps_snapshot() {
        let rgb = Fixture::new("RGB", 1, 2).unwrap();
        let mut tracker = ChangeTracker::new();
        tracker.update(&store_with(&[(1, 50)]));
        tracker.update(&FrameStore::default());

        let store = store_with(&[(1, 50)]);
        assert!(!tracker.has_changed(&store, &rgb));
    }

    #[test]
    fn test_invalid_fixture_reports_nothing() {
        let tracker = ChangeTracker::new();
        let store = store_with(&[(1, 9), (512, 9)]);

        let unpatched = Fixture::default();
        assert!(tracker.changes(&store, &unpatched).is_empty());
        assert!(!tracker.has_changed(&store, &unpatched));

        let overhanging = Fixture {
            address: 510,
            channels: 8,
            ..Fixture::default()
        };
        assert!(tracker.changes(&store, &overhanging).is_empty());
        assert!(!tracker.has_changed(&store, &overhanging));
    }
}
