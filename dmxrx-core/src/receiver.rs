//! Receiver context
//!
//! Owns the intake monitor, synchroniser, and frame store, and is the only
//! thing allowed to mutate them. One instance lives for the life of the
//! process; it is never shared with a second writer.
//!
//! ```ignore
//! let mut rx = DmxReceiver::new(&config.timing);
//!
//! // Hot path: drain whatever the transport has, never block
//! rx.drain(&mut uart)?;
//!
//! // Coarse tick
//! if let Some(LinkEvent::SignalLost) = rx.poll_timeout(clock.now_ms()) {
//!     // notify once
//! }
//! let level = rx.channel_level(1, clock.now_ms());
//! ```

use dmxrx_hal::{TimedByte, TimedByteSource};

use crate::config::TimingConfig;
use crate::intake::ByteIntake;
use crate::store::{FrameStore, LinkEvent};
use crate::sync::{FrameSynchronizer, SyncAction, SyncState};

/// Result of draining a byte source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrainSummary {
    /// Bytes consumed
    pub bytes: usize,
    /// Frames completed while draining
    pub frames: usize,
}

/// DMX512 receiver: intake, synchroniser, and store in one owned context
#[derive(Debug, Clone)]
pub struct DmxReceiver {
    intake: ByteIntake,
    sync: FrameSynchronizer,
    store: FrameStore,
}

impl Default for DmxReceiver {
    fn default() -> Self {
        Self::new(&TimingConfig::default())
    }
}

impl DmxReceiver {
    /// Create a receiver with zeroed buffers, awaiting a break
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            intake: ByteIntake::new(),
            sync: FrameSynchronizer::new(timing.break_threshold_us),
            store: FrameStore::new(timing.liveness_window_ms, timing.stale_window_ms),
        }
    }

    /// Zero all buffers and return to `AwaitingBreak`
    pub fn init(&mut self) {
        self.intake.reset();
        self.sync.init();
        self.store.init();
    }

    /// Process one byte that arrived at `arrival_us`
    ///
    /// A completed frame is committed with a millisecond timestamp taken
    /// from the same clock (`arrival_us / 1000`).
    pub fn feed(&mut self, value: u8, arrival_us: u64) -> SyncAction {
        let event = self.intake.observe(value, arrival_us);
        let action = self.sync.feed(&event);

        if let SyncAction::Complete { .. } = action {
            self.store.commit(self.sync.assembled(), arrival_us / 1000);
        }

        action
    }

    /// Process one timestamped byte
    pub fn feed_timed(&mut self, byte: TimedByte) -> SyncAction {
        self.feed(byte.value, byte.arrival_us)
    }

    /// Feed every byte the source currently has, then return
    pub fn drain<S: TimedByteSource>(&mut self, source: &mut S) -> Result<DrainSummary, S::Error> {
        let mut summary = DrainSummary::default();

        while let Some(byte) = source.try_read()? {
            summary.bytes += 1;
            if let SyncAction::Complete { .. } = self.feed_timed(byte) {
                summary.frames += 1;
            }
        }

        Ok(summary)
    }

    /// Read a channel (1..=512); 0 when no valid frame or out of range
    pub fn read_channel(&self, channel: u16) -> u8 {
        self.store.read_channel(channel)
    }

    /// Channel value while connected, `None` otherwise
    pub fn channel_level(&self, channel: u16, now_ms: u64) -> Option<u8> {
        self.is_connected(now_ms)
            .then(|| self.store.read_channel(channel))
    }

    /// Check if a frame completed within the liveness window
    pub fn is_connected(&self, now_ms: u64) -> bool {
        self.store.is_connected(now_ms)
    }

    /// Periodic timeout check; see [`FrameStore::poll_timeout`]
    pub fn poll_timeout(&mut self, now_ms: u64) -> Option<LinkEvent> {
        self.store.poll_timeout(now_ms)
    }

    /// Consume the frame-completed flag
    pub fn take_frame_completed(&mut self) -> bool {
        self.store.take_frame_completed()
    }

    /// Current synchroniser state
    pub fn sync_state(&self) -> SyncState {
        self.sync.state()
    }

    /// Read-only view of the frame store
    pub fn store(&self) -> &FrameStore {
        &self.store
    }
}
