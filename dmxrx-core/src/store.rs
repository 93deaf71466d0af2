//! Frame store and liveness tracker
//!
//! Holds the last complete frame and decides whether it is still fresh.
//! The `frame_received` flag is the only thing readers trust: it is set by
//! [`FrameStore::commit`] and cleared only by [`FrameStore::poll_timeout`].
//! Clearing it never touches the buffer, so stale values stay in memory but
//! read as 0.

use crate::frame::{is_valid_channel, FrameBuffer, CHANNEL_COUNT, FRAME_LEN};

/// Default window in which a frame counts as live (ms)
pub const LIVENESS_WINDOW_MS: u32 = 2000;

/// Default silence after which the signal is declared lost (ms)
pub const STALE_WINDOW_MS: u32 = 5000;

/// Link transitions reported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// No complete frame within the stale window; emitted once per loss
    SignalLost,
}

/// Last complete frame plus freshness bookkeeping
#[derive(Debug, Clone)]
pub struct FrameStore {
    frame: FrameBuffer,
    frame_received: bool,
    /// Millisecond time of the last commit
    last_complete_ms: u64,
    /// Set on commit, cleared by `take_frame_completed`
    completed_since_poll: bool,
    frames_completed: u32,
    liveness_window_ms: u32,
    stale_window_ms: u32,
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new(LIVENESS_WINDOW_MS, STALE_WINDOW_MS)
    }
}

impl FrameStore {
    /// Create an empty store
    pub const fn new(liveness_window_ms: u32, stale_window_ms: u32) -> Self {
        Self {
            frame: [0; FRAME_LEN],
            frame_received: false,
            last_complete_ms: 0,
            completed_since_poll: false,
            frames_completed: 0,
            liveness_window_ms,
            stale_window_ms,
        }
    }

    /// Zero the buffer and forget all frames
    pub fn init(&mut self) {
        self.frame.fill(0);
        self.frame_received = false;
        self.last_complete_ms = 0;
        self.completed_since_poll = false;
        self.frames_completed = 0;
    }

    /// Publish a complete frame received at `now_ms`
    pub fn commit(&mut self, frame: &FrameBuffer, now_ms: u64) {
        self.frame.copy_from_slice(frame);
        self.frame_received = true;
        self.last_complete_ms = now_ms;
        self.completed_since_poll = true;
        self.frames_completed = self.frames_completed.wrapping_add(1);
    }

    /// Read a channel (1..=512)
    ///
    /// Returns 0 when no valid frame is held or the channel is out of range.
    pub fn read_channel(&self, channel: u16) -> u8 {
        if self.frame_received && is_valid_channel(channel) {
            self.frame[channel as usize]
        } else {
            0
        }
    }

    /// Channel values 1..=512 of the held frame, if valid
    pub fn channels(&self) -> Option<&[u8]> {
        if self.frame_received {
            Some(&self.frame[1..=CHANNEL_COUNT])
        } else {
            None
        }
    }

    /// Start code of the held frame, if valid
    pub fn start_code(&self) -> Option<u8> {
        self.frame_received.then_some(self.frame[0])
    }

    /// Check if a valid frame is held
    pub fn frame_received(&self) -> bool {
        self.frame_received
    }

    /// Check if the held frame completed within the liveness window
    ///
    /// Decays with time alone; no new frame is needed to turn it false.
    pub fn is_connected(&self, now_ms: u64) -> bool {
        self.frame_received && self.ms_since_last_frame(now_ms) < self.liveness_window_ms as u64
    }

    /// Declare the signal lost after prolonged silence
    ///
    /// Returns [`LinkEvent::SignalLost`] on the call that clears
    /// `frame_received`; later calls return `None` until another frame
    /// has been committed and gone stale.
    pub fn poll_timeout(&mut self, now_ms: u64) -> Option<LinkEvent> {
        if self.frame_received && self.ms_since_last_frame(now_ms) > self.stale_window_ms as u64 {
            self.frame_received = false;
            Some(LinkEvent::SignalLost)
        } else {
            None
        }
    }

    /// Consume the "frame completed since last poll" flag
    pub fn take_frame_completed(&mut self) -> bool {
        core::mem::take(&mut self.completed_since_poll)
    }

    /// Total frames committed (wraps)
    pub fn frames_completed(&self) -> u32 {
        self.frames_completed
    }

    /// Millisecond time of the last committed frame
    pub fn last_complete_ms(&self) -> u64 {
        self.last_complete_ms
    }

    /// Time since the last committed frame
    pub fn ms_since_last_frame(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_complete_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(value: u8) -> FrameBuffer {
        let mut frame = [value; FRAME_LEN];
        frame[0] = 0x00;
        frame
    }

    #[test]
    fn test_empty_store_reads_zero() {
        let store = FrameStore::default();
        assert!(!store.frame_received());
        assert_eq!(store.read_channel(1), 0);
        assert_eq!(store.channels(), None);
        assert_eq!(store.start_code(), None);
        assert!(!store.is_connected(0));
    }

    #[test]
    fn test_commit_publishes_frame() {
        let mut store = FrameStore::default();
        let mut frame = frame_with(0);
        frame[1] = 255;
        frame[512] = 17;
        store.commit(&frame, 1_000);

        assert!(store.frame_received());
        assert_eq!(store.read_channel(1), 255);
        assert_eq!(store.read_channel(512), 17);
        assert_eq!(store.start_code(), Some(0x00));
        assert_eq!(store.channels().map(|c| c.len()), Some(512));
        assert_eq!(store.frames_completed(), 1);
        assert_eq!(store.last_complete_ms(), 1_000);
    }

    #[test]
    fn test_out_of_range_reads_zero() {
        let mut store = FrameStore::default();
        store.commit(&frame_with(99), 0);
        assert_eq!(store.read_channel(0), 0);
        assert_eq!(store.read_channel(513), 0);
        assert_eq!(store.read_channel(u16::MAX), 0);
    }

    #[test]
    fn test_liveness_decays_with_time() {
        let mut store = FrameStore::default();
        store.commit(&frame_with(1), 10_000);

        assert!(store.is_connected(10_000));
        assert!(store.is_connected(11_999));
        assert!(!store.is_connected(12_000));
        // Flag is untouched by the liveness query
        assert!(store.frame_received());
        assert_eq!(store.read_channel(5), 1);
    }

    #[test]
    fn test_signal_lost_fires_once() {
        let mut store = FrameStore::default();
        store.commit(&frame_with(1), 0);

        assert_eq!(store.poll_timeout(5_000), None);
        assert_eq!(store.poll_timeout(5_001), Some(LinkEvent::SignalLost));
        for t in (5_100..20_000).step_by(100) {
            assert_eq!(store.poll_timeout(t), None);
        }
        assert!(!store.frame_received());
        assert_eq!(store.read_channel(5), 0);
    }

    #[test]
    fn test_signal_lost_rearms_after_new_frame() {
        let mut store = FrameStore::default();
        store.commit(&frame_with(1), 0);
        assert_eq!(store.poll_timeout(6_000), Some(LinkEvent::SignalLost));

        store.commit(&frame_with(2), 7_000);
        assert!(store.is_connected(7_000));
        assert_eq!(store.poll_timeout(8_000), None);
        assert_eq!(store.poll_timeout(12_001), Some(LinkEvent::SignalLost));
        assert_eq!(store.poll_timeout(12_002), None);
    }

    #[test]
    fn test_no_signal_lost_before_first_frame() {
        let mut store = FrameStore::default();
        assert_eq!(store.poll_timeout(60_000), None);
    }

    #[test]
    fn test_frame_completed_flag() {
        let mut store = FrameStore::default();
        assert!(!store.take_frame_completed());
        store.commit(&frame_with(1), 0);
        store.commit(&frame_with(2), 25);
        assert!(store.take_frame_completed());
        assert!(!store.take_frame_completed());
        assert_eq!(store.frames_completed(), 2);
    }

    #[test]
    fn test_init_clears_everything() {
        let mut store = FrameStore::default();
        store.commit(&frame_with(8), 100);
        store.init();
        assert!(!store.frame_received());
        assert_eq!(store.frames_completed(), 0);
        assert!(!store.take_frame_completed());
        assert_eq!(store.read_channel(3), 0);
    }
}
