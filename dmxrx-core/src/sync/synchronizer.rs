//! Frame synchroniser
//!
//! Drives [`SyncState`] with intake events and assembles the frame in a
//! private buffer. The buffer is only handed on once the 513th byte lands,
//! so a truncated or rejected frame never reaches the store.

use crate::frame::{FrameBuffer, CHANNEL_COUNT, FRAME_LEN, MIN_BREAK_US};
use crate::intake::ByteEvent;

use super::machine::{SyncAction, SyncState};

/// Break-delimited frame assembler
#[derive(Debug, Clone)]
pub struct FrameSynchronizer {
    state: SyncState,
    /// Frame under assembly
    assembly: FrameBuffer,
    /// Gap (µs) that must be exceeded to count as a break
    break_threshold_us: u32,
}

impl Default for FrameSynchronizer {
    fn default() -> Self {
        Self::new(MIN_BREAK_US)
    }
}

impl FrameSynchronizer {
    /// Create a synchroniser awaiting its first break
    pub const fn new(break_threshold_us: u32) -> Self {
        Self {
            state: SyncState::AwaitingBreak,
            assembly: [0; FRAME_LEN],
            break_threshold_us,
        }
    }

    /// Zero the assembly buffer and return to `AwaitingBreak`
    pub fn init(&mut self) {
        self.state = SyncState::AwaitingBreak;
        self.assembly.fill(0);
    }

    /// Current state
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Break threshold in microseconds
    pub fn break_threshold_us(&self) -> u32 {
        self.break_threshold_us
    }

    /// Feed one intake event
    ///
    /// On [`SyncAction::Complete`] the finished frame is available from
    /// [`assembled`](Self::assembled) until the next byte is fed.
    pub fn feed(&mut self, event: &ByteEvent) -> SyncAction {
        let after_break = event.is_break(self.break_threshold_us);
        let (next, action) = self.state.transition(event.value, after_break);
        self.state = next;

        match action {
            SyncAction::Store { index, value } => self.assembly[index as usize] = value,
            SyncAction::Complete { value } => self.assembly[CHANNEL_COUNT] = value,
            SyncAction::Ignore | SyncAction::RejectStartCode(_) => {}
        }

        action
    }

    /// Frame buffer as assembled so far
    pub fn assembled(&self) -> &FrameBuffer {
        &self.assembly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::ByteIntake;

    const BYTE_US: u64 = 44;
    const BREAK_US: u64 = 120;

    /// Feed a break, start code, and `channels`; return the last action
    fn feed_frame(
        sync: &mut FrameSynchronizer,
        intake: &mut ByteIntake,
        now: &mut u64,
        start_code: u8,
        channels: &[u8],
    ) -> SyncAction {
        *now += BREAK_US;
        let mut action = sync.feed(&intake.observe(start_code, *now));
        for &b in channels {
            *now += BYTE_US;
            action = sync.feed(&intake.observe(b, *now));
        }
        action
    }

    #[test]
    fn test_full_frame_assembles() {
        let mut sync = FrameSynchronizer::default();
        let mut intake = ByteIntake::new();
        let mut now = 0;

        let channels: [u8; 512] = core::array::from_fn(|i| (i % 251) as u8);
        let action = feed_frame(&mut sync, &mut intake, &mut now, 0x00, &channels);

        assert_eq!(action, SyncAction::Complete { value: channels[511] });
        assert_eq!(sync.state(), SyncState::AwaitingBreak);
        assert_eq!(sync.assembled()[0], 0x00);
        assert_eq!(&sync.assembled()[1..], &channels[..]);
    }

    #[test]
    fn test_short_gap_does_not_start_frame() {
        let mut sync = FrameSynchronizer::default();
        let mut intake = ByteIntake::new();
        intake.observe(0xAA, 10_000);

        let action = sync.feed(&intake.observe(0x00, 10_000 + BYTE_US));
        assert_eq!(action, SyncAction::Ignore);
        assert_eq!(sync.state(), SyncState::AwaitingBreak);
    }

    #[test]
    fn test_rejected_start_code_leaves_assembly_untouched() {
        let mut sync = FrameSynchronizer::default();
        let mut intake = ByteIntake::new();
        let mut now = 0;

        let action = feed_frame(&mut sync, &mut intake, &mut now, 0x01, &[9, 9, 9]);
        assert_eq!(action, SyncAction::Ignore);
        assert!(sync.assembled().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_custom_threshold() {
        let mut sync = FrameSynchronizer::new(176);
        let mut intake = ByteIntake::new();
        intake.observe(0xFF, 1_000);

        // 120 µs is a break at 88 but not at 176
        let action = sync.feed(&intake.observe(0x00, 1_120));
        assert_eq!(action, SyncAction::Ignore);
        let action = sync.feed(&intake.observe(0x00, 1_300));
        assert_eq!(action, SyncAction::Store { index: 0, value: 0 });
        assert_eq!(sync.break_threshold_us(), 176);
    }

    #[test]
    fn test_init_clears_progress() {
        let mut sync = FrameSynchronizer::default();
        let mut intake = ByteIntake::new();
        let mut now = 0;
        feed_frame(&mut sync, &mut intake, &mut now, 0x00, &[1, 2, 3]);
        assert_eq!(sync.state(), SyncState::Receiving { count: 4 });

        sync.init();
        assert_eq!(sync.state(), SyncState::AwaitingBreak);
        assert!(sync.assembled().iter().all(|&b| b == 0));
    }
}
