//! Synchroniser state machine
//!
//! The next state is a pure function of the current state, the byte value,
//! and whether the byte followed a break. No buffer or clock is involved,
//! so every transition can be checked with synthetic input.

use crate::frame::{CHANNEL_COUNT, START_CODE_DIMMER};

/// Synchroniser states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncState {
    /// Waiting for a break; bytes are discarded
    #[default]
    AwaitingBreak,
    /// Inside a frame; `count` bytes of it have been accepted (0..=512)
    Receiving { count: u16 },
}

/// What the caller should do with the byte that caused a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncAction {
    /// Byte is not part of any frame
    Ignore,
    /// Byte was in the start code position but is not dimmer data
    RejectStartCode(u8),
    /// Store `value` at frame slot `index`
    Store { index: u16, value: u8 },
    /// Store `value` in the last slot; the frame is complete
    Complete { value: u8 },
}

impl SyncState {
    /// Number of frame bytes accepted so far (0 while awaiting a break)
    pub fn channel_count(&self) -> u16 {
        match self {
            SyncState::AwaitingBreak => 0,
            SyncState::Receiving { count } => *count,
        }
    }

    /// Check if a frame is in progress
    pub fn is_receiving(&self) -> bool {
        matches!(self, SyncState::Receiving { .. })
    }

    /// Process one byte and return the next state
    ///
    /// A break restarts reception from any state, including mid-frame,
    /// and the byte after it is treated as the start code.
    pub fn transition(self, value: u8, after_break: bool) -> (Self, SyncAction) {
        use SyncState::*;

        let state = if after_break {
            Receiving { count: 0 }
        } else {
            self
        };

        match state {
            AwaitingBreak => (AwaitingBreak, SyncAction::Ignore),

            Receiving { count: 0 } => {
                if value == START_CODE_DIMMER {
                    (Receiving { count: 1 }, SyncAction::Store { index: 0, value })
                } else {
                    (AwaitingBreak, SyncAction::RejectStartCode(value))
                }
            }

            Receiving { count } if (count as usize) < CHANNEL_COUNT => (
                Receiving { count: count + 1 },
                SyncAction::Store {
                    index: count,
                    value,
                },
            ),

            // count == 512: this byte fills slot 512
            Receiving { .. } => (AwaitingBreak, SyncAction::Complete { value }),
        }
    }
}
