//! DMX512 frame layout constants
//!
//! A frame is one start code followed by up to 512 channel slots. Slot 0
//! of a [`FrameBuffer`] holds the start code, slots 1..=512 hold channels.

/// Start code for standard dimmer data
pub const START_CODE_DIMMER: u8 = 0x00;

/// Channel slots per universe
pub const CHANNEL_COUNT: usize = 512;

/// Bytes per frame: start code plus channels
pub const FRAME_LEN: usize = CHANNEL_COUNT + 1;

/// Minimum break length from the DMX512 timing table (µs)
pub const MIN_BREAK_US: u32 = 88;

/// One complete frame, start code at index 0
pub type FrameBuffer = [u8; FRAME_LEN];

/// Check that `channel` addresses a slot (1-based, 1..=512)
pub const fn is_valid_channel(channel: u16) -> bool {
    channel >= 1 && channel as usize <= CHANNEL_COUNT
}
