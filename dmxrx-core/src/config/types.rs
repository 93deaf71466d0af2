//! Configuration type definitions

use heapless::{String, Vec};

use crate::frame::{is_valid_channel, CHANNEL_COUNT, MIN_BREAK_US};
use crate::store::{LIVENESS_WINDOW_MS, STALE_WINDOW_MS};

/// Maximum fixtures in the patch
pub const MAX_FIXTURES: usize = 8;

/// Maximum label length (bytes)
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum channels a single fixture may span
pub const MAX_FIXTURE_CHANNELS: usize = 32;

/// Frame timing thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Inter-byte gap that must be exceeded to count as a break (µs)
    pub break_threshold_us: u32,
    /// Frame age under which the link counts as connected (ms)
    pub liveness_window_ms: u32,
    /// Silence after which the signal is declared lost (ms)
    pub stale_window_ms: u32,
    /// Minimum spacing of frame reports (ms)
    pub report_interval_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            break_threshold_us: MIN_BREAK_US,
            liveness_window_ms: LIVENESS_WINDOW_MS,
            stale_window_ms: STALE_WINDOW_MS,
            report_interval_ms: 1000,
        }
    }
}

impl TimingConfig {
    /// Check that the windows are usable
    pub fn is_valid(&self) -> bool {
        self.break_threshold_us > 0
            && self.liveness_window_ms > 0
            && self.stale_window_ms >= self.liveness_window_ms
            && self.report_interval_ms > 0
    }
}

/// PWM dimmer driven from one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DimmerConfig {
    /// DMX channel (1..=512) controlling brightness
    pub channel: u16,
}

impl Default for DimmerConfig {
    fn default() -> Self {
        Self { channel: 1 }
    }
}

/// Status LED blink cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorConfig {
    /// Toggle period while connected (ms)
    pub connected_blink_ms: u32,
    /// Toggle period while disconnected (ms)
    pub disconnected_blink_ms: u32,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            connected_blink_ms: 250,
            disconnected_blink_ms: 1000,
        }
    }
}

/// A patched fixture: a contiguous window of channels
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fixture {
    /// Display label
    pub label: String<MAX_LABEL_LEN>,
    /// First channel (1-based)
    pub address: u16,
    /// Number of channels
    pub channels: u16,
}

impl Fixture {
    /// Create a fixture, or `None` if the window does not fit the universe
    pub fn new(label: &str, address: u16, channels: u16) -> Option<Self> {
        let mut l = String::new();
        l.push_str(label).ok()?;
        let fixture = Self {
            label: l,
            address,
            channels,
        };
        fixture.is_valid().then_some(fixture)
    }

    /// Last channel covered by this fixture
    pub fn end_address(&self) -> u16 {
        self.address.saturating_add(self.channels).saturating_sub(1)
    }

    /// Check that the window is non-empty and inside 1..=512
    pub fn is_valid(&self) -> bool {
        self.channels > 0
            && self.channels as usize <= MAX_FIXTURE_CHANNELS
            && is_valid_channel(self.address)
            && (self.end_address() as usize) <= CHANNEL_COUNT
    }

    /// Zero-based range into a 512-channel slice
    pub fn slot_range(&self) -> core::ops::Range<usize> {
        let start = self.address as usize - 1;
        start..start + self.channels as usize
    }
}

/// Complete receiver configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceiverConfig {
    /// Frame timing thresholds
    pub timing: TimingConfig,
    /// PWM dimmer mapping
    pub dimmer: DimmerConfig,
    /// Status LED cadence
    pub indicator: IndicatorConfig,
    /// Patched fixtures
    pub fixtures: Vec<Fixture, MAX_FIXTURES>,
}

impl ReceiverConfig {
    /// Create the default configuration (no fixtures)
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a fixture by label
    pub fn find_fixture(&self, label: &str) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.label.as_str() == label)
    }
}
