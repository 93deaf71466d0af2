//! Byte intake monitor
//!
//! Turns a timestamped byte into a [`ByteEvent`] carrying the gap since the
//! previous byte. Only one byte of lookback is kept. Nothing is rejected
//! here; deciding what a byte means is the synchroniser's job.

/// A byte annotated with its inter-byte gap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ByteEvent {
    /// Byte value
    pub value: u8,
    /// Arrival time (µs)
    pub arrival_us: u64,
    /// Time since the previous byte arrived (µs)
    pub gap_us: u64,
}

impl ByteEvent {
    /// Whether this byte follows a gap long enough to count as a break
    ///
    /// The comparison is strict: a gap of exactly `threshold_us` is not a break.
    pub fn is_break(&self, threshold_us: u32) -> bool {
        self.gap_us > threshold_us as u64
    }
}

/// Inter-byte gap tracker
#[derive(Debug, Clone, Default)]
pub struct ByteIntake {
    last_arrival_us: u64,
}

impl ByteIntake {
    /// Create an intake monitor with its lookback at time zero
    pub const fn new() -> Self {
        Self { last_arrival_us: 0 }
    }

    /// Forget the previous arrival
    pub fn reset(&mut self) {
        self.last_arrival_us = 0;
    }

    /// Record a byte and compute its gap
    ///
    /// A timestamp earlier than the previous one yields a gap of 0.
    pub fn observe(&mut self, value: u8, arrival_us: u64) -> ByteEvent {
        let gap_us = arrival_us.saturating_sub(self.last_arrival_us);
        self.last_arrival_us = arrival_us;
        ByteEvent {
            value,
            arrival_us,
            gap_us,
        }
    }

    /// Arrival time of the most recent byte
    pub fn last_arrival_us(&self) -> u64 {
        self.last_arrival_us
    }
}
