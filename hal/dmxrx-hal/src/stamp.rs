//! Arrival time reconstruction for buffered UARTs
//!
//! A buffered UART hands bytes over in bursts (FIFO threshold or RX
//! timeout), so the time a byte is read says little about when it was on
//! the line. The receiver only needs inter-byte gaps to be right on one
//! point: above the break threshold exactly where a break was.
//!
//! [`ArrivalStamper`] therefore takes breaks from the UART's break flag and
//! spaces every other byte one character time after its predecessor.

use crate::uart::{TimedByte, UartConfig};

/// Rebuilds line-accurate break gaps from read times and break flags
#[derive(Debug, Clone)]
pub struct ArrivalStamper {
    char_time_us: u32,
    break_gap_us: u64,
    last_us: u64,
    pending_break: bool,
}

impl ArrivalStamper {
    /// Create a stamper for `line`, producing breaks above `break_threshold_us`
    pub fn new(line: &UartConfig, break_threshold_us: u32) -> Self {
        Self {
            char_time_us: line.char_time_us(),
            break_gap_us: break_threshold_us as u64 + 1,
            last_us: 0,
            pending_break: false,
        }
    }

    /// Record that the UART flagged a break before the next byte
    pub fn mark_break(&mut self) {
        self.pending_break = true;
    }

    /// Check if a break is waiting for its byte
    pub fn break_pending(&self) -> bool {
        self.pending_break
    }

    /// Stamp a byte read at `read_us`
    ///
    /// After a flagged break the stamp is at least `read_us` and leaves a
    /// gap above the threshold. Otherwise it follows the previous stamp by
    /// one character time.
    pub fn stamp(&mut self, value: u8, read_us: u64) -> TimedByte {
        let arrival_us = if core::mem::take(&mut self.pending_break) {
            read_us.max(self.last_us.saturating_add(self.break_gap_us))
        } else {
            self.last_us.saturating_add(self.char_time_us as u64)
        };
        self.last_us = arrival_us;
        TimedByte::new(value, arrival_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_spaced_by_char_time() {
        let mut stamper = ArrivalStamper::new(&UartConfig::dmx512(), 88);
        stamper.mark_break();
        let first = stamper.stamp(0x00, 1_000);
        assert_eq!(first.arrival_us, 1_000);

        // Read back to back, spread one character apart
        let stamps = [1_001, 1_002, 1_003].map(|t| stamper.stamp(0xAA, t).arrival_us);
        assert_eq!(stamps, [1_044, 1_088, 1_132]);
    }

    #[test]
    fn test_break_gap_exceeds_threshold() {
        let mut stamper = ArrivalStamper::new(&UartConfig::dmx512(), 88);
        let before = stamper.stamp(1, 500).arrival_us;

        // Break flagged but the next byte read almost immediately
        stamper.mark_break();
        assert!(stamper.break_pending());
        let after = stamper.stamp(0, before + 1).arrival_us;
        assert!(!stamper.break_pending());
        assert_eq!(after - before, 89);
    }

    #[test]
    fn test_break_catches_up_with_read_time() {
        let mut stamper = ArrivalStamper::new(&UartConfig::dmx512(), 88);
        stamper.stamp(1, 0);
        stamper.mark_break();
        assert_eq!(stamper.stamp(0, 30_000).arrival_us, 30_000);
    }

    #[test]
    fn test_no_break_without_flag() {
        let mut stamper = ArrivalStamper::new(&UartConfig::dmx512(), 88);
        let a = stamper.stamp(1, 100).arrival_us;
        // Long idle between reads is not a break on its own
        let b = stamper.stamp(2, 10_000).arrival_us;
        assert_eq!(b - a, 44);
    }
}
