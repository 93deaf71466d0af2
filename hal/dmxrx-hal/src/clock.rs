//! Monotonic time source
//!
//! Byte intake needs microsecond resolution to see a break; liveness
//! checks only need milliseconds. Both are read from the same clock.

/// Monotonic clock with microsecond resolution
///
/// Implementations must never go backwards. The epoch is arbitrary
/// (typically boot).
pub trait Monotonic {
    /// Microseconds since the clock's epoch
    fn now_us(&self) -> u64;

    /// Milliseconds since the clock's epoch
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}
