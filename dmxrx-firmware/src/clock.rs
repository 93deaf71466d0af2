//! Embassy time source

use dmxrx_hal::Monotonic;
use embassy_time::Instant;

/// Monotonic clock backed by the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Monotonic for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}
