//! Status LED task

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};

use dmxrx_drivers::StatusIndicator;
use dmxrx_hal::Monotonic;

use crate::channels::LINK_STATUS;
use crate::clock::EmbassyClock;

/// LED update interval in milliseconds
const INDICATOR_TICK_MS: u64 = 25;

/// Indicator task - blinks the status LED at the link-dependent rate
#[embassy_executor::task]
pub async fn indicator_task(mut led: StatusIndicator<Output<'static>>) {
    info!("Indicator task started");

    let clock = EmbassyClock;
    let mut connected = false;
    let mut ticker = Ticker::every(Duration::from_millis(INDICATOR_TICK_MS));

    loop {
        ticker.next().await;

        if let Some(status) = LINK_STATUS.try_take() {
            connected = status;
        }

        if let Ok(true) = led.tick(clock.now_ms(), connected) {
            trace!("LED {}", if led.is_lit() { "on" } else { "off" });
        }
    }
}
