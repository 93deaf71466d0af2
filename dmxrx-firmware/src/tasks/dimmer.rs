//! Dimmer output task
//!
//! Applies the level published by the receiver task to the PWM output.

use defmt::*;
use embassy_rp::pwm::PwmOutput;

use dmxrx_drivers::Dimmer;

use crate::channels::DIMMER_LEVEL;

/// Dimmer task - follows [`DIMMER_LEVEL`]
#[embassy_executor::task]
pub async fn dimmer_task(mut dimmer: Dimmer<PwmOutput<'static>>) {
    info!("Dimmer task started");

    loop {
        let level = DIMMER_LEVEL.wait().await;
        let previous = dimmer.level();

        if dimmer.apply(level).is_err() {
            warn!("PWM update failed");
            continue;
        }

        if previous != level {
            debug!("Dimmer level: {:?}", level);
        }
    }
}
