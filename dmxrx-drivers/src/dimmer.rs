//! PWM dimmer driven by a DMX level
//!
//! Maps a level 0..=255 linearly onto the PWM duty range. A missing level
//! (no live signal) forces the output fully off.
//!
//! # Usage
//!
//! ```ignore
//! let mut dimmer = Dimmer::new(pwm);
//! // On every liveness tick:
//! dimmer.apply(receiver.channel_level(1, now_ms))?;
//! ```

use embedded_hal::pwm::SetDutyCycle;

/// Full-scale DMX level
pub const DMX_LEVEL_MAX: u8 = 255;

/// Scale a DMX level onto `0..=max_duty`
pub fn level_to_duty(level: u8, max_duty: u16) -> u16 {
    (level as u32 * max_duty as u32 / DMX_LEVEL_MAX as u32) as u16
}

/// Single-channel PWM dimmer
pub struct Dimmer<P> {
    pwm: P,
    /// Last level written; `None` means off
    level: Option<u8>,
    /// Whether anything has been written yet
    written: bool,
}

impl<P: SetDutyCycle> Dimmer<P> {
    /// Wrap a PWM output; nothing is written until the first `apply`
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            level: None,
            written: false,
        }
    }

    /// Drive the output from a level, or switch it off for `None`
    ///
    /// Writes only when the level changes.
    pub fn apply(&mut self, level: Option<u8>) -> Result<(), P::Error> {
        if self.written && level == self.level {
            return Ok(());
        }

        match level {
            Some(l) => {
                let duty = level_to_duty(l, self.pwm.max_duty_cycle());
                self.pwm.set_duty_cycle(duty)?;
            }
            None => self.pwm.set_duty_cycle_fully_off()?,
        }

        self.level = level;
        self.written = true;
        Ok(())
    }

    /// Last applied level
    pub fn level(&self) -> Option<u8> {
        self.level
    }

    /// Release the PWM output
    pub fn release(self) -> P {
        self.pwm
    }
}
