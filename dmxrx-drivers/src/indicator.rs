//! Status LED
//!
//! Blinks fast while a live signal is present and slowly otherwise.

use embedded_hal::digital::OutputPin;

/// Blinking status indicator
pub struct StatusIndicator<P> {
    pin: P,
    lit: bool,
    last_toggle_ms: u64,
    connected_period_ms: u32,
    disconnected_period_ms: u32,
}

impl<P: OutputPin> StatusIndicator<P> {
    /// Create an indicator; the LED starts off
    pub fn new(pin: P, connected_period_ms: u32, disconnected_period_ms: u32) -> Self {
        Self {
            pin,
            lit: false,
            last_toggle_ms: 0,
            connected_period_ms,
            disconnected_period_ms,
        }
    }

    /// Toggle period for the given link state
    pub fn period_ms(&self, connected: bool) -> u32 {
        if connected {
            self.connected_period_ms
        } else {
            self.disconnected_period_ms
        }
    }

    /// Advance the blink pattern; returns `true` if the LED toggled
    ///
    /// Toggles once a full period has elapsed since the last toggle.
    pub fn tick(&mut self, now_ms: u64, connected: bool) -> Result<bool, P::Error> {
        let period = self.period_ms(connected) as u64;
        if now_ms.saturating_sub(self.last_toggle_ms) < period {
            return Ok(false);
        }

        self.lit = !self.lit;
        if self.lit {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.last_toggle_ms = now_ms;
        Ok(true)
    }

    /// Check if the LED is currently lit
    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct MockPin {
        high: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    #[test]
    fn test_connected_blinks_fast() {
        let mut led = StatusIndicator::new(MockPin::default(), 250, 1000);
        let mut toggles = [0u64; 8];
        let mut count = 0;
        for t in (0..=2000u64).step_by(25) {
            if led.tick(t, true).unwrap() {
                toggles[count] = t;
                count += 1;
            }
        }
        assert_eq!(count, 8);
        assert_eq!(toggles, [250, 500, 750, 1000, 1250, 1500, 1750, 2000]);
    }

    #[test]
    fn test_disconnected_blinks_slow() {
        let mut led = StatusIndicator::new(MockPin::default(), 250, 1000);
        assert!(!led.tick(999, false).unwrap());
        assert!(led.tick(1000, false).unwrap());
        assert!(led.is_lit());
        assert!(!led.tick(1999, false).unwrap());
        assert!(led.tick(2000, false).unwrap());
        assert!(!led.is_lit());
    }

    #[test]
    fn test_period_selection() {
        let led = StatusIndicator::new(MockPin::default(), 250, 1000);
        assert_eq!(led.period_ms(true), 250);
        assert_eq!(led.period_ms(false), 1000);
    }
}
