//! UART serial reception abstractions
//!
//! DMX512 carries no framing bytes, so the receiver needs the arrival time
//! of every byte along with its value. The transport is expected to be
//! configured with [`UartConfig::dmx512`] before bytes are read.

/// DMX512 physical-layer bit rate (bits per second)
pub const DMX_BAUDRATE: u32 = 250_000;

/// A received byte with its arrival timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimedByte {
    /// Byte value as read from the line
    pub value: u8,
    /// Arrival time in microseconds (monotonic)
    pub arrival_us: u64,
}

impl TimedByte {
    /// Create a timestamped byte
    pub const fn new(value: u8, arrival_us: u64) -> Self {
        Self { value, arrival_us }
    }
}

/// Non-blocking source of timestamped bytes
///
/// `try_read` must return immediately: `Ok(None)` when nothing is
/// pending. Bytes must be yielded strictly in arrival order.
pub trait TimedByteSource {
    /// Error type for receive operations
    type Error;

    /// Take the next pending byte, if any
    fn try_read(&mut self) -> Result<Option<TimedByte>, Self::Error>;
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::dmx512()
    }
}

impl UartConfig {
    /// DMX512 line format: 250 kbit/s, 8 data bits, no parity, 2 stop bits
    pub const fn dmx512() -> Self {
        Self {
            baudrate: DMX_BAUDRATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::Two,
        }
    }

    /// Bits on the wire per character, including start/parity/stop bits
    pub const fn bits_per_char(&self) -> u32 {
        let data = match self.data_bits {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
            DataBits::Nine => 9,
        };
        let parity = match self.parity {
            Parity::None => 0,
            Parity::Even | Parity::Odd => 1,
        };
        let stop = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        1 + data + parity + stop
    }

    /// Time to shift one character, in microseconds (rounded down)
    ///
    /// Returns 0 for a zero baud rate.
    pub const fn char_time_us(&self) -> u32 {
        if self.baudrate == 0 {
            return 0;
        }
        self.bits_per_char() * 1_000_000 / self.baudrate
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dmx512_defaults() {
        let config = UartConfig::default();
        assert_eq!(config, UartConfig::dmx512());
        assert_eq!(config.baudrate, 250_000);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::Two);
    }

    #[test]
    fn test_dmx_char_time() {
        // Start + 8 data + 2 stop = 11 bits at 4 µs each
        let config = UartConfig::dmx512();
        assert_eq!(config.bits_per_char(), 11);
        assert_eq!(config.char_time_us(), 44);
    }

    #[test]
    fn test_char_time_other_formats() {
        let config = UartConfig {
            baudrate: 115_200,
            data_bits: DataBits::Eight,
            parity: Parity::Even,
            stop_bits: StopBits::One,
        };
        assert_eq!(config.bits_per_char(), 11);
        assert_eq!(config.char_time_us(), 95);

        let zero = UartConfig {
            baudrate: 0,
            ..UartConfig::dmx512()
        };
        assert_eq!(zero.char_time_us(), 0);
    }
}
