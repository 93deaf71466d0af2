//! DMX UART receive task
//!
//! The buffered UART delivers bytes in bursts, so read times cannot be
//! used as arrival times. Breaks come from the UART's break flag and
//! [`ArrivalStamper`] turns them into gaps the receiver recognises.

use defmt::*;
use embassy_rp::uart::{self, BufferedUartRx};
use embedded_io_async::Read;
use portable_atomic::Ordering;

use dmxrx_hal::uart::{DataBits, Parity, StopBits};
use dmxrx_hal::{ArrivalStamper, Monotonic, UartConfig};

use crate::channels::{BYTE_QUEUE, DROPPED_BYTES};
use crate::clock::EmbassyClock;

/// Translate a line format into the RP2040 UART configuration
pub fn rp_uart_config(config: &UartConfig) -> uart::Config {
    let mut rp = uart::Config::default();
    rp.baudrate = config.baudrate;
    rp.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
        DataBits::Nine => {
            warn!("9 data bits unsupported, using 8");
            uart::DataBits::DataBits8
        }
    };
    rp.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    rp.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    rp
}

/// UART RX task - timestamps bytes and hands them to the receiver
#[embassy_executor::task]
pub async fn uart_rx_task(mut rx: BufferedUartRx, line: UartConfig, break_threshold_us: u32) {
    info!("UART RX task started");

    let clock = EmbassyClock;
    let mut stamper = ArrivalStamper::new(&line, break_threshold_us);
    let mut buf = [0u8; 32];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                let read_us = clock.now_us();
                for &value in &buf[..n] {
                    let byte = stamper.stamp(value, read_us);
                    if BYTE_QUEUE.try_send(byte).is_err() {
                        // Warn on the first drop since the receiver last reported
                        if DROPPED_BYTES.fetch_add(1, Ordering::Relaxed) == 0 {
                            warn!("Byte queue full, dropping bytes");
                        }
                    }
                }
            }
            Err(uart::Error::Break) => {
                trace!("Line break");
                stamper.mark_break();
            }
            Err(e) => warn!("UART read error: {:?}", e),
        }
    }
}
