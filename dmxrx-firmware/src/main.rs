//! dmxrx - DMX512 receiver firmware
//!
//! Listens to a DMX512 line on UART1, reassembles frames, and drives a
//! PWM dimmer from one channel. A status LED blinks fast while frames
//! arrive and slowly when the line is idle.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART1;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUartRx};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use dmxrx_core::config::ReceiverConfig;
use dmxrx_drivers::{Dimmer, StatusIndicator};
use dmxrx_hal::UartConfig;

mod channels;
mod clock;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

/// UART RX ring buffer size (a little over two frames)
const RX_BUF_SIZE: usize = 1024;

/// PWM counter top for the dimmer output (12-bit, ~30 kHz at 125 MHz)
const DIMMER_PWM_TOP: u16 = 4095;

// Static cells for buffers and configuration (must live forever)
static RX_BUF: StaticCell<[u8; RX_BUF_SIZE]> = StaticCell::new();
static RECEIVER_CONFIG: StaticCell<ReceiverConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("dmxrx firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static ReceiverConfig = RECEIVER_CONFIG.init(config::load_config());

    // DMX input
    // Pin assignment is board-specific (Pico: UART1 RX on GPIO9 from the RS-485 transceiver)
    let rx_buf = RX_BUF.init([0u8; RX_BUF_SIZE]);
    let line = UartConfig::dmx512();
    let rx = BufferedUartRx::new(p.UART1, Irqs, p.PIN_9, rx_buf, tasks::rp_uart_config(&line));
    info!(
        "UART initialized for DMX512 ({} baud, {}us/char)",
        line.baudrate,
        line.char_time_us()
    );

    // Dimmer output
    // Pin assignment is board-specific (Pico: GPIO15, PWM slice 7 channel B)
    let mut pwm_config = PwmConfig::default();
    pwm_config.top = DIMMER_PWM_TOP;
    pwm_config.compare_b = 0;
    let pwm = Pwm::new_output_b(p.PWM_SLICE7, p.PIN_15, pwm_config);
    let (_, pwm_b) = pwm.split();
    let Some(pwm_b) = pwm_b else {
        defmt::panic!("PWM channel B unavailable");
    };
    let dimmer = Dimmer::new(pwm_b);
    info!("Dimmer on channel {}", config.dimmer.channel);

    // Status LED
    // Pin assignment is board-specific (Pico: onboard LED on GPIO25)
    let led = StatusIndicator::new(
        Output::new(p.PIN_25, Level::Low),
        config.indicator.connected_blink_ms,
        config.indicator.disconnected_blink_ms,
    );

    spawner
        .spawn(tasks::uart_rx_task(rx, line, config.timing.break_threshold_us))
        .unwrap();
    spawner.spawn(tasks::receiver_task(config)).unwrap();
    spawner.spawn(tasks::dimmer_task(dimmer)).unwrap();
    spawner.spawn(tasks::indicator_task(led)).unwrap();

    info!("All tasks spawned, firmware running");
}
